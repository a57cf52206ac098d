use crate::error::ServiceError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Suspended,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Suspended => "suspended",
        }
    }
}

/// Kind of balance movement recorded against a customer account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Payment,
    Charge,
    Adjustment,
}

/// A customer record in the directory.
///
/// `current_balance` is what the customer owes; it may go negative (a credit
/// position) down to `-credit_limit`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub account_number: String,
    pub status: CustomerStatus,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub created_date: NaiveDate,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_amount: Decimal,
}

/// Immutable record of a balance update. Appended on every successful
/// `update-balance` call, never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: LedgerKind,
    pub reference: String,
    pub bank_transaction_id: String,
    pub timestamp: DateTime<Utc>,
    pub old_balance: Decimal,
    pub new_balance: Decimal,
}

/// Result of a credit availability check.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreditCheck {
    pub customer_id: String,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub available_credit: Decimal,
    pub requested_amount: Decimal,
    pub approved: bool,
    pub status: CustomerStatus,
}

impl Customer {
    pub fn available_credit(&self) -> Decimal {
        self.credit_limit - self.current_balance
    }

    /// Checks whether a transaction of `amount` fits within the remaining
    /// credit. Suspended customers are never approved, whatever the amount.
    pub fn credit_check(&self, amount: Decimal) -> CreditCheck {
        CreditCheck {
            customer_id: self.id.clone(),
            credit_limit: self.credit_limit,
            current_balance: self.current_balance,
            available_credit: self.available_credit(),
            requested_amount: amount,
            approved: amount <= self.available_credit() && self.status == CustomerStatus::Active,
            status: self.status,
        }
    }

    /// Applies a balance movement, rejecting it before any state changes if
    /// the resulting credit position would exceed the credit limit.
    ///
    /// Payments reduce the balance and stamp the last-payment fields; charges
    /// and adjustments increase it (an adjustment amount may be negative).
    /// Returns the balance before and after the update.
    pub fn apply(
        &mut self,
        kind: LedgerKind,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(Decimal, Decimal), ServiceError> {
        let old_balance = self.current_balance;
        let new_balance = match kind {
            LedgerKind::Payment => old_balance - amount,
            LedgerKind::Charge | LedgerKind::Adjustment => old_balance + amount,
        };

        if new_balance < Decimal::ZERO && new_balance.abs() > self.credit_limit {
            return Err(ServiceError::CreditLimitExceeded {
                available_credit: self.credit_limit,
                attempted_balance: new_balance,
            });
        }

        self.current_balance = new_balance;
        if kind == LedgerKind::Payment {
            self.last_payment_date = Some(now);
            self.last_payment_amount = amount;
        }

        Ok((old_balance, new_balance))
    }
}
