use crate::domain::customer::LedgerKind;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Residual amounts at or below this are considered settled.
pub const SETTLEMENT_TOLERANCE: Decimal = dec!(0.01);

/// Outstanding totals above this mark a customer as high value.
pub const HIGH_VALUE_THRESHOLD: Decimal = dec!(50000);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Overdue,
    Paid,
    PartiallyPaid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Pending,
    Approved,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LineItem {
    pub product: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Invoice {
    pub id: String,
    pub customer_account: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub issue_date: NaiveDate,
    pub description: String,
    pub payment_terms: String,
    pub paid_amount: Decimal,
    pub paid_date: Option<DateTime<Utc>>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_amount: Decimal,
    pub line_items: Vec<LineItem>,
}

/// Read-only in this system; seeded at startup and never mutated.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier: String,
    pub amount: Decimal,
    pub status: PurchaseOrderStatus,
    pub expected_delivery: NaiveDate,
    pub order_date: NaiveDate,
    pub description: String,
    pub line_items: Vec<LineItem>,
}

/// Append-only record of a payment applied to an invoice.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub invoice_id: String,
    pub customer_account: String,
    pub amount: Decimal,
    pub method: String,
    pub reference: String,
    pub bank_transaction_id: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub outstanding_before: Decimal,
    pub outstanding_after: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Approved,
    Warning,
    AttentionRequired,
    HighValue,
}

/// Outcome of `validate-transaction`. A pure read over the invoice set;
/// identical inputs always produce identical reports.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidationReport {
    pub account_number: String,
    pub transaction_amount: Decimal,
    pub transaction_type: LedgerKind,
    pub outstanding_invoices: Decimal,
    pub invoice_count: usize,
    pub validation_status: ValidationStatus,
    pub notes: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Invoice {
    pub fn is_open(&self) -> bool {
        matches!(self.status, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }

    /// Settles a payment against this invoice given the outstanding amount
    /// before the payment. The invoice becomes `paid` when the residual drops
    /// within the settlement tolerance, otherwise `partially_paid`.
    pub fn settle(&mut self, outstanding_before: Decimal, amount: Decimal, now: DateTime<Utc>) {
        let remaining = outstanding_before - amount;
        if remaining <= SETTLEMENT_TOLERANCE {
            self.status = InvoiceStatus::Paid;
            self.paid_date = Some(now);
            self.paid_amount = self.amount;
        } else {
            self.status = InvoiceStatus::PartiallyPaid;
            self.paid_amount = self.amount - remaining;
        }
        self.last_payment_date = Some(now);
        self.last_payment_amount = amount;
    }
}

/// Invoice amount minus everything already paid against it.
pub fn outstanding_amount(invoice: &Invoice, payments: &[Payment]) -> Decimal {
    let paid: Decimal = payments
        .iter()
        .filter(|p| p.invoice_id == invoice.id)
        .map(|p| p.amount)
        .sum();
    invoice.amount - paid
}

/// Classifies a transaction against the account's invoices.
///
/// Checks run in a fixed order and each match overwrites the status, so a
/// later check takes precedence when several hold at once. Notes accumulate
/// for every triggered check regardless of the final status.
pub fn classify_transaction(
    account_number: &str,
    amount: Decimal,
    kind: LedgerKind,
    invoices: &[Invoice],
) -> ValidationReport {
    let account_invoices: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.customer_account == account_number)
        .collect();
    let outstanding: Decimal = account_invoices
        .iter()
        .filter(|i| i.is_open())
        .map(|i| i.amount)
        .sum();

    let mut status = ValidationStatus::Approved;
    let mut notes = Vec::new();

    if kind == LedgerKind::Payment && amount > outstanding {
        status = ValidationStatus::Warning;
        notes.push("Payment amount exceeds outstanding invoices".to_string());
    }

    let overdue_count = account_invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Overdue)
        .count();
    if overdue_count > 0 {
        status = ValidationStatus::AttentionRequired;
        notes.push(format!("Customer has {overdue_count} overdue invoices"));
    }

    if outstanding > HIGH_VALUE_THRESHOLD {
        status = ValidationStatus::HighValue;
        notes.push("High value customer - manual review recommended".to_string());
    }

    ValidationReport {
        account_number: account_number.to_string(),
        transaction_amount: amount,
        transaction_type: kind,
        outstanding_invoices: outstanding,
        invoice_count: account_invoices.len(),
        validation_status: status,
        notes,
        timestamp: Utc::now(),
    }
}
