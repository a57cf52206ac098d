use crate::domain::customer::{
    CreditCheck, Customer, CustomerStatus, LedgerEntry, LedgerKind,
};
use crate::domain::ports::{CustomerRepoBox, LedgerRepoBox};
use crate::error::{Result, ServiceError};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Filters for the customer listing. Both are optional; an empty filter
/// returns everything.
#[derive(Debug, Deserialize, Default)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceUpdate {
    pub amount: Decimal,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: LedgerKind,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub bank_transaction_id: String,
}

fn default_kind() -> LedgerKind {
    LedgerKind::Payment
}

pub struct BalanceUpdateOutcome {
    pub entry: LedgerEntry,
    pub customer: Customer,
    pub balance_change: Decimal,
}

/// The customer directory service.
///
/// Owns the customer repository and the append-only ledger; every balance
/// mutation goes through here so the ledger stays consistent with the
/// customer records.
pub struct CustomerDirectory {
    customers: CustomerRepoBox,
    ledger: LedgerRepoBox,
}

impl CustomerDirectory {
    pub fn new(customers: CustomerRepoBox, ledger: LedgerRepoBox) -> Self {
        Self { customers, ledger }
    }

    /// Case-insensitive substring match on name/email plus exact status
    /// match; all records when no filters are given.
    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let mut customers = self.customers.all().await?;

        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            customers.retain(|c| {
                c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
            });
        }
        if let Some(status) = filter.status {
            customers.retain(|c| c.status == status);
        }

        Ok(customers)
    }

    pub async fn get(&self, id: &str) -> Result<Customer> {
        self.customers
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("Customer"))
    }

    pub async fn get_by_account(&self, account_number: &str) -> Result<Customer> {
        let customers = self.customers.all().await?;
        customers
            .into_iter()
            .find(|c| c.account_number == account_number)
            .ok_or(ServiceError::NotFound("Customer"))
    }

    pub async fn credit_check(&self, id: &str, amount: Decimal) -> Result<CreditCheck> {
        let customer = self.get(id).await?;
        Ok(customer.credit_check(amount))
    }

    /// Applies a balance update and records it in the ledger. The update is
    /// rejected before anything is stored when it would push the balance
    /// below `-credit_limit`.
    pub async fn update_balance(
        &self,
        id: &str,
        update: BalanceUpdate,
    ) -> Result<BalanceUpdateOutcome> {
        let mut customer = self.get(id).await?;
        let now = Utc::now();

        let (old_balance, new_balance) = customer.apply(update.kind, update.amount, now)?;
        self.customers.store(customer.clone()).await?;

        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            customer_id: customer.id.clone(),
            amount: update.amount,
            kind: update.kind,
            reference: update.reference,
            bank_transaction_id: update.bank_transaction_id,
            timestamp: now,
            old_balance,
            new_balance,
        };
        self.ledger.append(entry.clone()).await?;

        let balance_change = if update.kind == LedgerKind::Charge {
            update.amount
        } else {
            -update.amount
        };

        Ok(BalanceUpdateOutcome {
            entry,
            customer,
            balance_change,
        })
    }

    pub async fn transactions(&self, customer_id: Option<&str>) -> Result<Vec<LedgerEntry>> {
        let mut entries = self.ledger.all().await?;
        if let Some(id) = customer_id {
            entries.retain(|e| e.customer_id == id);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{InMemoryCustomers, InMemoryLedger};
    use crate::infrastructure::seed;
    use rust_decimal_macros::dec;

    async fn directory() -> CustomerDirectory {
        let customers = InMemoryCustomers::new();
        for customer in seed::customers() {
            crate::domain::ports::CustomerRepository::store(&customers, customer)
                .await
                .unwrap();
        }
        CustomerDirectory::new(Box::new(customers), Box::new(InMemoryLedger::new()))
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_all() {
        let dir = directory().await;
        let all = dir.list(&CustomerFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let dir = directory().await;
        let filter = CustomerFilter {
            search: Some("ACME".to_string()),
            status: None,
        };
        let matched = dir.list(&filter).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "cust_001");
    }

    #[tokio::test]
    async fn test_list_search_matches_email() {
        let dir = directory().await;
        let filter = CustomerFilter {
            search: Some("techsolutions".to_string()),
            status: None,
        };
        let matched = dir.list(&filter).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "cust_002");
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let dir = directory().await;
        let filter = CustomerFilter {
            search: None,
            status: Some(CustomerStatus::Suspended),
        };
        let matched = dir.list(&filter).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].account_number, "ACC-123456789");
    }

    #[tokio::test]
    async fn test_get_by_account_unknown_is_not_found() {
        let dir = directory().await;
        let result = dir.get_by_account("ACC-999888777").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_balance_appends_ledger_entry() {
        let dir = directory().await;
        let outcome = dir
            .update_balance(
                "cust_001",
                BalanceUpdate {
                    amount: dec!(2500),
                    kind: LedgerKind::Payment,
                    reference: "INV-2025-001".to_string(),
                    bank_transaction_id: "WIRE_001".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.entry.old_balance, dec!(12500.00));
        assert_eq!(outcome.entry.new_balance, dec!(10000.00));
        assert_eq!(outcome.balance_change, dec!(-2500));

        let entries = dir.transactions(Some("cust_001")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], outcome.entry);
    }

    #[tokio::test]
    async fn test_update_balance_rejection_leaves_no_trace() {
        let dir = directory().await;
        let result = dir
            .update_balance(
                "cust_002",
                BalanceUpdate {
                    amount: dec!(100000),
                    kind: LedgerKind::Payment,
                    reference: String::new(),
                    bank_transaction_id: String::new(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::CreditLimitExceeded { .. })
        ));

        // Neither the balance nor the ledger changed.
        let customer = dir.get("cust_002").await.unwrap();
        assert_eq!(customer.current_balance, dec!(8750.00));
        assert!(dir.transactions(None).await.unwrap().is_empty());
    }
}
