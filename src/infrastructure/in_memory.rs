use crate::domain::customer::{Customer, LedgerEntry};
use crate::domain::email::{Email, EmailTemplate, NotificationRule};
use crate::domain::invoice::{Invoice, Payment, PurchaseOrder};
use crate::domain::ports::{
    CustomerRepository, InvoiceRepository, LedgerRepository, OutboxRepository, PaymentRepository,
    PurchaseOrderRepository, RuleRepository, TemplateRepository,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe in-memory customer store.
///
/// `Arc<RwLock<HashMap>>` gives shared concurrent access; state resets on
/// restart, which is the whole point of a mock.
#[derive(Default, Clone)]
pub struct InMemoryCustomers {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomers {
    async fn store(&self, customer: Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

/// Append-only ledger of balance updates.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedger {
    async fn append(&self, entry: LedgerEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.entries.read().await.clone())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryInvoices {
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
}

impl InMemoryInvoices {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn store(&self, invoice: Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        invoices.insert(invoice.id.clone(), invoice);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        let mut all: Vec<Invoice> = invoices.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

/// Append-only payment log, never mutated after insert.
#[derive(Default, Clone)]
pub struct InMemoryPayments {
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPayments {
    async fn append(&self, payment: Payment) -> Result<()> {
        self.payments.write().await.push(payment);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.read().await.clone())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPurchaseOrders {
    orders: Arc<RwLock<HashMap<String, PurchaseOrder>>>,
}

impl InMemoryPurchaseOrders {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PurchaseOrderRepository for InMemoryPurchaseOrders {
    async fn store(&self, order: PurchaseOrder) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<PurchaseOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<PurchaseOrder>> {
        let orders = self.orders.read().await;
        let mut all: Vec<PurchaseOrder> = orders.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

/// Sent-email log. Append-only apart from the read flag.
#[derive(Default, Clone)]
pub struct InMemoryOutbox {
    emails: Arc<RwLock<Vec<Email>>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OutboxRepository for InMemoryOutbox {
    async fn append(&self, email: Email) -> Result<()> {
        self.emails.write().await.push(email);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Email>> {
        let emails = self.emails.read().await;
        Ok(emails.iter().find(|e| e.id == id).cloned())
    }

    async fn all(&self) -> Result<Vec<Email>> {
        Ok(self.emails.read().await.clone())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Option<Email>> {
        let mut emails = self.emails.write().await;
        if let Some(email) = emails.iter_mut().find(|e| e.id == id) {
            email.read = true;
            email.read_timestamp = Some(Utc::now());
            return Ok(Some(email.clone()));
        }
        Ok(None)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryTemplates {
    templates: Arc<RwLock<HashMap<String, EmailTemplate>>>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplates {
    async fn store(&self, template: EmailTemplate) -> Result<()> {
        let mut templates = self.templates.write().await;
        templates.insert(template.name.clone(), template);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<EmailTemplate>> {
        let templates = self.templates.read().await;
        Ok(templates.get(name).cloned())
    }

    async fn all(&self) -> Result<Vec<EmailTemplate>> {
        let templates = self.templates.read().await;
        let mut all: Vec<EmailTemplate> = templates.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryRules {
    rules: Arc<RwLock<Vec<NotificationRule>>>,
}

impl InMemoryRules {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleRepository for InMemoryRules {
    async fn append(&self, rule: NotificationRule) -> Result<()> {
        self.rules.write().await.push(rule);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<NotificationRule>> {
        Ok(self.rules.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::CustomerStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Map;

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Test".to_string(),
            email: "t@example.com".to_string(),
            phone: String::new(),
            account_number: format!("ACC-{id}"),
            status: CustomerStatus::Active,
            credit_limit: dec!(1000),
            current_balance: Decimal::ZERO,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn test_customer_store_and_retrieve() {
        let store = InMemoryCustomers::new();
        store.store(customer("cust_001")).await.unwrap();

        assert!(store.get("cust_001").await.unwrap().is_some());
        assert!(store.get("cust_404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_customer_all_is_sorted_by_id() {
        let store = InMemoryCustomers::new();
        store.store(customer("cust_002")).await.unwrap();
        store.store(customer("cust_001")).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all[0].id, "cust_001");
        assert_eq!(all[1].id, "cust_002");
    }

    #[tokio::test]
    async fn test_outbox_mark_read_sets_timestamp() {
        let outbox = InMemoryOutbox::new();
        let email = Email {
            id: Uuid::new_v4(),
            to: "finance@company.com".to_string(),
            cc: vec![],
            subject: "s".to_string(),
            body: "b".to_string(),
            priority: crate::domain::email::EmailPriority::Normal,
            category: "general".to_string(),
            template_used: None,
            timestamp: Utc::now(),
            status: "sent".to_string(),
            read: false,
            read_timestamp: None,
            metadata: Map::new(),
        };
        let id = email.id;
        outbox.append(email).await.unwrap();

        let updated = outbox.mark_read(id).await.unwrap().unwrap();
        assert!(updated.read);
        assert!(updated.read_timestamp.is_some());

        assert!(outbox.mark_read(Uuid::new_v4()).await.unwrap().is_none());
    }
}
