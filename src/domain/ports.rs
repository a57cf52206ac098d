use crate::domain::customer::{Customer, LedgerEntry};
use crate::domain::email::{Email, EmailTemplate, NotificationRule};
use crate::domain::invoice::{Invoice, Payment, PurchaseOrder};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn store(&self, customer: Customer) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Customer>>;
    async fn all(&self) -> Result<Vec<Customer>>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn append(&self, entry: LedgerEntry) -> Result<()>;
    async fn all(&self) -> Result<Vec<LedgerEntry>>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn store(&self, invoice: Invoice) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Invoice>>;
    async fn all(&self) -> Result<Vec<Invoice>>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn append(&self, payment: Payment) -> Result<()>;
    async fn all(&self) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait PurchaseOrderRepository: Send + Sync {
    async fn store(&self, order: PurchaseOrder) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<PurchaseOrder>>;
    async fn all(&self) -> Result<Vec<PurchaseOrder>>;
}

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    async fn append(&self, email: Email) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Email>>;
    async fn all(&self) -> Result<Vec<Email>>;
    /// Flips the read flag; the only mutation emails ever see.
    async fn mark_read(&self, id: Uuid) -> Result<Option<Email>>;
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn store(&self, template: EmailTemplate) -> Result<()>;
    async fn get(&self, name: &str) -> Result<Option<EmailTemplate>>;
    async fn all(&self) -> Result<Vec<EmailTemplate>>;
}

#[async_trait]
pub trait RuleRepository: Send + Sync {
    async fn append(&self, rule: NotificationRule) -> Result<()>;
    async fn all(&self) -> Result<Vec<NotificationRule>>;
}

pub type CustomerRepoBox = Box<dyn CustomerRepository>;
pub type LedgerRepoBox = Box<dyn LedgerRepository>;
pub type InvoiceRepoBox = Box<dyn InvoiceRepository>;
pub type PaymentRepoBox = Box<dyn PaymentRepository>;
pub type PurchaseOrderRepoBox = Box<dyn PurchaseOrderRepository>;
pub type OutboxRepoBox = Box<dyn OutboxRepository>;
pub type TemplateRepoBox = Box<dyn TemplateRepository>;
pub type RuleRepoBox = Box<dyn RuleRepository>;
