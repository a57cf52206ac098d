use crate::domain::customer::LedgerKind;
use crate::domain::invoice::{
    Invoice, InvoiceStatus, Payment, PurchaseOrder, PurchaseOrderStatus, ValidationReport,
    classify_transaction, outstanding_amount,
};
use crate::domain::ports::{InvoiceRepoBox, PaymentRepoBox, PurchaseOrderRepoBox};
use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub customer_account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub bank_transaction_id: String,
}

fn default_method() -> String {
    "bank_transfer".to_string()
}

#[derive(Debug)]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub invoice: Invoice,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub account_number: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(rename = "type", default = "default_validate_kind")]
    pub kind: LedgerKind,
}

fn default_validate_kind() -> LedgerKind {
    LedgerKind::Payment
}

#[derive(Debug, Serialize)]
pub struct CashFlowSummary {
    pub pending_receivables: Decimal,
    pub total_payables: Decimal,
    pub net_cash_flow: Decimal,
    pub overdue_amount: Decimal,
    pub overdue_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CashFlowAnalysis {
    pub summary: CashFlowSummary,
    pub overdue_invoices: Vec<Invoice>,
    pub timestamp: DateTime<Utc>,
}

/// The accounting service: invoices, purchase orders, the payment log, and
/// transaction validation.
pub struct Accounting {
    invoices: InvoiceRepoBox,
    purchase_orders: PurchaseOrderRepoBox,
    payments: PaymentRepoBox,
}

impl Accounting {
    pub fn new(
        invoices: InvoiceRepoBox,
        purchase_orders: PurchaseOrderRepoBox,
        payments: PaymentRepoBox,
    ) -> Self {
        Self {
            invoices,
            purchase_orders,
            payments,
        }
    }

    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let mut invoices = self.invoices.all().await?;
        if let Some(status) = filter.status {
            invoices.retain(|i| i.status == status);
        }
        if let Some(account) = &filter.customer_account {
            invoices.retain(|i| &i.customer_account == account);
        }
        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice> {
        self.invoices
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("Invoice"))
    }

    pub async fn invoices_by_account(&self, account_number: &str) -> Result<Vec<Invoice>> {
        let mut invoices = self.invoices.all().await?;
        invoices.retain(|i| i.customer_account == account_number);
        Ok(invoices)
    }

    /// Applies a payment to an invoice.
    ///
    /// The outstanding amount is recomputed from the payment log on every
    /// call. Overpayments are rejected with the delta reported back; the
    /// delta is never persisted or credited anywhere.
    pub async fn apply_payment(
        &self,
        invoice_id: &str,
        request: PaymentRequest,
    ) -> Result<PaymentOutcome> {
        let mut invoice = self.get_invoice(invoice_id).await?;
        let prior = self.payments.all().await?;
        let outstanding = outstanding_amount(&invoice, &prior);

        if request.amount > outstanding {
            return Err(ServiceError::OverpaymentRejected {
                outstanding_amount: outstanding,
                payment_amount: request.amount,
                overpayment: request.amount - outstanding,
            });
        }

        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            invoice_id: invoice.id.clone(),
            customer_account: invoice.customer_account.clone(),
            amount: request.amount,
            method: request.method,
            reference: request.reference,
            bank_transaction_id: request.bank_transaction_id,
            timestamp: now,
            status: "completed".to_string(),
            outstanding_before: outstanding,
            outstanding_after: outstanding - request.amount,
        };
        self.payments.append(payment.clone()).await?;

        invoice.settle(outstanding, request.amount, now);
        self.invoices.store(invoice.clone()).await?;

        Ok(PaymentOutcome {
            remaining_balance: outstanding - request.amount,
            payment,
            invoice,
        })
    }

    pub async fn list_purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>> {
        let mut orders = self.purchase_orders.all().await?;
        if let Some(status) = status {
            orders.retain(|po| po.status == status);
        }
        Ok(orders)
    }

    pub async fn get_purchase_order(&self, id: &str) -> Result<PurchaseOrder> {
        self.purchase_orders
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("Purchase order"))
    }

    pub async fn list_payments(&self, invoice_id: Option<&str>) -> Result<Vec<Payment>> {
        let mut payments = self.payments.all().await?;
        if let Some(id) = invoice_id {
            payments.retain(|p| p.invoice_id == id);
        }
        Ok(payments)
    }

    /// Open receivables against approved payables, plus the overdue list.
    pub async fn cash_flow(&self) -> Result<CashFlowAnalysis> {
        let invoices = self.invoices.all().await?;
        let orders = self.purchase_orders.all().await?;

        let pending_receivables: Decimal =
            invoices.iter().filter(|i| i.is_open()).map(|i| i.amount).sum();
        let total_payables: Decimal = orders
            .iter()
            .filter(|po| po.status == PurchaseOrderStatus::Approved)
            .map(|po| po.amount)
            .sum();

        let overdue_invoices: Vec<Invoice> = invoices
            .into_iter()
            .filter(|i| i.status == InvoiceStatus::Overdue)
            .collect();
        let overdue_amount: Decimal = overdue_invoices.iter().map(|i| i.amount).sum();

        Ok(CashFlowAnalysis {
            summary: CashFlowSummary {
                pending_receivables,
                total_payables,
                net_cash_flow: pending_receivables - total_payables,
                overdue_amount,
                overdue_count: overdue_invoices.len(),
            },
            overdue_invoices,
            timestamp: Utc::now(),
        })
    }

    /// Pure read over the invoice set; no side effects, so re-validating the
    /// same transaction always yields the same classification.
    pub async fn validate(&self, request: &ValidateRequest) -> Result<ValidationReport> {
        let account = request
            .account_number
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or(ServiceError::MissingAccountNumber)?;

        let invoices = self.invoices.all().await?;
        Ok(classify_transaction(
            account,
            request.amount,
            request.kind,
            &invoices,
        ))
    }
}
