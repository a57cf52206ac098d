use crate::application::accounting::{
    Accounting, CashFlowAnalysis, InvoiceFilter, PaymentRequest, ValidateRequest,
};
use crate::domain::invoice::{
    Invoice, Payment, PurchaseOrder, PurchaseOrderStatus, ValidationReport,
};
use crate::error::Result;
use crate::interfaces::http::{Health, health_response};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn router(service: Arc<Accounting>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/invoices", get(list_invoices))
        .route(
            "/api/invoices/by-account/:account_number",
            get(invoices_by_account),
        )
        .route("/api/invoices/:id", get(get_invoice))
        .route("/api/invoices/:id/payment", post(apply_payment))
        .route("/api/purchase-orders", get(list_purchase_orders))
        .route("/api/purchase-orders/:id", get(get_purchase_order))
        .route("/api/cash-flow/analysis", get(cash_flow))
        .route("/api/payments", get(list_payments))
        .route(
            "/api/financial/validate-transaction",
            post(validate_transaction),
        )
        .with_state(service)
}

async fn health() -> Json<Health> {
    health_response("ERP System")
}

#[derive(Serialize)]
struct InvoiceList {
    invoices: Vec<Invoice>,
    total: usize,
    timestamp: DateTime<Utc>,
}

async fn list_invoices(
    State(service): State<Arc<Accounting>>,
    Query(filter): Query<InvoiceFilter>,
) -> Result<Json<InvoiceList>> {
    let invoices = service.list_invoices(&filter).await?;
    Ok(Json(InvoiceList {
        total: invoices.len(),
        invoices,
        timestamp: Utc::now(),
    }))
}

async fn get_invoice(
    State(service): State<Arc<Accounting>>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>> {
    Ok(Json(service.get_invoice(&id).await?))
}

#[derive(Serialize)]
struct AccountInvoiceList {
    invoices: Vec<Invoice>,
    total: usize,
    account_number: String,
}

async fn invoices_by_account(
    State(service): State<Arc<Accounting>>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountInvoiceList>> {
    let invoices = service.invoices_by_account(&account_number).await?;
    Ok(Json(AccountInvoiceList {
        total: invoices.len(),
        invoices,
        account_number,
    }))
}

#[derive(Serialize)]
struct PaymentResponse {
    payment: Payment,
    invoice: Invoice,
    message: String,
    remaining_balance: Decimal,
}

async fn apply_payment(
    State(service): State<Arc<Accounting>>,
    Path(id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>> {
    let outcome = service.apply_payment(&id, request).await?;
    info!(
        invoice_id = %outcome.invoice.id,
        amount = %outcome.payment.amount,
        remaining = %outcome.remaining_balance,
        status = ?outcome.invoice.status,
        "payment applied"
    );
    Ok(Json(PaymentResponse {
        message: format!(
            "Payment of ${} processed successfully",
            outcome.payment.amount
        ),
        remaining_balance: outcome.remaining_balance,
        payment: outcome.payment,
        invoice: outcome.invoice,
    }))
}

#[derive(Deserialize)]
struct PurchaseOrderQuery {
    status: Option<PurchaseOrderStatus>,
}

#[derive(Serialize)]
struct PurchaseOrderList {
    purchase_orders: Vec<PurchaseOrder>,
    total: usize,
    timestamp: DateTime<Utc>,
}

async fn list_purchase_orders(
    State(service): State<Arc<Accounting>>,
    Query(query): Query<PurchaseOrderQuery>,
) -> Result<Json<PurchaseOrderList>> {
    let purchase_orders = service.list_purchase_orders(query.status).await?;
    Ok(Json(PurchaseOrderList {
        total: purchase_orders.len(),
        purchase_orders,
        timestamp: Utc::now(),
    }))
}

async fn get_purchase_order(
    State(service): State<Arc<Accounting>>,
    Path(id): Path<String>,
) -> Result<Json<PurchaseOrder>> {
    Ok(Json(service.get_purchase_order(&id).await?))
}

async fn cash_flow(State(service): State<Arc<Accounting>>) -> Result<Json<CashFlowAnalysis>> {
    Ok(Json(service.cash_flow().await?))
}

#[derive(Deserialize)]
struct PaymentsQuery {
    invoice_id: Option<String>,
}

#[derive(Serialize)]
struct PaymentList {
    payments: Vec<Payment>,
}

async fn list_payments(
    State(service): State<Arc<Accounting>>,
    Query(query): Query<PaymentsQuery>,
) -> Result<Json<PaymentList>> {
    let payments = service.list_payments(query.invoice_id.as_deref()).await?;
    Ok(Json(PaymentList { payments }))
}

async fn validate_transaction(
    State(service): State<Arc<Accounting>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationReport>> {
    let report = service.validate(&request).await?;
    info!(
        account = %report.account_number,
        status = ?report.validation_status,
        "transaction validated"
    );
    Ok(Json(report))
}
