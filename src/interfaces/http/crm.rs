use crate::application::directory::{BalanceUpdate, CustomerDirectory, CustomerFilter};
use crate::domain::customer::{CreditCheck, Customer, LedgerEntry};
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

pub fn router(service: Arc<CustomerDirectory>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/customers", get(list_customers))
        .route(
            "/api/customers/by-account/:account_number",
            get(get_by_account),
        )
        .route("/api/customers/:id", get(get_customer))
        .route("/api/customers/:id/credit-check", get(credit_check))
        .route("/api/customers/:id/update-balance", post(update_balance))
        .route("/api/transactions", get(list_transactions))
        .with_state(service)
}

async fn health() -> Json<Health> {
    health_response("CRM System")
}

#[derive(Serialize)]
struct CustomerList {
    customers: Vec<Customer>,
    total: usize,
    timestamp: DateTime<Utc>,
}

async fn list_customers(
    State(service): State<Arc<CustomerDirectory>>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<CustomerList>> {
    let customers = service.list(&filter).await?;
    Ok(Json(CustomerList {
        total: customers.len(),
        customers,
        timestamp: Utc::now(),
    }))
}

async fn get_customer(
    State(service): State<Arc<CustomerDirectory>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>> {
    Ok(Json(service.get(&id).await?))
}

async fn get_by_account(
    State(service): State<Arc<CustomerDirectory>>,
    Path(account_number): Path<String>,
) -> Result<Json<Customer>> {
    Ok(Json(service.get_by_account(&account_number).await?))
}

#[derive(Deserialize)]
struct CreditCheckQuery {
    #[serde(default)]
    amount: Decimal,
}

async fn credit_check(
    State(service): State<Arc<CustomerDirectory>>,
    Path(id): Path<String>,
    Query(query): Query<CreditCheckQuery>,
) -> Result<Json<CreditCheck>> {
    Ok(Json(service.credit_check(&id, query.amount).await?))
}

#[derive(Serialize)]
struct BalanceUpdateResponse {
    transaction: LedgerEntry,
    customer: Customer,
    balance_change: Decimal,
}

async fn update_balance(
    State(service): State<Arc<CustomerDirectory>>,
    Path(id): Path<String>,
    Json(update): Json<BalanceUpdate>,
) -> Result<Json<BalanceUpdateResponse>> {
    let outcome = service.update_balance(&id, update).await?;
    info!(
        customer_id = %outcome.customer.id,
        kind = ?outcome.entry.kind,
        amount = %outcome.entry.amount,
        new_balance = %outcome.entry.new_balance,
        "balance updated"
    );
    Ok(Json(BalanceUpdateResponse {
        transaction: outcome.entry,
        customer: outcome.customer,
        balance_change: outcome.balance_change,
    }))
}

#[derive(Deserialize)]
struct TransactionsQuery {
    customer_id: Option<String>,
}

#[derive(Serialize)]
struct TransactionList {
    transactions: Vec<LedgerEntry>,
}

async fn list_transactions(
    State(service): State<Arc<CustomerDirectory>>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionList>> {
    let transactions = service.transactions(query.customer_id.as_deref()).await?;
    Ok(Json(TransactionList { transactions }))
}
