use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use paydesk::infrastructure::seed;
use paydesk::interfaces::http::accounting;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    let service = seed::seeded_accounting().await.unwrap();
    accounting::router(Arc::new(service))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app().await, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "ERP System");
}

#[tokio::test]
async fn test_list_invoices_with_status_filter() {
    let (status, body) = get(app().await, "/api/invoices?status=overdue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["invoices"][0]["id"], "INV-2025-002");
}

#[tokio::test]
async fn test_invoices_by_account() {
    let (status, body) = get(app().await, "/api/invoices/by-account/ACC-789123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["account_number"], "ACC-789123456");
    assert_eq!(body["invoices"][0]["amount"], "12500.00");
}

#[tokio::test]
async fn test_invoices_by_account_unknown_is_empty_not_404() {
    let (status, body) = get(app().await, "/api/invoices/by-account/ACC-999888777").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_unknown_invoice_is_404() {
    let (status, body) = get(app().await, "/api/invoices/INV-9999-999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_full_payment_marks_invoice_paid() {
    let service = app().await;
    let (status, body) = post(
        service.clone(),
        "/api/invoices/INV-2025-001/payment",
        json!({ "amount": "12500.00", "reference": "TXN-PERFECT-001" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["status"], "paid");
    assert_eq!(body["remaining_balance"], "0.00");
    assert_eq!(body["message"], "Payment of $12500.00 processed successfully");

    let (_, payments) = get(service, "/api/payments?invoice_id=INV-2025-001").await;
    assert_eq!(payments["payments"].as_array().unwrap().len(), 1);
    assert_eq!(payments["payments"][0]["outstanding_after"], "0.00");
}

#[tokio::test]
async fn test_partial_then_final_payment() {
    let service = app().await;
    let (status, body) = post(
        service.clone(),
        "/api/invoices/INV-2025-002/payment",
        json!({ "amount": "5000.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["status"], "partially_paid");
    assert_eq!(body["remaining_balance"], "3750.00");

    let (status, body) = post(
        service,
        "/api/invoices/INV-2025-002/payment",
        json!({ "amount": "3750.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["status"], "paid");
}

#[tokio::test]
async fn test_overpayment_rejected_with_diagnostics() {
    let service = app().await;
    let (status, body) = post(
        service.clone(),
        "/api/invoices/INV-2025-001/payment",
        json!({ "amount": "25000.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["outstanding_amount"], "12500.00");
    assert_eq!(body["payment_amount"], "25000.00");
    assert_eq!(body["overpayment"], "12500.00");

    // Nothing was recorded.
    let (_, invoice) = get(service.clone(), "/api/invoices/INV-2025-001").await;
    assert_eq!(invoice["status"], "pending");
    let (_, payments) = get(service, "/api/payments").await;
    assert!(payments["payments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_purchase_orders_status_filter() {
    let (status, body) = get(app().await, "/api/purchase-orders?status=approved").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["purchase_orders"][0]["id"], "PO-2025-101");
}

#[tokio::test]
async fn test_cash_flow_analysis() {
    let (status, body) = get(app().await, "/api/cash-flow/analysis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["pending_receivables"], "66250.00");
    assert_eq!(body["summary"]["total_payables"], "25000.00");
    assert_eq!(body["summary"]["net_cash_flow"], "41250.00");
    assert_eq!(body["summary"]["overdue_count"], 1);
    assert_eq!(body["overdue_invoices"][0]["id"], "INV-2025-002");
}

#[tokio::test]
async fn test_validate_exact_match_is_approved() {
    let (status, body) = post(
        app().await,
        "/api/financial/validate-transaction",
        json!({ "account_number": "ACC-789123456", "amount": "12500.00", "type": "payment" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validation_status"], "approved");
    assert_eq!(body["invoice_count"], 1);
}

#[tokio::test]
async fn test_validate_overpayment_is_warning() {
    let (status, body) = post(
        app().await,
        "/api/financial/validate-transaction",
        json!({ "account_number": "ACC-789123456", "amount": "25000.00", "type": "payment" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validation_status"], "warning");
}

#[tokio::test]
async fn test_validate_overdue_account_needs_attention() {
    let (status, body) = post(
        app().await,
        "/api/financial/validate-transaction",
        json!({ "account_number": "ACC-456789123", "amount": "5000.00", "type": "payment" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validation_status"], "attention_required");
}

#[tokio::test]
async fn test_validate_missing_account_number_is_400() {
    let (status, body) = post(
        app().await,
        "/api/financial/validate-transaction",
        json!({ "amount": "100.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Account number required");
}
