use crate::application::notifier::{
    CreateRuleRequest, EmailFilter, EmailStatistics, EvaluationReport, EvaluationRequest,
    Notifier, SendEmailRequest, SendTemplateRequest,
};
use crate::domain::email::{Email, NotificationRule};
use crate::error::Result;
use crate::interfaces::http::{Health, health_response};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub fn router(service: Arc<Notifier>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/send-email", post(send_email))
        .route("/api/send-template-email", post(send_template_email))
        .route("/api/emails", get(list_emails))
        .route("/api/emails/:id", get(get_email))
        .route("/api/emails/:id/mark-read", post(mark_read))
        .route("/api/templates", get(list_templates))
        .route("/api/statistics", get(statistics))
        .route(
            "/api/notification-rules",
            get(list_rules).post(create_rule),
        )
        .route("/api/evaluate-notification", post(evaluate))
        .with_state(service)
}

async fn health() -> Json<Health> {
    health_response("Email Notification System")
}

#[derive(Serialize)]
struct SendResponse {
    message: &'static str,
    email_id: Uuid,
    timestamp: DateTime<Utc>,
}

async fn send_email(
    State(service): State<Arc<Notifier>>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendResponse>> {
    let email = service.send(request).await?;
    info!(email_id = %email.id, to = %email.to, category = %email.category, "email sent");
    Ok(Json(SendResponse {
        message: "Email sent successfully",
        email_id: email.id,
        timestamp: email.timestamp,
    }))
}

#[derive(Serialize)]
struct SendTemplateResponse {
    message: &'static str,
    email_id: Uuid,
    template: String,
    timestamp: DateTime<Utc>,
}

async fn send_template_email(
    State(service): State<Arc<Notifier>>,
    Json(request): Json<SendTemplateRequest>,
) -> Result<Json<SendTemplateResponse>> {
    let email = service.send_templated(request).await?;
    info!(email_id = %email.id, template = ?email.template_used, "template email sent");
    Ok(Json(SendTemplateResponse {
        message: "Template email sent successfully",
        email_id: email.id,
        template: email.category,
        timestamp: email.timestamp,
    }))
}

#[derive(Serialize)]
struct EmailList {
    emails: Vec<Email>,
    total: usize,
    unread_count: usize,
}

async fn list_emails(
    State(service): State<Arc<Notifier>>,
    Query(filter): Query<EmailFilter>,
) -> Result<Json<EmailList>> {
    let listing = service.list(&filter).await?;
    Ok(Json(EmailList {
        total: listing.emails.len(),
        emails: listing.emails,
        unread_count: listing.unread_count,
    }))
}

async fn get_email(
    State(service): State<Arc<Notifier>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Email>> {
    Ok(Json(service.get(id).await?))
}

async fn mark_read(
    State(service): State<Arc<Notifier>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let email = service.mark_read(id).await?;
    Ok(Json(json!({
        "message": "Email marked as read",
        "email_id": email.id,
    })))
}

async fn list_templates(State(service): State<Arc<Notifier>>) -> Result<Json<Value>> {
    let mut templates = serde_json::Map::new();
    for template in service.templates().await? {
        let description = format!(
            "Template for {} notifications",
            template.name.replace('_', " ")
        );
        templates.insert(
            template.name,
            json!({ "subject": template.subject, "description": description }),
        );
    }
    Ok(Json(json!({ "templates": templates })))
}

async fn statistics(State(service): State<Arc<Notifier>>) -> Result<Json<EmailStatistics>> {
    Ok(Json(service.statistics().await?))
}

#[derive(Serialize)]
struct RuleList {
    rules: Vec<NotificationRule>,
}

async fn list_rules(State(service): State<Arc<Notifier>>) -> Result<Json<RuleList>> {
    Ok(Json(RuleList {
        rules: service.rules().await?,
    }))
}

async fn create_rule(
    State(service): State<Arc<Notifier>>,
    Json(request): Json<CreateRuleRequest>,
) -> Result<Json<Value>> {
    let rule = service.create_rule(request).await?;
    info!(rule_id = %rule.id, name = %rule.name, "notification rule created");
    Ok(Json(json!({
        "message": "Notification rule created",
        "rule_id": rule.id,
    })))
}

async fn evaluate(
    State(service): State<Arc<Notifier>>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationReport>> {
    Ok(Json(service.evaluate(&request)))
}
