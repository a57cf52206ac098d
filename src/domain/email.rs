use crate::domain::customer::CustomerStatus;
use crate::domain::invoice::{HIGH_VALUE_THRESHOLD, ValidationStatus};
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmailPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl EmailPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailPriority::Low => "low",
            EmailPriority::Normal => "normal",
            EmailPriority::High => "high",
            EmailPriority::Urgent => "urgent",
        }
    }
}

/// A sent email. Append-only; the read flag is the only mutable state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Email {
    pub id: Uuid,
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub priority: EmailPriority,
    pub category: String,
    pub template_used: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub read: bool,
    pub read_timestamp: Option<DateTime<Utc>>,
    pub metadata: Map<String, Value>,
}

/// A stored subject/body template with `{field}` placeholders.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// Stored but never evaluated against live data.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NotificationRule {
    pub id: Uuid,
    pub name: String,
    pub condition: Value,
    pub template: String,
    pub recipients: Vec<String>,
    pub priority: EmailPriority,
    pub active: bool,
    pub created_date: DateTime<Utc>,
}

/// A rule match produced by `evaluate_rules`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TriggeredNotification {
    pub template: String,
    pub priority: EmailPriority,
    pub reason: String,
}

impl EmailTemplate {
    /// Renders subject and body, substituting each `{field}` with the value
    /// from `data`. Fails on the first placeholder with no matching field.
    pub fn render(&self, data: &Map<String, Value>) -> Result<(String, String), ServiceError> {
        let subject = substitute(&self.subject, data)?;
        let body = substitute(&self.body, data)?;
        Ok((subject, body))
    }
}

fn substitute(text: &str, data: &Map<String, Value>) -> Result<String, ServiceError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            out.push(ch);
            continue;
        }
        let mut field = String::new();
        for inner in chars.by_ref() {
            if inner == '}' {
                break;
            }
            field.push(inner);
        }
        let value = data
            .get(&field)
            .ok_or(ServiceError::MissingTemplateField(field))?;
        match value {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
    }

    Ok(out)
}

/// Evaluates the notification rule set against a transaction.
///
/// Unlike the harness decision table, these checks are independent: every
/// matching rule is returned, not just the first. A `customer_status` of
/// `None` means no customer record was found.
pub fn evaluate_rules(
    amount: Decimal,
    customer_status: Option<CustomerStatus>,
    validation: Option<(ValidationStatus, &[String])>,
) -> Vec<TriggeredNotification> {
    let mut triggered = Vec::new();

    if amount > HIGH_VALUE_THRESHOLD {
        triggered.push(TriggeredNotification {
            template: "high_value_alert".to_string(),
            priority: EmailPriority::High,
            reason: format!("Transaction amount ${amount} exceeds threshold"),
        });
    }

    if customer_status == Some(CustomerStatus::Suspended) {
        triggered.push(TriggeredNotification {
            template: "suspended_customer_payment".to_string(),
            priority: EmailPriority::High,
            reason: "Payment from suspended customer account".to_string(),
        });
    }

    if customer_status.is_none() {
        triggered.push(TriggeredNotification {
            template: "unknown_customer".to_string(),
            priority: EmailPriority::Urgent,
            reason: "Payment from unknown customer account".to_string(),
        });
    }

    if let Some((status, notes)) = validation {
        if matches!(
            status,
            ValidationStatus::Warning | ValidationStatus::AttentionRequired
        ) {
            triggered.push(TriggeredNotification {
                template: "payment_mismatch".to_string(),
                priority: EmailPriority::Normal,
                reason: "Payment validation issues detected".to_string(),
            });
        }
        // Exact note match; prose that mentions an overpayment does not count.
        if notes.iter().any(|n| n == "overpayment") {
            triggered.push(TriggeredNotification {
                template: "overpayment_alert".to_string(),
                priority: EmailPriority::Normal,
                reason: "Customer overpayment detected".to_string(),
            });
        }
    }

    triggered
}
