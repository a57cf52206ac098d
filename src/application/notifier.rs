use crate::domain::customer::CustomerStatus;
use crate::domain::email::{
    Email, EmailPriority, EmailTemplate, NotificationRule, TriggeredNotification, evaluate_rules,
};
use crate::domain::invoice::ValidationStatus;
use crate::domain::ports::{OutboxRepoBox, RuleRepoBox, TemplateRepoBox};
use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_RECIPIENT: &str = "finance@company.com";

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default = "default_recipient")]
    pub to: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_priority")]
    pub priority: EmailPriority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct SendTemplateRequest {
    pub template: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default = "default_recipient")]
    pub to: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: EmailPriority,
}

fn default_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

fn default_subject() -> String {
    "Payment Processing Notification".to_string()
}

fn default_priority() -> EmailPriority {
    EmailPriority::Normal
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct EmailFilter {
    pub category: Option<String>,
    pub priority: Option<EmailPriority>,
    #[serde(default)]
    pub unread: bool,
}

pub struct EmailListing {
    pub emails: Vec<Email>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EmailStatistics {
    pub total_emails: usize,
    pub unread_emails: usize,
    pub categories: HashMap<String, usize>,
    pub priorities: HashMap<String, usize>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub condition: Value,
    #[serde(default = "default_rule_template")]
    pub template: String,
    #[serde(default = "default_rule_recipients")]
    pub recipients: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: EmailPriority,
    #[serde(default = "default_rule_active")]
    pub active: bool,
}

fn default_rule_template() -> String {
    "payment_mismatch".to_string()
}

fn default_rule_recipients() -> Vec<String> {
    vec![DEFAULT_RECIPIENT.to_string()]
}

fn default_rule_active() -> bool {
    true
}

/// Loosely-structured snapshots of the other services' records, as the
/// caller saw them. Absent customer means the directory lookup failed.
#[derive(Debug, Deserialize, Default)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub transaction: EvaluationTransaction,
    pub customer: Option<EvaluationCustomer>,
    pub validation_result: Option<EvaluationValidation>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EvaluationTransaction {
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub account_number: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct EvaluationCustomer {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<CustomerStatus>,
}

/// Accepts any status string; anything outside the known variants counts as
/// neither active nor suspended.
fn lenient_status<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<CustomerStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let status = Option::<String>::deserialize(deserializer)?;
    Ok(status.and_then(|s| match s.as_str() {
        "active" => Some(CustomerStatus::Active),
        "suspended" => Some(CustomerStatus::Suspended),
        _ => None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EvaluationValidation {
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub should_notify: bool,
    pub notifications: Vec<TriggeredNotification>,
    pub evaluation_timestamp: DateTime<Utc>,
}

/// The email notification service. Sending always succeeds; there is no
/// actual delivery, only the outbox log.
pub struct Notifier {
    outbox: OutboxRepoBox,
    templates: TemplateRepoBox,
    rules: RuleRepoBox,
}

impl Notifier {
    pub fn new(outbox: OutboxRepoBox, templates: TemplateRepoBox, rules: RuleRepoBox) -> Self {
        Self {
            outbox,
            templates,
            rules,
        }
    }

    pub async fn send(&self, request: SendEmailRequest) -> Result<Email> {
        let email = Email {
            id: Uuid::new_v4(),
            to: request.to,
            cc: request.cc,
            subject: request.subject,
            body: request.body,
            priority: request.priority,
            category: request.category,
            template_used: None,
            timestamp: Utc::now(),
            status: "sent".to_string(),
            read: false,
            read_timestamp: None,
            metadata: request.metadata,
        };
        self.outbox.append(email.clone()).await?;
        Ok(email)
    }

    /// Renders a stored template and sends the result. Nothing is stored
    /// when rendering fails.
    pub async fn send_templated(&self, request: SendTemplateRequest) -> Result<Email> {
        let template = self
            .templates
            .get(&request.template)
            .await?
            .ok_or_else(|| ServiceError::TemplateNotFound(request.template.clone()))?;
        let (subject, body) = template.render(&request.data)?;

        let email = Email {
            id: Uuid::new_v4(),
            to: request.to,
            cc: request.cc,
            subject,
            body,
            priority: request.priority,
            category: request.template.clone(),
            template_used: Some(request.template),
            timestamp: Utc::now(),
            status: "sent".to_string(),
            read: false,
            read_timestamp: None,
            metadata: request.data,
        };
        self.outbox.append(email.clone()).await?;
        Ok(email)
    }

    /// Filtered listing, most recent first.
    pub async fn list(&self, filter: &EmailFilter) -> Result<EmailListing> {
        let all = self.outbox.all().await?;
        let unread_count = all.iter().filter(|e| !e.read).count();

        let mut emails = all;
        if let Some(category) = &filter.category {
            emails.retain(|e| &e.category == category);
        }
        if let Some(priority) = filter.priority {
            emails.retain(|e| e.priority == priority);
        }
        if filter.unread {
            emails.retain(|e| !e.read);
        }
        emails.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(EmailListing {
            emails,
            unread_count,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Email> {
        self.outbox
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound("Email"))
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Email> {
        self.outbox
            .mark_read(id)
            .await?
            .ok_or(ServiceError::NotFound("Email"))
    }

    pub async fn templates(&self) -> Result<Vec<EmailTemplate>> {
        self.templates.all().await
    }

    pub async fn statistics(&self) -> Result<EmailStatistics> {
        let emails = self.outbox.all().await?;
        let mut categories: HashMap<String, usize> = HashMap::new();
        let mut priorities: HashMap<String, usize> = HashMap::new();
        for email in &emails {
            *categories.entry(email.category.clone()).or_default() += 1;
            *priorities
                .entry(email.priority.as_str().to_string())
                .or_default() += 1;
        }

        Ok(EmailStatistics {
            total_emails: emails.len(),
            unread_emails: emails.iter().filter(|e| !e.read).count(),
            categories,
            priorities,
            timestamp: Utc::now(),
        })
    }

    pub async fn rules(&self) -> Result<Vec<NotificationRule>> {
        self.rules.all().await
    }

    pub async fn create_rule(&self, request: CreateRuleRequest) -> Result<NotificationRule> {
        let rule = NotificationRule {
            id: Uuid::new_v4(),
            name: request.name,
            condition: request.condition,
            template: request.template,
            recipients: request.recipients,
            priority: request.priority,
            active: request.active,
            created_date: Utc::now(),
        };
        self.rules.append(rule.clone()).await?;
        Ok(rule)
    }

    /// Accumulate-all rule evaluation; see `domain::email::evaluate_rules`.
    /// Read-only: nothing is sent here, callers decide what to do with the
    /// matches.
    pub fn evaluate(&self, request: &EvaluationRequest) -> EvaluationReport {
        // A customer record with a missing or unrecognized status still
        // counts as present; only an absent record triggers unknown_customer.
        let notifications = evaluate_rules(
            request.transaction.amount,
            request
                .customer
                .as_ref()
                .map(|c| c.status.unwrap_or(CustomerStatus::Active)),
            request
                .validation_result
                .as_ref()
                .map(|v| (v.validation_status, v.notes.as_slice())),
        );

        EvaluationReport {
            should_notify: !notifications.is_empty(),
            notifications,
            evaluation_timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{InMemoryOutbox, InMemoryRules, InMemoryTemplates};
    use crate::infrastructure::seed;
    use rust_decimal_macros::dec;
    use serde_json::json;

    async fn notifier() -> Notifier {
        let templates = InMemoryTemplates::new();
        for template in seed::templates() {
            crate::domain::ports::TemplateRepository::store(&templates, template)
                .await
                .unwrap();
        }
        Notifier::new(
            Box::new(InMemoryOutbox::new()),
            Box::new(templates),
            Box::new(InMemoryRules::new()),
        )
    }

    fn suspended_payment_data() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("customer_name".to_string(), json!("Global Manufacturing Inc"));
        data.insert("account_number".to_string(), json!("ACC-123456789"));
        data.insert("amount".to_string(), json!("10000"));
        data.insert(
            "customer_email".to_string(),
            json!("accounts@globalmanuf.com"),
        );
        data
    }

    #[tokio::test]
    async fn test_send_always_succeeds_and_stores() {
        let svc = notifier().await;
        let email = svc
            .send(SendEmailRequest {
                to: default_recipient(),
                cc: vec![],
                subject: "Hello".to_string(),
                body: "World".to_string(),
                priority: EmailPriority::Normal,
                category: "general".to_string(),
                metadata: Map::new(),
            })
            .await
            .unwrap();

        let stored = svc.get(email.id).await.unwrap();
        assert_eq!(stored.subject, "Hello");
        assert!(!stored.read);
    }

    #[tokio::test]
    async fn test_send_templated_renders_fields() {
        let svc = notifier().await;
        let email = svc
            .send_templated(SendTemplateRequest {
                template: "suspended_customer_payment".to_string(),
                data: suspended_payment_data(),
                to: default_recipient(),
                cc: vec![],
                priority: EmailPriority::High,
            })
            .await
            .unwrap();

        assert_eq!(
            email.subject,
            "Payment from Suspended Customer - Global Manufacturing Inc"
        );
        assert!(email.body.contains("ACC-123456789"));
        assert_eq!(email.category, "suspended_customer_payment");
        assert_eq!(
            email.template_used.as_deref(),
            Some("suspended_customer_payment")
        );
    }

    #[tokio::test]
    async fn test_send_templated_unknown_template() {
        let svc = notifier().await;
        let result = svc
            .send_templated(SendTemplateRequest {
                template: "does_not_exist".to_string(),
                data: Map::new(),
                to: default_recipient(),
                cc: vec![],
                priority: EmailPriority::Normal,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::TemplateNotFound(_))));
    }

    #[tokio::test]
    async fn test_send_templated_missing_field_stores_nothing() {
        let svc = notifier().await;
        let result = svc
            .send_templated(SendTemplateRequest {
                template: "suspended_customer_payment".to_string(),
                data: Map::new(),
                to: default_recipient(),
                cc: vec![],
                priority: EmailPriority::Normal,
            })
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::MissingTemplateField(_))
        ));

        let listing = svc.list(&EmailFilter::default()).await.unwrap();
        assert!(listing.emails.is_empty());
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first_and_filters() {
        let svc = notifier().await;
        for (subject, category) in [("a", "general"), ("b", "alerts"), ("c", "general")] {
            svc.send(SendEmailRequest {
                to: default_recipient(),
                cc: vec![],
                subject: subject.to_string(),
                body: String::new(),
                priority: EmailPriority::Normal,
                category: category.to_string(),
                metadata: Map::new(),
            })
            .await
            .unwrap();
        }

        let listing = svc
            .list(&EmailFilter {
                category: Some("general".to_string()),
                priority: None,
                unread: false,
            })
            .await
            .unwrap();
        assert_eq!(listing.emails.len(), 2);
        assert_eq!(listing.unread_count, 3);
        assert!(listing.emails[0].timestamp >= listing.emails[1].timestamp);
    }

    #[tokio::test]
    async fn test_mark_read_then_unread_filter() {
        let svc = notifier().await;
        let email = svc
            .send(SendEmailRequest {
                to: default_recipient(),
                cc: vec![],
                subject: "s".to_string(),
                body: String::new(),
                priority: EmailPriority::Normal,
                category: "general".to_string(),
                metadata: Map::new(),
            })
            .await
            .unwrap();

        svc.mark_read(email.id).await.unwrap();
        let listing = svc
            .list(&EmailFilter {
                category: None,
                priority: None,
                unread: true,
            })
            .await
            .unwrap();
        assert!(listing.emails.is_empty());
        assert_eq!(listing.unread_count, 0);
    }

    #[tokio::test]
    async fn test_statistics_group_by_category_and_priority() {
        let svc = notifier().await;
        for priority in [EmailPriority::High, EmailPriority::High, EmailPriority::Low] {
            svc.send(SendEmailRequest {
                to: default_recipient(),
                cc: vec![],
                subject: "s".to_string(),
                body: String::new(),
                priority,
                category: "alerts".to_string(),
                metadata: Map::new(),
            })
            .await
            .unwrap();
        }

        let stats = svc.statistics().await.unwrap();
        assert_eq!(stats.total_emails, 3);
        assert_eq!(stats.unread_emails, 3);
        assert_eq!(stats.categories.get("alerts"), Some(&3));
        assert_eq!(stats.priorities.get("high"), Some(&2));
        assert_eq!(stats.priorities.get("low"), Some(&1));
    }

    #[tokio::test]
    async fn test_evaluate_collects_all_matches() {
        let svc = notifier().await;
        let report = svc.evaluate(&EvaluationRequest {
            transaction: EvaluationTransaction {
                amount: dec!(75000),
                account_number: "ACC-123456789".to_string(),
            },
            customer: Some(EvaluationCustomer {
                status: Some(CustomerStatus::Suspended),
            }),
            validation_result: Some(EvaluationValidation {
                validation_status: ValidationStatus::AttentionRequired,
                notes: vec!["Customer has 1 overdue invoices".to_string()],
            }),
        });

        assert!(report.should_notify);
        assert_eq!(report.notifications.len(), 3);
    }

    #[tokio::test]
    async fn test_evaluate_statusless_customer_is_not_unknown() {
        let svc = notifier().await;
        let report = svc.evaluate(&EvaluationRequest {
            transaction: EvaluationTransaction {
                amount: dec!(1000),
                account_number: "ACC-789123456".to_string(),
            },
            customer: Some(EvaluationCustomer::default()),
            validation_result: None,
        });

        // Present customer with no usable status: not suspended, not unknown.
        assert!(!report.should_notify);
        assert!(report.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_rules_are_stored_but_never_fire() {
        let svc = notifier().await;
        svc.create_rule(CreateRuleRequest {
            name: "big amounts".to_string(),
            condition: json!({ "amount_threshold": 10000 }),
            template: "payment_mismatch".to_string(),
            recipients: vec![default_recipient()],
            priority: EmailPriority::Normal,
            active: true,
        })
        .await
        .unwrap();

        assert_eq!(svc.rules().await.unwrap().len(), 1);
        // Rule storage has no effect on the outbox.
        let listing = svc.list(&EmailFilter::default()).await.unwrap();
        assert!(listing.emails.is_empty());
    }
}
