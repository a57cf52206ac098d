//! Cross-service scenario runner.
//!
//! Chains customer lookup, invoice lookup, and transaction validation across
//! the three services, applies the decision table, and triggers a templated
//! notification where the outcome calls for one. A dead upstream marks that
//! step failed but never aborts the remaining steps.

pub mod decision;
pub mod scenarios;

use crate::domain::customer::Customer;
use crate::domain::invoice::ValidationReport;
use crate::error::Result;
use crate::harness::decision::{Decision, Outcome, decide};
use crate::harness::scenarios::{Scenario, ScenarioTransaction};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

const CALL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub crm_url: String,
    pub accounting_url: String,
    pub notifier_url: String,
}

/// Outcome of one step in the chain, kept for the report.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: &'static str,
    pub success: bool,
    pub error: Option<String>,
}

impl StepRecord {
    fn ok(step: &'static str) -> Self {
        Self {
            step,
            success: true,
            error: None,
        }
    }

    fn failed(step: &'static str, error: String) -> Self {
        warn!(step, %error, "step failed");
        Self {
            step,
            success: false,
            error: Some(error),
        }
    }
}

#[derive(Debug)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub expected: Outcome,
    pub actual: Outcome,
    pub passed: bool,
    pub decision: Decision,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Default)]
pub struct HarnessSummary {
    pub results: Vec<ScenarioResult>,
}

impl HarnessSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn print_report(&self) {
        println!("=== scenario report ===");
        for result in &self.results {
            let mark = if result.passed { "PASS" } else { "FAIL" };
            println!(
                "{mark} {name}: expected {expected}, got {actual} (confidence {confidence:.2})",
                name = result.name,
                expected = result.expected,
                actual = result.actual,
                confidence = result.decision.confidence,
            );
            for step in &result.steps {
                if let Some(error) = &step.error {
                    println!("  - {}: {}", step.step, error);
                }
            }
        }
        println!(
            "{} passed, {} failed, {} total",
            self.passed(),
            self.failed(),
            self.results.len()
        );
    }
}

pub struct Harness {
    client: reqwest::Client,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(CALL_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Pings every service's health endpoint. Scenarios can still run with a
    /// service down; its steps just come back failed.
    pub async fn check_health(&self) -> bool {
        let mut healthy = true;
        for (name, base) in [
            ("crm", &self.config.crm_url),
            ("accounting", &self.config.accounting_url),
            ("notifier", &self.config.notifier_url),
        ] {
            let url = format!("{base}/api/health");
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(service = name, "service healthy");
                }
                Ok(response) => {
                    warn!(service = name, status = %response.status(), "unhealthy service");
                    healthy = false;
                }
                Err(error) => {
                    warn!(service = name, %error, "service unreachable");
                    healthy = false;
                }
            }
        }
        healthy
    }

    async fn lookup_customer(&self, account_number: &str) -> (StepRecord, Option<Customer>) {
        let url = format!(
            "{}/api/customers/by-account/{account_number}",
            self.config.crm_url
        );
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<Customer>().await {
                    Ok(customer) => (StepRecord::ok("customer_lookup"), Some(customer)),
                    Err(error) => (
                        StepRecord::failed("customer_lookup", error.to_string()),
                        None,
                    ),
                }
            }
            Ok(response) => (
                StepRecord::failed(
                    "customer_lookup",
                    format!("Customer not found (Status: {})", response.status().as_u16()),
                ),
                None,
            ),
            Err(error) => (
                StepRecord::failed("customer_lookup", format!("CRM API Error: {error}")),
                None,
            ),
        }
    }

    async fn fetch_invoices(&self, account_number: &str) -> StepRecord {
        let url = format!(
            "{}/api/invoices/by-account/{account_number}",
            self.config.accounting_url
        );
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => StepRecord::ok("invoice_lookup"),
            Ok(response) => StepRecord::failed(
                "invoice_lookup",
                format!("Invoices not found (Status: {})", response.status().as_u16()),
            ),
            Err(error) => {
                StepRecord::failed("invoice_lookup", format!("ERP API Error: {error}"))
            }
        }
    }

    async fn validate(
        &self,
        transaction: &ScenarioTransaction,
    ) -> (StepRecord, Option<ValidationReport>) {
        let url = format!(
            "{}/api/financial/validate-transaction",
            self.config.accounting_url
        );
        let payload = json!({
            "account_number": transaction.account_number,
            "amount": transaction.amount,
            "type": "payment",
        });
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<ValidationReport>().await {
                    Ok(report) => (StepRecord::ok("transaction_validation"), Some(report)),
                    Err(error) => (
                        StepRecord::failed("transaction_validation", error.to_string()),
                        None,
                    ),
                }
            }
            Ok(response) => (
                StepRecord::failed(
                    "transaction_validation",
                    format!("Validation failed (Status: {})", response.status().as_u16()),
                ),
                None,
            ),
            Err(error) => (
                StepRecord::failed(
                    "transaction_validation",
                    format!("Validation API Error: {error}"),
                ),
                None,
            ),
        }
    }

    /// Templates per outcome; auto-processed transactions stay quiet.
    fn template_for(outcome: Outcome) -> Option<&'static str> {
        match outcome {
            Outcome::ManualReview => Some("unknown_customer"),
            Outcome::Hold => Some("suspended_customer_payment"),
            Outcome::ReviewAndProcess | Outcome::Error => Some("payment_mismatch"),
            Outcome::AutoProcess => None,
        }
    }

    async fn notify(
        &self,
        transaction: &ScenarioTransaction,
        customer: Option<&Customer>,
        decision: &Decision,
    ) -> StepRecord {
        let Some(template) = Self::template_for(decision.outcome) else {
            return StepRecord::ok("notification");
        };

        let (name, email, status) = match customer {
            Some(c) => (c.name.as_str(), c.email.as_str(), c.status.as_str()),
            None => ("Unknown Customer", "unknown@example.com", "unknown"),
        };

        let url = format!("{}/api/send-template-email", self.config.notifier_url);
        let payload = json!({
            "template": template,
            "data": {
                "transaction_id": transaction.transaction_id,
                "account_number": transaction.account_number,
                "amount": transaction.amount.to_string(),
                "transaction_date": chrono::Utc::now().to_rfc3339(),
                "reference": transaction.reference,
                "customer_name": name,
                "customer_email": email,
                "customer_status": status,
                "issue_description": decision.reasons.join("; "),
                "action_required": decision.next_steps.join("; "),
                "outstanding_invoices": "See accounting service for details",
                "description": transaction.description,
            },
        });
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => StepRecord::ok("notification"),
            Ok(response) => StepRecord::failed(
                "notification",
                format!("Email failed (Status: {})", response.status().as_u16()),
            ),
            Err(error) => {
                StepRecord::failed("notification", format!("Email API Error: {error}"))
            }
        }
    }

    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        info!(scenario = scenario.name, summary = scenario.summary, "running scenario");
        let transaction = &scenario.transaction;
        let mut steps = Vec::new();

        let (customer_step, customer) = self.lookup_customer(transaction.account_number).await;
        steps.push(customer_step);

        steps.push(self.fetch_invoices(transaction.account_number).await);

        let (validation_step, validation) = self.validate(transaction).await;
        steps.push(validation_step);

        let decision = decide(transaction.amount, customer.as_ref(), validation.as_ref());
        info!(
            scenario = scenario.name,
            outcome = %decision.outcome,
            confidence = decision.confidence,
            "decision made"
        );

        steps.push(self.notify(transaction, customer.as_ref(), &decision).await);

        ScenarioResult {
            name: scenario.name,
            expected: scenario.expected,
            actual: decision.outcome,
            passed: decision.outcome == scenario.expected,
            decision,
            steps,
        }
    }

    pub async fn run_all(&self) -> HarnessSummary {
        let mut summary = HarnessSummary::default();
        for scenario in scenarios::builtin() {
            let result = self.run_scenario(&scenario).await;
            summary.results.push(result);
        }
        summary
    }
}
