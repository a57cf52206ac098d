use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::invoice::{HIGH_VALUE_THRESHOLD, ValidationReport, ValidationStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the harness decides to do with a transaction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AutoProcess,
    ReviewAndProcess,
    ManualReview,
    Hold,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::AutoProcess => "auto_process",
            Outcome::ReviewAndProcess => "review_and_process",
            Outcome::ManualReview => "manual_review",
            Outcome::Hold => "hold",
            Outcome::Error => "error",
        };
        f.write_str(s)
    }
}

/// A classified transaction. Confidence, reasons, and next steps are for
/// display only; nothing downstream branches on them.
#[derive(Debug, Serialize, Clone)]
pub struct Decision {
    pub outcome: Outcome,
    pub confidence: f32,
    pub reasons: Vec<String>,
    pub next_steps: Vec<String>,
}

impl Decision {
    fn new(outcome: Outcome, confidence: f32, reason: &str, next_step: &str) -> Self {
        Self {
            outcome,
            confidence,
            reasons: vec![reason.to_string()],
            next_steps: vec![next_step.to_string()],
        }
    }
}

/// The harness decision table.
///
/// First match wins, in this fixed order: missing customer, suspended
/// customer, non-positive amount, high value, then the validation status.
/// This deliberately differs from the notifier's rule evaluator, which
/// accumulates every match.
pub fn decide(
    amount: Decimal,
    customer: Option<&Customer>,
    validation: Option<&ValidationReport>,
) -> Decision {
    let Some(customer) = customer else {
        return Decision::new(
            Outcome::ManualReview,
            0.0,
            "Customer not found in CRM",
            "Research customer or return payment",
        );
    };

    if customer.status == CustomerStatus::Suspended {
        return Decision::new(
            Outcome::Hold,
            0.9,
            "Customer account is suspended",
            "Contact customer service team",
        );
    }

    if amount <= Decimal::ZERO {
        return Decision::new(
            Outcome::Error,
            1.0,
            "Invalid transaction amount",
            "Reject transaction",
        );
    }

    if amount > HIGH_VALUE_THRESHOLD {
        return Decision::new(
            Outcome::ManualReview,
            0.3,
            "High value payment requires manual approval",
            "Manager approval required",
        );
    }

    match validation {
        Some(report) => match report.validation_status {
            ValidationStatus::Approved => Decision::new(
                Outcome::AutoProcess,
                0.95,
                "All validations passed",
                "Process payment automatically",
            ),
            ValidationStatus::Warning => Decision {
                outcome: Outcome::ReviewAndProcess,
                confidence: 0.7,
                reasons: report.notes.clone(),
                next_steps: vec!["Review payment amount vs outstanding invoices".to_string()],
            },
            _ => Decision {
                outcome: Outcome::ManualReview,
                confidence: 0.3,
                reasons: report.notes.clone(),
                next_steps: vec!["Manual review required".to_string()],
            },
        },
        None => Decision::new(
            Outcome::ManualReview,
            0.2,
            "Unable to validate transaction",
            "Manual validation required",
        ),
    }
}
