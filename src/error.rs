use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),
    #[error("Missing template data: '{0}'")]
    MissingTemplateField(String),
    #[error("Account number required")]
    MissingAccountNumber,
    #[error("Payment would exceed credit limit")]
    CreditLimitExceeded {
        available_credit: Decimal,
        attempted_balance: Decimal,
    },
    #[error("Payment amount exceeds outstanding balance")]
    OverpaymentRejected {
        outstanding_amount: Decimal,
        payment_amount: Decimal,
        overpayment: Decimal,
    },
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            // An unknown template is reported as a client error, not a
            // missing resource.
            ServiceError::TemplateNotFound(_)
            | ServiceError::MissingTemplateField(_)
            | ServiceError::MissingAccountNumber => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ServiceError::CreditLimitExceeded {
                available_credit,
                attempted_balance,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.to_string(),
                    "available_credit": available_credit,
                    "attempted_balance": attempted_balance,
                }),
            ),
            ServiceError::OverpaymentRejected {
                outstanding_amount,
                payment_amount,
                overpayment,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.to_string(),
                    "outstanding_amount": outstanding_amount,
                    "payment_amount": payment_amount,
                    "overpayment": overpayment,
                }),
            ),
            ServiceError::Upstream(_) | ServiceError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ServiceError::NotFound("Customer").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_template_maps_to_400() {
        let response = ServiceError::TemplateNotFound("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_overpayment_maps_to_400() {
        let response = ServiceError::OverpaymentRejected {
            outstanding_amount: dec!(100.0),
            payment_amount: dec!(150.0),
            overpayment: dec!(50.0),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
