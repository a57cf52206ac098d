pub mod accounting;
pub mod crm;
pub mod notifier;

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub(crate) fn health_response(service: &'static str) -> Json<Health> {
    Json(Health {
        status: "healthy",
        service,
        timestamp: Utc::now(),
    })
}
