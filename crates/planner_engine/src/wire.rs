//! JSON bodies exchanged with the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub db_document_count: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlanBody<'a> {
    pub additional_guidance: &'a str,
    /// Serialized as `YYYY-MM-DD`.
    pub target_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanResponse {
    pub plan: String,
}

/// Pulls a string `detail` out of an error body. Anything else yields `None`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
