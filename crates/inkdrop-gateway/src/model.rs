use inkdrop_core::FieldViolation;
use inkdrop_service::PasteView;
use jiff::Timestamp;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PasteResponse {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<String>,
}

impl From<PasteView> for PasteResponse {
    fn from(view: PasteView) -> Self {
        Self {
            content: view.content,
            remaining_views: view.remaining_views,
            expires_at: view.expires_at.map(format_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub message: String,
}

impl From<&FieldViolation> for ErrorDetail {
    fn from(violation: &FieldViolation) -> Self {
        Self {
            field: violation.field.clone(),
            message: violation.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(error: &'static str) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-01T00:00:10.000Z`.
pub fn format_timestamp(ts: Timestamp) -> String {
    format!("{ts:.3}")
}
