use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::envelope::Envelope;

#[derive(Debug)]
pub enum IngestError {
    NotConfigured,
    MethodNotAllowed,
    UnknownForm(String),
    PayloadTooLarge,
    Rejected { status: u16, body: String },
    Transport(String),
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IngestError::UnknownForm(_) => StatusCode::NOT_FOUND,
            IngestError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::NotConfigured
            | IngestError::Rejected { .. }
            | IngestError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` member of the response envelope.
    pub fn message(&self) -> String {
        match self {
            IngestError::NotConfigured => "Server not configured".to_string(),
            IngestError::MethodNotAllowed => "Method Not Allowed".to_string(),
            IngestError::UnknownForm(name) => format!("Unknown form: {name}"),
            IngestError::PayloadTooLarge => "Payload Too Large".to_string(),
            // Downstream bodies are surfaced verbatim.
            IngestError::Rejected { body, .. } => body.clone(),
            IngestError::Transport(msg) if msg.trim().is_empty() => "Unknown error".to_string(),
            IngestError::Transport(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::NotConfigured => write!(f, "Not Configured: NOTION_TOKEN or NOTION_DB_ID missing"),
            IngestError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            IngestError::UnknownForm(name) => write!(f, "Not Found: unknown form {name}"),
            IngestError::PayloadTooLarge => write!(f, "Payload Too Large"),
            IngestError::Rejected { status, body } => write!(f, "Rejected ({status}): {body}"),
            IngestError::Transport(msg) => write!(f, "Transport Error: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match &self {
            IngestError::NotConfigured => tracing::warn!("{self}"),
            IngestError::Rejected { .. } | IngestError::Transport(_) => tracing::error!("{self}"),
            IngestError::MethodNotAllowed
            | IngestError::UnknownForm(_)
            | IngestError::PayloadTooLarge => tracing::debug!("{self}"),
        }

        let body = Envelope::failed(self.message());
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        IngestError::Transport(err.to_string())
    }
}
