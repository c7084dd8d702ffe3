use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::envelope::Envelope;
use crate::error::IngestError;
use crate::state::SharedState;
use crate::submission::parser;

pub async fn ingest(
    State(state): State<SharedState>,
    Path(form): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, IngestError> {
    let schema = state
        .forms
        .get(&form)
        .ok_or_else(|| IngestError::UnknownForm(form.clone()))?;

    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(IngestError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!("Unreadable body, treating as empty: {}", rejection.body_text());
            Bytes::new()
        }
    };

    let submission = parser::decode(&headers, body).await;

    let credentials = state
        .config
        .notion
        .credentials()
        .ok_or(IngestError::NotConfigured)?;

    let properties = schema.map(&submission);
    tracing::debug!(
        "Form {form}: {} input fields mapped to {} properties",
        submission.len(),
        properties.len()
    );

    let record = state.notion.create_page(credentials, &properties).await?;

    Ok((StatusCode::CREATED, Json(Envelope::created(record))).into_response())
}

/// CORS preflight. The CORS middleware adds the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> IngestError {
    IngestError::MethodNotAllowed
}
