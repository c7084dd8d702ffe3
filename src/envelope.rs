use serde::Serialize;

/// Uniform JSON body returned by the ingest endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CreatedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The part of a page-creation response we hand back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Envelope {
    pub fn created(record: CreatedRecord) -> Self {
        Self {
            ok: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
