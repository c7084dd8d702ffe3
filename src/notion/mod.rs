pub mod properties;

use serde::{Deserialize, Serialize};

use crate::config::{NotionCredentials, NOTION_VERSION};
use crate::envelope::CreatedRecord;
use crate::error::IngestError;

use properties::RecordProperties;

/// Body of a `POST /v1/pages` call that creates a database row.
#[derive(Debug, Serialize)]
pub struct CreatePage<'a> {
    pub parent: Parent<'a>,
    pub properties: &'a RecordProperties,
}

#[derive(Debug, Serialize)]
pub struct Parent<'a> {
    pub database_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    id: Option<String>,
}

pub struct NotionClient {
    client: reqwest::Client,
    api_url: String,
}

impl NotionClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Create one page in the target database. Not retried.
    pub async fn create_page(
        &self,
        credentials: NotionCredentials<'_>,
        properties: &RecordProperties,
    ) -> Result<CreatedRecord, IngestError> {
        let payload = CreatePage {
            parent: Parent {
                database_id: credentials.database_id,
            },
            properties,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(credentials.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(IngestError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let page: PageResponse = resp.json().await?;
        tracing::info!("Created Notion page {}", page.id.as_deref().unwrap_or("<no id>"));
        Ok(CreatedRecord { id: page.id })
    }
}
