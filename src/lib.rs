pub mod config;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod notion;
pub mod routes;
pub mod schema;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::cors::apply_cors;
use crate::notion::NotionClient;
use crate::schema::FormRegistry;
use crate::state::{AppState, SharedState};

/// Resolve the form schemas and Notion client for a configuration.
pub fn build_state(config: Config) -> Result<SharedState, String> {
    let mut forms = FormRegistry::builtin();
    if let Some(path) = &config.forms_file {
        forms.merge_file(path)?;
        tracing::info!("Loaded forms file {}", path.display());
    }
    tracing::info!("Serving forms: {}", forms.names().join(", "));

    if config.notion.credentials().is_none() {
        tracing::warn!("NOTION_TOKEN or NOTION_DB_ID not set; submissions will fail");
    }

    let notion = NotionClient::new(config.notion.api_url.clone())?;
    tracing::info!("Relaying submissions to {}", notion.api_url());

    Ok(Arc::new(AppState {
        config,
        forms,
        notion,
    }))
}

pub fn build_app(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::ingest_routes())
        .route(
            "/health",
            axum::routing::get(health).fallback(routes::ingest::method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(state.clone(), apply_cors))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
