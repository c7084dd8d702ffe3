pub mod ingest;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

/// `/{form}` accepts POST submissions for any registered form.
pub fn ingest_routes() -> Router<SharedState> {
    Router::new().route(
        "/{form}",
        post(ingest::ingest)
            .options(ingest::preflight)
            .fallback(ingest::method_not_allowed),
    )
}
