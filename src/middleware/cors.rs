use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ORIGIN, VARY,
};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::SharedState;

/// The origin to echo back: the request's own if allow-listed, otherwise
/// the first allow-listed origin.
pub fn allow_origin<'a>(allowed: &'a [String], origin: Option<&str>) -> Option<&'a str> {
    origin
        .and_then(|o| allowed.iter().find(|a| a.as_str() == o))
        .or_else(|| allowed.first())
        .map(|s| s.as_str())
}

/// Middleware that stamps the CORS headers on every response, preflight and
/// errors included.
pub async fn apply_cors(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    if let Some(allow) = allow_origin(&state.config.allowed_origins, origin.as_deref())
        .and_then(|a| HeaderValue::from_str(a).ok())
    {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow);
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    response
}
