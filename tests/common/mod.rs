use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use formrelay::config::{default_allowed_origins, Config, NotionConfig};

pub const TEST_TOKEN: &str = "secret_test_token";
pub const TEST_DB_ID: &str = "0b2f4a6c8e1d4f3a9b7c5d3e1f2a4b6c";

/// A request received by the mock Notion API.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
    reply: Mutex<Option<(u16, String)>>,
}

/// Stand-in for `POST /v1/pages` that records calls and answers with a
/// scripted status and body.
#[derive(Clone)]
pub struct MockNotion {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockNotion {
    pub fn url(&self) -> String {
        format!("http://{}/v1/pages", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.recorded.lock().unwrap().last().cloned()
    }

    /// Reply to subsequent calls with this status and raw body.
    pub fn respond_with(&self, status: u16, body: &str) {
        *self.state.reply.lock().unwrap() = Some((status, body.to_string()));
    }
}

async fn create_page(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .recorded
        .lock()
        .unwrap()
        .push(RecordedCall { headers, body });

    let (status, body) = state
        .reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or((200, json!({ "object": "page", "id": "abc123" }).to_string()));

    (
        StatusCode::from_u16(status).unwrap(),
        [("content-type", "application/json")],
        body,
    )
}

pub async fn spawn_mock_notion() -> MockNotion {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/v1/pages", post(create_page))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock Notion");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock Notion failed");
    });

    MockNotion { addr, state }
}

/// A running relay wired to its own mock Notion.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub notion: MockNotion,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST JSON to a form, return (body, status).
    pub async fn submit_json(&self, form: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/{form}")))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST form-urlencoded data to a form, return (body, status).
    pub async fn submit_form(&self, form: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/{form}")))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Send an arbitrary request with an optional Origin header.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        origin: Option<&str>,
    ) -> reqwest::Response {
        let mut req = self.client.request(method, self.url(path));
        if let Some(origin) = origin {
            req = req.header("origin", origin);
        }
        req.send().await.expect("request failed")
    }

    /// The `properties` object of the last page sent to Notion.
    pub fn last_properties(&self) -> Value {
        self.notion
            .last_call()
            .expect("no call reached Notion")
            .body["properties"]
            .clone()
    }
}

pub fn test_config(notion: &MockNotion) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        allowed_origins: default_allowed_origins(),
        forms_file: None,
        notion: NotionConfig {
            api_url: notion.url(),
            token: Some(TEST_TOKEN.to_string()),
            database_id: Some(TEST_DB_ID.to_string()),
        },
    }
}

/// Spawn the relay with credentials set.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the relay after adjusting its configuration.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let notion = spawn_mock_notion().await;
    let mut config = test_config(&notion);
    configure(&mut config);

    let state = formrelay::build_state(config).expect("Failed to build state");
    let app = formrelay::build_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        notion,
    }
}

/// Write a forms file to a unique temp path.
#[allow(dead_code)]
pub fn write_forms_file(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "formrelay_forms_{}_{}.json",
        std::process::id(),
        FORMS_FILE_SEQ.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::write(&path, contents).expect("Failed to write forms file");
    path
}

static FORMS_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);
