//! HTTP contract of the two read routes, exercised through the router.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use bankbridge_client::{RemoteAggregator, RemoteBankClient, WorkerPool};
use bankbridge_core::{EndpointDirectory, Record, RecordStore};
use bankbridge_server::{build_router, AppState, LOCAL_BANKS_PATH, REMOTE_BANKS_PATH};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

const PUBLIC_URL: &str = "http://localhost:8080";

// ── Helpers ────────────────────────────────────────────────────

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn mock_remotes() -> SocketAddr {
    let router = Router::new()
        .route(
            "/rbb",
            get(|| async { r#"{"bic":"1234","countryCode":"GB","auth":"OAUTH"}"# }),
        )
        .route(
            "/cs",
            get(|| async { r#"{"bic":"5678","countryCode":"CH","auth":"OpenID"}"# }),
        );
    serve(router).await
}

async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn seeded_store() -> Arc<RecordStore> {
    let store = RecordStore::new();
    store.load(vec![
        Record::new("5678", "Credit Sweets").unwrap(),
        Record::new("9870", "Banco de espiritu santo").unwrap(),
        Record::new("1234", "Royal Bank of Boredom").unwrap(),
    ]);
    Arc::new(store)
}

fn state(store: Arc<RecordStore>, directory: EndpointDirectory) -> AppState {
    let aggregator = RemoteAggregator::new(
        RemoteBankClient::new().unwrap(),
        WorkerPool::new(4),
        Some(Duration::from_secs(5)),
    );
    AppState::new(store, Arc::new(directory), aggregator, PUBLIC_URL)
}

fn app(store: Arc<RecordStore>, directory: EndpointDirectory) -> Router {
    build_router(state(store, directory))
}

/// Log sink shared between the subscriber and the test body.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn get_path(app: Router, path: &str) -> (StatusCode, Option<String>, Value) {
    let resp = app
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, serde_json::from_slice(&bytes).unwrap())
}

fn contains_exactly(actual: &Value, expected: &[Value]) -> bool {
    let items = actual.as_array().unwrap();
    items.len() == expected.len() && expected.iter().all(|e| items.contains(e))
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_local_route_lists_every_row() {
    let (status, content_type, body) =
        get_path(app(seeded_store(), EndpointDirectory::default()), LOCAL_BANKS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert!(contains_exactly(
        &body,
        &[
            json!({"id": "5678", "name": "Credit Sweets"}),
            json!({"id": "9870", "name": "Banco de espiritu santo"}),
            json!({"id": "1234", "name": "Royal Bank of Boredom"}),
        ]
    ));
}

#[tokio::test]
async fn test_local_route_reflects_reload() {
    let store = seeded_store();
    store.load(vec![Record::new("4321", "Fresh Bank").unwrap()]);

    let (status, _, body) = get_path(app(store, EndpointDirectory::default()), LOCAL_BANKS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "4321", "name": "Fresh Bank"}]));
}

#[tokio::test]
async fn test_remote_route_returns_partial_results() {
    let remotes = mock_remotes().await;
    let down = unreachable_addr().await;
    let directory = EndpointDirectory::from_pairs([
        ("Royal Bank of Boredom", format!("http://{}/rbb", remotes)),
        ("Credit Sweets", format!("http://{}/cs", remotes)),
        ("Banco de espiritu santo", format!("http://{}/bes", down)),
    ])
    .unwrap();

    let (status, content_type, body) =
        get_path(app(seeded_store(), directory), REMOTE_BANKS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert!(contains_exactly(
        &body,
        &[
            json!({"id": "5678", "name": "Credit Sweets"}),
            json!({"id": "1234", "name": "Royal Bank of Boredom"}),
        ]
    ));
}

#[tokio::test]
async fn test_remote_route_all_down_is_503() {
    let directory = EndpointDirectory::from_pairs([
        ("Royal Bank of Boredom", format!("http://{}/rbb", unreachable_addr().await)),
        ("Credit Sweets", format!("http://{}/cs", unreachable_addr().await)),
    ])
    .unwrap();

    let (status, _, body) = get_path(app(seeded_store(), directory), REMOTE_BANKS_PATH).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
    assert_eq!(body["code"], 10001);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("SERVICE UNAVAILABLE - Failed to retrieve data"));
    assert_eq!(body["relevant_links"], "http://localhost:8080/v1/banks/all");
}

#[tokio::test]
async fn test_remote_route_without_endpoints_is_503() {
    let (status, _, body) =
        get_path(app(seeded_store(), EndpointDirectory::default()), REMOTE_BANKS_PATH).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 107);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No remote api configuration available"));
    assert_eq!(body["relevant_links"], "http://localhost:8080/v1/banks/all");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resp = app(seeded_store(), EndpointDirectory::default())
        .oneshot(Request::get("/v3/banks/all").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_panic_is_503_with_sibling_link() {
    async fn corrupted() -> &'static str {
        panic!("bank table corrupted")
    }

    let state = state(seeded_store(), EndpointDirectory::default());
    let router = Router::new().route(
        REMOTE_BANKS_PATH,
        get(corrupted).layer(state.catch_panic(LOCAL_BANKS_PATH)),
    );

    let (status, _, body) = get_path(router, REMOTE_BANKS_PATH).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
    assert_eq!(body["code"], 109);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("SERVICE UNAVAILABLE - "));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("bank table corrupted"));
    assert_eq!(body["relevant_links"], "http://localhost:8080/v1/banks/all");
}

#[tokio::test]
async fn test_total_failure_is_logged_once() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let directory = EndpointDirectory::from_pairs([
        ("Royal Bank of Boredom", format!("http://{}/rbb", unreachable_addr().await)),
        ("Credit Sweets", format!("http://{}/cs", unreachable_addr().await)),
    ])
    .unwrap();

    let (status, _, _) = get_path(app(seeded_store(), directory), REMOTE_BANKS_PATH).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let output = logs.contents();
    assert_eq!(
        output
            .matches("Failed to retrieve data from requested source")
            .count(),
        1,
        "logs were:\n{}",
        output
    );
}
