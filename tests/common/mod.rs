#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use device_activator::config::Settings;
use device_activator::{BatchSummary, Config, DeviceStore, Reporter};
use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// One request as seen by the mock service.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub uri: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    body: &'static str,
    fail_from: Option<usize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockService {
    pub url: Url,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockService {
    /// Answers every request with `200 body`, or `500` from request number
    /// `fail_from` (0-based) onwards.
    pub async fn spawn(body: &'static str, fail_from: Option<usize>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            body,
            fail_from,
            seen: seen.clone(),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock service");
        let addr = listener.local_addr().expect("mock service has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock service failed");
        });

        let url = Url::parse(&format!("http://{addr}/devices")).expect("invalid mock url");
        Self { url, seen }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("poisoned").clone()
    }
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, &'static str) {
    let index = {
        let mut seen = state.seen.lock().expect("poisoned");
        seen.push(SeenRequest {
            uri: uri.to_string(),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
        seen.len() - 1
    };

    match state.fail_from {
        Some(n) if index >= n => (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        _ => (StatusCode::OK, state.body),
    }
}

pub fn config(service_url: &Url, database_url: &str, dry_run: bool) -> Config {
    Config::resolve(Settings {
        token: Some("test-token".into()),
        db_user: Some("tester".into()),
        db_password: Some("hunter2".into()),
        service_url: Some(service_url.clone()),
        database_url: Some(database_url.to_string()),
        dry_run,
        ..Settings::default()
    })
    .expect("test config must resolve")
}

pub async fn seed(store: &mut DeviceStore, rows: &[(&str, &str)]) {
    store.init_schema().await.expect("schema");
    for (id, status) in rows {
        sqlx::query("INSERT INTO device (id, status) VALUES ($1, $2)")
            .bind(*id)
            .bind(*status)
            .execute(store.connection())
            .await
            .expect("seed insert");
    }
}

pub async fn status_of(store: &mut DeviceStore, id: &str) -> String {
    store
        .find_devices(id)
        .await
        .expect("select")
        .pop()
        .expect("device row exists")
        .status
}

/// Captures reporter events in order.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn initialized(&self) {
        self.push("initialized".into());
    }

    fn line_started(&self, line: &str) {
        self.push(format!("start {line}"));
    }

    fn rows_selected(&self, line: &str, count: usize) {
        self.push(format!("selected {line} {count}"));
    }

    fn rows_updated(&self, line: &str, count: u64) {
        self.push(format!("updated {line} {count}"));
    }

    fn line_finished(&self, line: &str) {
        self.push(format!("finish {line}"));
    }

    fn finished(&self, summary: &BatchSummary) {
        self.push(format!("finished {}", summary.lines));
    }
}
