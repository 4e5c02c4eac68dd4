#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use push_dispatch::config::Settings;
use push_dispatch::models::entities::Provider;
use push_dispatch::models::responses::ProviderResult;
use push_dispatch::services::dispatcher::Dispatcher;
use push_dispatch::services::push::{Notification, Sender, TokenStore};
use push_dispatch::services::secrets::{CredentialSecrets, SecretResolver, SecretStore};
use push_dispatch::{AppState, build_router};

pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/service_account_key.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/service_account_pub.pem");

pub const CLIENT_EMAIL: &str = "push-sender@test-project.iam.gserviceaccount.com";

/// Service-account JSON as stored in `FIREBASE_SERVICE_ACCOUNT`.
pub fn service_account_json(project_id: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": project_id,
        "private_key_id": "0123456789abcdef",
        "private_key": PRIVATE_KEY_PEM,
        "client_email": CLIENT_EMAIL,
        "client_id": "100000000000000000000",
        "token_uri": "https://oauth2.googleapis.com/token",
    })
    .to_string()
}

pub fn huawei_secrets() -> Vec<(&'static str, String)> {
    vec![
        ("HUAWEI_CLIENT_ID", "hms-client".to_string()),
        ("HUAWEI_CLIENT_SECRET", "hms-secret".to_string()),
        ("HUAWEI_APP_ID", "107000001".to_string()),
    ]
}

pub fn secrets(pairs: Vec<(&str, String)>) -> CredentialSecrets {
    CredentialSecrets::new(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

pub fn notification() -> Notification {
    Notification {
        title: "Hello".to_string(),
        body: "World".to_string(),
        data: Some(HashMap::from([("ride_id".to_string(), "42".to_string())])),
    }
}

pub fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ── Collaborator doubles ──

/// Secret store returning fixed rows and counting reads.
#[derive(Default)]
pub struct CountingSecretStore {
    rows: HashMap<String, String>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl CountingSecretStore {
    pub fn with_rows(rows: Vec<(&str, String)>) -> Self {
        Self {
            rows: rows.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for CountingSecretStore {
    async fn fetch_all(&self) -> Result<HashMap<String, String>, sqlx::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.rows.clone())
    }
}

/// Token store recording every delete call.
#[derive(Default)]
pub struct RecordingTokenStore {
    pub deleted: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingTokenStore {
    /// Records the attempt, then fails it.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn deletions(&self) -> Vec<Vec<String>> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for RecordingTokenStore {
    async fn delete_tokens(&self, tokens: &[String]) -> Result<u64, sqlx::Error> {
        self.deleted.lock().unwrap().push(tokens.to_vec());
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(tokens.len() as u64)
    }
}

/// Sender double that records the batches it receives.
pub struct RecordingSender {
    provider: Provider,
    delay: Duration,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub started_at: Mutex<Option<Instant>>,
}

impl RecordingSender {
    pub fn new(provider: Provider) -> Self {
        Self::delayed(provider, Duration::ZERO)
    }

    pub fn delayed(provider: Provider, delay: Duration) -> Self {
        Self {
            provider,
            delay,
            batches: Mutex::new(Vec::new()),
            started_at: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sender for RecordingSender {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(
        &self,
        tokens: &[String],
        _notification: &Notification,
        _secrets: &CredentialSecrets,
    ) -> ProviderResult {
        *self.started_at.lock().unwrap() = Some(Instant::now());
        self.batches.lock().unwrap().push(tokens.to_vec());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        ProviderResult::sent(self.provider, tokens.len())
    }
}

// ── App helpers ──

pub fn dispatcher(
    store: Arc<CountingSecretStore>,
    senders: Vec<Arc<dyn Sender>>,
    timeout: Duration,
) -> Dispatcher {
    Dispatcher::new(SecretResolver::with_env(store, |_| None), senders, timeout)
}

pub fn test_app(dispatcher: Dispatcher) -> Router {
    build_router(Arc::new(AppState {
        db: None,
        settings: Settings::default(),
        start_time: Instant::now(),
        dispatcher,
    }))
}

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub async fn post_json(app: Router, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = call(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_json(app: Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = call(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
