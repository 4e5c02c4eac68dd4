pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::{Router, middleware};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use db::Database;
use db::repositories::{PushTokenRepository, SecretRepository};
use services::dispatcher::Dispatcher;
use services::push::{FcmSender, HmsSender, NoopTokenStore, Sender, TokenStore};
use services::secrets::{EmptySecretStore, SecretResolver, SecretStore};

pub struct AppState {
    pub db: Option<Database>,
    pub settings: Settings,
    pub start_time: Instant,
    pub dispatcher: Dispatcher,
}

/// Wire the secret store, token store and both senders. Without a database
/// secrets come from the environment and stale-token cleanup is skipped.
pub fn build_dispatcher(
    settings: &Settings,
    db: Option<&Database>,
    http: reqwest::Client,
) -> Dispatcher {
    let (secret_store, token_store): (Arc<dyn SecretStore>, Arc<dyn TokenStore>) = match db {
        Some(db) => (
            Arc::new(SecretRepository::new(db.pool.clone())),
            Arc::new(PushTokenRepository::new(db.pool.clone())),
        ),
        None => (Arc::new(EmptySecretStore), Arc::new(NoopTokenStore)),
    };

    let senders: Vec<Arc<dyn Sender>> = vec![
        Arc::new(FcmSender::new(http.clone(), settings.http_timeout())),
        Arc::new(HmsSender::new(
            http,
            token_store,
            &settings.hms_android_package,
            settings.http_timeout(),
        )),
    ];

    Dispatcher::new(
        SecretResolver::new(secret_store),
        senders,
        settings.provider_timeout(),
    )
}

pub fn build_router(state: Arc<AppState>) -> Router {
    use routes::{health, notifications, openapi};

    let cors = build_cors(&state.settings);

    Router::new()
        .route(
            "/",
            get(health::root).post(notifications::send_push_notification),
        )
        .route("/health", get(health::health))
        .route(
            "/send-push-notification",
            post(notifications::send_push_notification),
        )
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(notifications::preflight))
        .with_state(state)
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    if origins.contains(&"*".to_string()) {
        cors.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(allowed)
    }
}
