use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use push_dispatch::config::Settings;
use push_dispatch::db::Database;
use push_dispatch::{AppState, build_dispatcher, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(&settings);

    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        "Starting server"
    );

    let database = match &settings.database_url {
        Some(url) => Some(
            Database::connect(&settings, url)
                .await
                .context("Failed to connect to database")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL not set, secrets resolve from environment only");
            None
        }
    };

    // Shared HTTP client for OAuth and provider calls
    let http_client = reqwest::Client::builder()
        .timeout(settings.http_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let dispatcher = build_dispatcher(&settings, database.as_ref(), http_client);

    let state = Arc::new(AppState {
        db: database,
        settings: settings.clone(),
        start_time: Instant::now(),
        dispatcher,
    });

    let app = build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}
