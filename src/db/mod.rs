pub mod repositories;

use std::time::{Duration, Instant};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Settings;

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(settings: &Settings, database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.database_pool_size)
            .acquire_timeout(Duration::from_secs(settings.database_pool_timeout))
            .connect(database_url)
            .await?;

        let version: (String,) = sqlx::query_as("SHOW server_version")
            .fetch_one(&pool)
            .await?;
        tracing::info!(
            postgres_version = %version.0,
            pool_size = settings.database_pool_size,
            "Connected to Postgres"
        );

        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => HealthCheckResult {
                status: "up".to_string(),
                latency_ms: Some(start.elapsed().as_millis() as i64),
                error: None,
            },
            Err(e) => HealthCheckResult {
                status: "down".to_string(),
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct HealthCheckResult {
    pub status: String,
    pub latency_ms: Option<i64>,
    pub error: Option<String>,
}
