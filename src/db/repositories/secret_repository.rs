use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::services::secrets::SecretStore;

/// Key/value rows of the `server_secrets` table.
pub struct SecretRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SecretRow {
    key: String,
    value: String,
}

impl SecretRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretStore for SecretRepository {
    async fn fetch_all(&self) -> Result<HashMap<String, String>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SecretRow>("SELECT key, value FROM server_secrets")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
    }
}
