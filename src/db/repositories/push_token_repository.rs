use async_trait::async_trait;
use sqlx::PgPool;

use crate::services::push::TokenStore;

/// Registered device tokens in the `push_tokens` table.
pub struct PushTokenRepository {
    pool: PgPool,
}

impl PushTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PushTokenRepository {
    async fn delete_tokens(&self, tokens: &[String]) -> Result<u64, sqlx::Error> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM push_tokens WHERE token = ANY($1)")
            .bind(tokens)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
