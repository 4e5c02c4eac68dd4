pub mod fcm;
pub mod hms;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::models::entities::Provider;
use crate::models::responses::ProviderResult;
use crate::services::secrets::CredentialSecrets;

pub use fcm::FcmSender;
pub use hms::HmsSender;

/// The payload every provider delivers.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub data: Option<HashMap<String, String>>,
}

impl Notification {
    /// Data map, empty when the request carried none.
    pub fn data_or_empty(&self) -> HashMap<String, String> {
        self.data.clone().unwrap_or_default()
    }
}

/// Delivers a notification to one provider's batch of tokens. Implementations
/// never fail: every error becomes an unsuccessful [`ProviderResult`].
#[async_trait]
pub trait Sender: Send + Sync {
    fn provider(&self) -> Provider;

    async fn send(
        &self,
        tokens: &[String],
        notification: &Notification,
        secrets: &CredentialSecrets,
    ) -> ProviderResult;
}

/// Device token storage, used to evict tokens a provider reports as stale.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn delete_tokens(&self, tokens: &[String]) -> Result<u64, sqlx::Error>;
}

/// Store used when no database is configured.
pub struct NoopTokenStore;

#[async_trait]
impl TokenStore for NoopTokenStore {
    async fn delete_tokens(&self, tokens: &[String]) -> Result<u64, sqlx::Error> {
        tracing::warn!(
            token_count = tokens.len(),
            "No token store configured, stale tokens not removed"
        );
        Ok(0)
    }
}

/// Short-lived bearer credential for one provider, scoped to one call.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub provider: Provider,
}

impl AccessToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: Option<String>,
    // Google sends a string, Huawei a numeric code.
    error: Option<serde_json::Value>,
    error_description: Option<String>,
}

/// POST a form-encoded OAuth2 grant and extract `access_token`.
pub(crate) async fn exchange_token(
    http: &reqwest::Client,
    url: &str,
    form: &[(&str, &str)],
    provider: Provider,
) -> Result<AccessToken, ProviderError> {
    let resp = http.post(url).form(form).send().await?;
    let status = resp.status();
    let body: OAuthTokenResponse = resp.json().await.map_err(|e| {
        ProviderError::Auth(format!("{provider} token response unreadable ({status}): {e}"))
    })?;

    match body.access_token.filter(|t| !t.is_empty()) {
        Some(value) => Ok(AccessToken { value, provider }),
        None => {
            let reason = body
                .error_description
                .or_else(|| {
                    body.error.map(|e| match e {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                })
                .unwrap_or_else(|| format!("status {status}"));
            Err(ProviderError::Auth(format!(
                "{provider} token exchange failed: {reason}"
            )))
        }
    }
}
