//! Huawei Push Kit delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Notification, Sender, TokenStore, exchange_token};
use crate::error::ProviderError;
use crate::models::entities::Provider;
use crate::models::responses::ProviderResult;
use crate::services::secrets::{
    CredentialSecrets, HUAWEI_APP_ID, HUAWEI_CLIENT_ID, HUAWEI_CLIENT_SECRET,
};

pub const HMS_TOKEN_URL: &str = "https://oauth-login.cloud.huawei.com/oauth2/v2/token";
pub const HMS_API_BASE: &str = "https://push-api.cloud.huawei.com";

/// Reported when `HUAWEI_CLIENT_ID`, `HUAWEI_CLIENT_SECRET` or
/// `HUAWEI_APP_ID` is absent. The app id is part of the send URL.
pub const CONFIG_MISSING: &str = "HMS Config Missing";

/// Push Kit accepted the request.
pub const CODE_SUCCESS: &str = "80000000";
/// Codes meaning one or more submitted tokens are expired or invalid.
pub const STALE_TOKEN_CODES: [&str; 2] = ["80200003", "80300007"];

#[derive(Debug, Deserialize)]
struct PushKitResponse {
    code: Option<String>,
    msg: Option<String>,
}

struct HmsCredentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    app_id: &'a str,
}

impl<'a> HmsCredentials<'a> {
    fn from_secrets(secrets: &'a CredentialSecrets) -> Option<Self> {
        Some(Self {
            client_id: secrets.get(HUAWEI_CLIENT_ID)?,
            client_secret: secrets.get(HUAWEI_CLIENT_SECRET)?,
            app_id: secrets.get(HUAWEI_APP_ID)?,
        })
    }
}

#[derive(Clone)]
pub struct HmsSender {
    http: reqwest::Client,
    token_store: Arc<dyn TokenStore>,
    android_package: String,
    token_url: String,
    api_base: String,
    request_timeout: Duration,
}

impl HmsSender {
    pub fn new(
        http: reqwest::Client,
        token_store: Arc<dyn TokenStore>,
        android_package: &str,
        request_timeout: Duration,
    ) -> Self {
        Self {
            http,
            token_store,
            android_package: android_package.to_string(),
            token_url: HMS_TOKEN_URL.to_string(),
            api_base: HMS_API_BASE.to_string(),
            request_timeout,
        }
    }

    /// Point the sender at different token and API hosts.
    pub fn with_endpoints(mut self, token_url: &str, api_base: &str) -> Self {
        self.token_url = token_url.to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn build_message(&self, tokens: &[String], notification: &Notification) -> serde_json::Value {
        // Push Kit expects `data` as a JSON-encoded string, not an object.
        let data = serde_json::to_string(&notification.data_or_empty())
            .unwrap_or_else(|_| "{}".to_string());

        serde_json::json!({
            "validate_only": false,
            "message": {
                "notification": {
                    "title": notification.title,
                    "body": notification.body,
                },
                "data": data,
                "android": {
                    "notification": {
                        "title": notification.title,
                        "body": notification.body,
                        "click_action": {
                            "type": 1,
                            "intent": format!("#Intent;{};end", self.android_package),
                        },
                        "sound": "default",
                        "default_sound": true,
                        "importance": "HIGH",
                    }
                },
                "token": tokens,
            }
        })
    }

    async fn deliver(
        &self,
        creds: &HmsCredentials<'_>,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<PushKitResponse, ProviderError> {
        let access = exchange_token(
            &self.http,
            &self.token_url,
            &[
                ("grant_type", "client_credentials"),
                ("client_id", creds.client_id),
                ("client_secret", creds.client_secret),
            ],
            Provider::Hms,
        )
        .await?;

        let url = format!("{}/v1/{}/messages:send", self.api_base, creds.app_id);

        let resp = self
            .http
            .post(&url)
            .header("Authorization", access.bearer())
            .json(&self.build_message(tokens, notification))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        tracing::debug!(status = %status, response = %raw, "HMS response");

        let parsed: PushKitResponse = serde_json::from_str(&raw)?;
        if parsed.code.is_none() {
            return Err(ProviderError::Delivery(format!(
                "HMS response without code (status {status})"
            )));
        }
        Ok(parsed)
    }

    /// Push Kit does not say which token was rejected, so the whole batch
    /// is evicted.
    async fn evict_stale(&self, tokens: &[String]) {
        match self.token_store.delete_tokens(tokens).await {
            Ok(deleted) => {
                tracing::warn!(
                    token_count = tokens.len(),
                    deleted = deleted,
                    "HMS reported stale tokens, removed batch from token store"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to remove stale HMS tokens");
            }
        }
    }
}

#[async_trait]
impl Sender for HmsSender {
    fn provider(&self) -> Provider {
        Provider::Hms
    }

    async fn send(
        &self,
        tokens: &[String],
        notification: &Notification,
        secrets: &CredentialSecrets,
    ) -> ProviderResult {
        let Some(creds) = HmsCredentials::from_secrets(secrets) else {
            tracing::warn!("HMS credentials missing");
            return ProviderResult::failed(Provider::Hms, CONFIG_MISSING);
        };

        match self.deliver(&creds, tokens, notification).await {
            Ok(resp) => {
                let code = resp.code.unwrap_or_default();
                if STALE_TOKEN_CODES.contains(&code.as_str()) {
                    self.evict_stale(tokens).await;
                }

                let success = code == CODE_SUCCESS;
                tracing::info!(
                    token_count = tokens.len(),
                    code = %code,
                    success = success,
                    "HMS batch sent"
                );
                ProviderResult::coded(Provider::Hms, success, Some(code), resp.msg)
            }
            Err(e) => {
                tracing::error!(error = %e, "HMS dispatch failed");
                ProviderResult::failed(Provider::Hms, e.to_string())
            }
        }
    }
}
