//! Firebase Cloud Messaging (HTTP v1) delivery.
//!
//! Authentication uses a service-account assertion: an RS256-signed JWT is
//! exchanged at Google's token endpoint for a one-hour bearer token. Each
//! device token is then sent its own `messages:send` request.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::future::join_all;
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::{Deserialize, Serialize};

use super::{AccessToken, Notification, Sender, exchange_token};
use crate::error::ProviderError;
use crate::models::entities::Provider;
use crate::models::responses::ProviderResult;
use crate::services::secrets::{CredentialSecrets, FIREBASE_SERVICE_ACCOUNT};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const FCM_API_BASE: &str = "https://fcm.googleapis.com";
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3600;

pub const CONFIG_MISSING: &str = "FCM Config Missing (FIREBASE_SERVICE_ACCOUNT)";

/// The parts of a Firebase service-account key file this sender uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
}

impl ServiceAccount {
    /// Parse the `FIREBASE_SERVICE_ACCOUNT` secret. Returns `None` when it is
    /// absent, not JSON, or has no `project_id`.
    pub fn from_secret(raw: Option<&str>) -> Option<Self> {
        let account: Self = serde_json::from_str(raw?).ok()?;
        if account.project_id.is_empty() {
            return None;
        }
        Some(account)
    }
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'a str,
    typ: &'a str,
}

#[derive(Serialize)]
struct ClaimSet<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

fn b64url_json<T: Serialize>(value: &T) -> Result<String, ProviderError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}

/// Build the signed JWT-bearer assertion for `account`, issued at `iat`
/// (seconds since the epoch) and valid for one hour.
pub fn build_assertion(account: &ServiceAccount, iat: i64) -> Result<String, ProviderError> {
    let header = JwtHeader {
        alg: "RS256",
        typ: "JWT",
    };
    let claims = ClaimSet {
        iss: &account.client_email,
        scope: FCM_SCOPE,
        aud: GOOGLE_TOKEN_URL,
        iat,
        exp: iat + ASSERTION_TTL_SECS,
    };

    let signing_input = format!("{}.{}", b64url_json(&header)?, b64url_json(&claims)?);

    let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
    let signature = jsonwebtoken::crypto::sign(signing_input.as_bytes(), &key, Algorithm::RS256)?;

    Ok(format!("{signing_input}.{signature}"))
}

#[derive(Clone)]
pub struct FcmSender {
    http: reqwest::Client,
    token_url: String,
    api_base: String,
    request_timeout: Duration,
}

impl FcmSender {
    pub fn new(http: reqwest::Client, request_timeout: Duration) -> Self {
        Self {
            http,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            api_base: FCM_API_BASE.to_string(),
            request_timeout,
        }
    }

    /// Point the sender at different token and API hosts.
    pub fn with_endpoints(mut self, token_url: &str, api_base: &str) -> Self {
        self.token_url = token_url.to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    async fn access_token(&self, account: &ServiceAccount) -> Result<AccessToken, ProviderError> {
        let assertion = build_assertion(account, chrono::Utc::now().timestamp())?;
        exchange_token(
            &self.http,
            &self.token_url,
            &[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)],
            Provider::Fcm,
        )
        .await
    }

    async fn deliver(
        &self,
        account: &ServiceAccount,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<usize, ProviderError> {
        let access = self.access_token(account).await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, account.project_id
        );
        let data = notification.data_or_empty();

        let sends = tokens.iter().map(|token| {
            let message = serde_json::json!({
                "message": {
                    "token": token,
                    "notification": {
                        "title": notification.title,
                        "body": notification.body,
                    },
                    "data": data,
                    "android": {
                        "priority": "high",
                        "notification": { "sound": "default" },
                    },
                    "apns": {
                        "payload": { "aps": { "sound": "default" } },
                    },
                }
            });
            self.send_one(&url, &access, message)
        });

        // Every send runs to completion; the first transport error fails the batch.
        let mut sent = 0;
        for outcome in join_all(sends).await {
            if outcome? {
                sent += 1;
            }
        }
        Ok(sent)
    }

    /// `Ok(false)` when FCM answered with a non-2xx status, `Err` when no
    /// answer arrived.
    async fn send_one(
        &self,
        url: &str,
        access: &AccessToken,
        message: serde_json::Value,
    ) -> Result<bool, ProviderError> {
        let resp = self
            .http
            .post(url)
            .header("Authorization", access.bearer())
            .json(&message)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "FCM send error");
                e
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        let detail = resp.text().await.unwrap_or_default();
        tracing::warn!(status = %status, detail = %detail, "FCM send rejected");
        Ok(false)
    }
}

#[async_trait]
impl Sender for FcmSender {
    fn provider(&self) -> Provider {
        Provider::Fcm
    }

    async fn send(
        &self,
        tokens: &[String],
        notification: &Notification,
        secrets: &CredentialSecrets,
    ) -> ProviderResult {
        let Some(account) = ServiceAccount::from_secret(secrets.get(FIREBASE_SERVICE_ACCOUNT))
        else {
            tracing::warn!("FCM service account missing or invalid");
            return ProviderResult::failed(Provider::Fcm, CONFIG_MISSING);
        };

        match self.deliver(&account, tokens, notification).await {
            Ok(sent) => {
                tracing::info!(
                    project_id = %account.project_id,
                    token_count = tokens.len(),
                    sent_count = sent,
                    "FCM batch sent"
                );
                ProviderResult::sent(Provider::Fcm, sent)
            }
            Err(e) => {
                tracing::error!(error = %e, "FCM dispatch failed");
                ProviderResult::failed(Provider::Fcm, e.to_string())
            }
        }
    }
}
