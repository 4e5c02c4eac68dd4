use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entities::ProviderToken;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenEntry {
    pub token: String,
    /// `FCM`, `HMS` or `HUAWEI`, in any case. Other values are ignored.
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NotificationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "No tokens to send"))]
    pub tokens: Vec<TokenEntry>,

    pub title: String,

    pub body: String,

    /// Forwarded to the providers as-is.
    #[serde(default)]
    pub data: Option<HashMap<String, String>>,
}

impl NotificationRequest {
    /// Decode and validate a raw request body.
    pub fn decode(raw: &[u8]) -> Result<Self, AppError> {
        let request: Self = serde_json::from_slice(raw)
            .map_err(|e| AppError::validation_error(format!("Invalid request body: {e}")))?;

        request.validate().map_err(|e| {
            let message = e
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| e.to_string());
            AppError::validation_error(message)
        })?;

        Ok(request)
    }

    pub fn provider_tokens(&self) -> Vec<ProviderToken> {
        self.tokens
            .iter()
            .map(|t| ProviderToken {
                token: t.token.clone(),
                provider: t.provider.clone(),
            })
            .collect()
    }
}
