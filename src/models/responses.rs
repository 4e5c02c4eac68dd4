use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::entities::Provider;

/// Outcome of one provider's delivery attempt.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    pub provider: Provider,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ProviderResult {
    pub fn sent(provider: Provider, sent_count: usize) -> Self {
        Self {
            provider,
            success: true,
            sent_count: Some(sent_count),
            error: None,
            code: None,
            msg: None,
        }
    }

    pub fn failed(provider: Provider, error: impl Into<String>) -> Self {
        Self {
            provider,
            success: false,
            sent_count: None,
            error: Some(error.into()),
            code: None,
            msg: None,
        }
    }

    pub fn coded(
        provider: Provider,
        success: bool,
        code: Option<String>,
        msg: Option<String>,
    ) -> Self {
        Self {
            provider,
            success,
            sent_count: None,
            error: None,
            code,
            msg,
        }
    }
}

/// `success` reports that dispatch was attempted; per-provider outcomes
/// live in `results`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DispatchResponse {
    pub success: bool,
    pub results: Vec<ProviderResult>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub services: HashMap<String, ServiceHealth>,
}
