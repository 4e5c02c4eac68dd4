use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ── Enums ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Provider {
    #[serde(rename = "FCM")]
    Fcm,
    #[serde(rename = "HMS")]
    Hms,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fcm => "FCM",
            Self::Hms => "HMS",
        }
    }

    /// Normalize a raw provider tag. Matching is case-insensitive; `HUAWEI`
    /// is an alias for HMS. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "FCM" => Some(Self::Fcm),
            "HMS" | "HUAWEI" => Some(Self::Hms),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Entities ──

/// A device token paired with its raw provider tag, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderToken {
    pub token: String,
    pub provider: Option<String>,
}

impl ProviderToken {
    pub fn new(token: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn provider(&self) -> Option<Provider> {
        self.provider.as_deref().and_then(Provider::from_tag)
    }
}
