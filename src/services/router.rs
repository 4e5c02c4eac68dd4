use crate::models::entities::{Provider, ProviderToken};

/// Tokens partitioned by provider.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoutedTokens {
    pub fcm: Vec<String>,
    pub hms: Vec<String>,
    /// Entries whose provider tag matched neither FCM nor HMS.
    pub dropped: usize,
}

impl RoutedTokens {
    pub fn batch(&self, provider: Provider) -> &[String] {
        match provider {
            Provider::Fcm => &self.fcm,
            Provider::Hms => &self.hms,
        }
    }

    pub fn routed(&self) -> usize {
        self.fcm.len() + self.hms.len()
    }
}

pub fn route_tokens(tokens: &[ProviderToken]) -> RoutedTokens {
    let mut routed = RoutedTokens::default();
    for entry in tokens {
        match entry.provider() {
            Some(Provider::Fcm) => routed.fcm.push(entry.token.clone()),
            Some(Provider::Hms) => routed.hms.push(entry.token.clone()),
            None => routed.dropped += 1,
        }
    }
    routed
}
