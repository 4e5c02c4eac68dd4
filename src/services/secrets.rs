use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub const FIREBASE_SERVICE_ACCOUNT: &str = "FIREBASE_SERVICE_ACCOUNT";
pub const HUAWEI_CLIENT_ID: &str = "HUAWEI_CLIENT_ID";
pub const HUAWEI_CLIENT_SECRET: &str = "HUAWEI_CLIENT_SECRET";
pub const HUAWEI_APP_ID: &str = "HUAWEI_APP_ID";

/// Every credential key a sender may ask for.
pub const PROVIDER_SECRET_KEYS: [&str; 4] = [
    FIREBASE_SERVICE_ACCOUNT,
    HUAWEI_CLIENT_ID,
    HUAWEI_CLIENT_SECRET,
    HUAWEI_APP_ID,
];

/// Key/value secret storage. Implementations return the whole table.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch_all(&self) -> Result<HashMap<String, String>, sqlx::Error>;
}

/// Store used when no database is configured.
pub struct EmptySecretStore;

#[async_trait]
impl SecretStore for EmptySecretStore {
    async fn fetch_all(&self) -> Result<HashMap<String, String>, sqlx::Error> {
        Ok(HashMap::new())
    }
}

/// Provider credentials resolved for a single dispatch call.
#[derive(Debug, Clone, Default)]
pub struct CredentialSecrets {
    values: HashMap<String, String>,
}

impl CredentialSecrets {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Value for `key`, treating empty strings as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves credentials from the secret store, falling back to the
/// environment for keys the store does not hold. Store values win.
#[derive(Clone)]
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
    env: EnvLookup,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self::with_env(store, |key| std::env::var(key).ok())
    }

    pub fn with_env<F>(store: Arc<dyn SecretStore>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            store,
            env: Arc::new(env),
        }
    }

    /// Best-effort lookup of `keys`. A store failure degrades to
    /// environment-only resolution; missing keys are left out.
    pub async fn resolve(&self, keys: &[&str]) -> CredentialSecrets {
        let stored = match self.store.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Secret store unavailable, using environment only");
                HashMap::new()
            }
        };

        let mut values = HashMap::with_capacity(keys.len());
        for &key in keys {
            let value = stored
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .or_else(|| (self.env)(key).filter(|v| !v.is_empty()));

            if let Some(value) = value {
                values.insert(key.to_string(), value);
            }
        }

        tracing::debug!(
            requested = keys.len(),
            resolved = values.len(),
            from_store = stored.len(),
            "Resolved provider secrets"
        );

        CredentialSecrets::new(values)
    }
}
