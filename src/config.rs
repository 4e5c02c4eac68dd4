use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,

    // Database (secret store + push token store)
    pub database_url: Option<String>,
    pub database_pool_size: u32,
    pub database_pool_timeout: u64,

    // Outbound HTTP
    pub http_timeout_secs: u64,
    pub provider_timeout_secs: u64,

    // Huawei click action target
    pub hms_android_package: String,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Push Dispatch API".into(),
            app_version: "1.0.0".into(),
            environment: "development".into(),
            host: "0.0.0.0".into(),
            port: 8000,

            database_url: None,
            database_pool_size: 5,
            database_pool_timeout: 30,

            http_timeout_secs: 10,
            provider_timeout_secs: 30,

            hms_android_package: "com.gavra013.gavra_android".into(),

            cors_origins: "*".into(),

            log_level: "info".into(),
            log_format: "json".into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_version: env::var("APP_VERSION").unwrap_or(defaults.app_version),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),

            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            database_pool_size: parse_var("DATABASE_POOL_SIZE", defaults.database_pool_size),
            database_pool_timeout: parse_var(
                "DATABASE_POOL_TIMEOUT",
                defaults.database_pool_timeout,
            ),

            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            provider_timeout_secs: parse_var(
                "PROVIDER_TIMEOUT_SECS",
                defaults.provider_timeout_secs,
            ),

            hms_android_package: env::var("HMS_ANDROID_PACKAGE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.hms_android_package),

            cors_origins: env::var("CORS_ORIGINS").unwrap_or(defaults.cors_origins),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    }

    #[inline]
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }

    #[inline]
    pub fn provider_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.provider_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
