use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub list: ListConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub course_cache_page_size: u32,
    pub max_rows: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("VAULT_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("VAULT_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("VAULT_API_CONNECT_TIMEOUT_SECS") {
            self.api.connect_timeout_secs = v.parse().unwrap_or(self.api.connect_timeout_secs);
        }

        // List overrides
        if let Ok(v) = env::var("VAULT_LIST_PAGE_SIZE") {
            self.list.default_page_size = v.parse().unwrap_or(self.list.default_page_size);
        }
        if let Ok(v) = env::var("VAULT_LIST_MAX_PAGE_SIZE") {
            self.list.max_page_size = v.parse().unwrap_or(self.list.max_page_size);
        }
        if let Ok(v) = env::var("VAULT_LIST_DEBOUNCE_MS") {
            self.list.debounce_ms = v.parse().unwrap_or(self.list.debounce_ms);
        }

        // Upload overrides
        if let Ok(v) = env::var("VAULT_UPLOAD_COURSE_CACHE_PAGE_SIZE") {
            self.upload.course_cache_page_size =
                v.parse().unwrap_or(self.upload.course_cache_page_size);
        }
        if let Ok(v) = env::var("VAULT_UPLOAD_MAX_ROWS") {
            self.upload.max_rows = v.parse().unwrap_or(self.upload.max_rows);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                request_timeout_secs: 30,
                connect_timeout_secs: 5,
            },
            list: ListConfig {
                default_page_size: 13,
                max_page_size: 100,
                debounce_ms: 500,
            },
            upload: UploadConfig {
                course_cache_page_size: 50,
                max_rows: 20,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.engvault.uniben.edu".to_string(),
                request_timeout_secs: 20,
                connect_timeout_secs: 5,
            },
            list: ListConfig {
                default_page_size: 13,
                max_page_size: 100,
                debounce_ms: 500,
            },
            upload: UploadConfig {
                course_cache_page_size: 50,
                max_rows: 20,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://engvault.uniben.edu".to_string(),
                request_timeout_secs: 15,
                connect_timeout_secs: 5,
            },
            list: ListConfig {
                default_page_size: 13,
                max_page_size: 50,
                debounce_ms: 500,
            },
            upload: UploadConfig {
                course_cache_page_size: 50,
                max_rows: 10,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.list.default_page_size, 13);
        assert_eq!(config.list.debounce_ms, 500);
        assert!(config.api.base_url.starts_with("http://localhost"));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.list.max_page_size, 50);
        assert_eq!(config.upload.max_rows, 10);
    }
}
