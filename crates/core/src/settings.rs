//! API connection settings
//!
//! The backend URL and optional bearer token are operator-editable and kept
//! in the durable key-value store.

use reqwest::Url;
use std::sync::Arc;
use tracing::info;

use crate::error::Error;
use crate::storage::KeyValueStore;
use crate::Result;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

const API_URL_KEY: &str = "api_url";
const BEARER_TOKEN_KEY: &str = "api_bearer_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub api_url: String,
    /// Empty when the backend needs no authentication
    pub bearer_token: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bearer_token: String::new(),
        }
    }
}

impl ApiSettings {
    /// Check that the URL is absolute http(s)
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| Error::validation(format!("Invalid API URL: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::validation(format!(
                "Invalid API URL: unsupported scheme {}",
                other
            ))),
        }
    }
}

/// Process-wide values that take precedence over the stored settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub api_url: Option<String>,
    pub bearer_token: Option<String>,
}

impl EnvOverrides {
    /// Read `KATI_API_URL` and `KATI_API_TOKEN`; a blank URL counts as unset
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("KATI_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            bearer_token: std::env::var("KATI_API_TOKEN").ok(),
        }
    }

    /// Settings actually used by the client
    pub fn apply(&self, settings: &ApiSettings) -> ApiSettings {
        ApiSettings {
            api_url: self
                .api_url
                .clone()
                .unwrap_or_else(|| settings.api_url.clone()),
            bearer_token: self
                .bearer_token
                .clone()
                .unwrap_or_else(|| settings.bearer_token.clone()),
        }
    }
}

/// Reads and writes [`ApiSettings`]
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings, with defaults for anything never saved
    pub async fn load(&self) -> Result<ApiSettings> {
        let defaults = ApiSettings::default();
        Ok(ApiSettings {
            api_url: self
                .store
                .get(API_URL_KEY)
                .await?
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            bearer_token: self
                .store
                .get(BEARER_TOKEN_KEY)
                .await?
                .unwrap_or(defaults.bearer_token),
        })
    }

    /// Validate and persist both values
    pub async fn save(&self, settings: &ApiSettings) -> Result<()> {
        settings.validate()?;
        self.store.set(API_URL_KEY, settings.api_url.trim()).await?;
        self.store
            .set(BEARER_TOKEN_KEY, &settings.bearer_token)
            .await?;
        info!("Saved API settings for {}", settings.api_url.trim());
        Ok(())
    }

    /// Persist and return the defaults
    pub async fn reset(&self) -> Result<ApiSettings> {
        let defaults = ApiSettings::default();
        self.store.set(API_URL_KEY, &defaults.api_url).await?;
        self.store.set(BEARER_TOKEN_KEY, &defaults.bearer_token).await?;
        info!("Reset API settings to defaults");
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn settings_store() -> (SettingsStore, Arc<dyn KeyValueStore>) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        (SettingsStore::new(Arc::clone(&kv)), kv)
    }

    #[tokio::test]
    async fn test_load_defaults() {
        let (store, _) = settings_store();
        let settings = store.load().await.unwrap();
        assert_eq!(settings.api_url, "http://127.0.0.1:8000");
        assert_eq!(settings.bearer_token, "");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (store, kv) = settings_store();
        let settings = ApiSettings {
            api_url: "https://reports.example.com".to_string(),
            bearer_token: "tok".to_string(),
        };
        store.save(&settings).await.unwrap();

        assert_eq!(store.load().await.unwrap(), settings);
        assert_eq!(
            kv.get("api_bearer_token").await.unwrap().as_deref(),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_url() {
        let (store, kv) = settings_store();
        let err = store
            .save(&ApiSettings {
                api_url: "not a url".to_string(),
                bearer_token: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(kv.get("api_url").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_persists_defaults() {
        let (store, kv) = settings_store();
        kv.set("api_url", "https://old.example.com").await.unwrap();
        kv.set("api_bearer_token", "old").await.unwrap();

        let settings = store.reset().await.unwrap();

        assert_eq!(settings, ApiSettings::default());
        assert_eq!(
            kv.get("api_url").await.unwrap().as_deref(),
            Some("http://127.0.0.1:8000")
        );
        assert_eq!(kv.get("api_bearer_token").await.unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let stored = ApiSettings {
            api_url: "https://stored.example.com".to_string(),
            bearer_token: "stored".to_string(),
        };
        let overrides = EnvOverrides {
            api_url: Some("https://env.example.com".to_string()),
            bearer_token: None,
        };

        let effective = overrides.apply(&stored);
        assert_eq!(effective.api_url, "https://env.example.com");
        assert_eq!(effective.bearer_token, "stored");
        assert_eq!(EnvOverrides::default().apply(&stored), stored);
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let settings = ApiSettings {
            api_url: "ftp://reports.example.com".to_string(),
            bearer_token: String::new(),
        };
        assert!(settings.validate().is_err());
    }
}
