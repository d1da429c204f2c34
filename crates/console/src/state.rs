//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use kati_core::api::{ApiClient, ApiConfig, ReportApi};
use kati_core::cache::QueryCache;
use kati_core::session::SessionManager;
use kati_core::settings::{EnvOverrides, SettingsStore};
use kati_core::storage::{FileKvStore, KeyValueStore};

use crate::notify::Notifier;
use crate::pages::{PageContext, SettingsPage};

const STORAGE_FILE: &str = "storage.json";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    client: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
    session: SessionManager,
    settings: SettingsStore,
    overrides: EnvOverrides,
}

impl AppState {
    /// Open `<data_dir>/storage.json` and restore session and settings from it
    pub async fn new(data_dir: &Path) -> kati_core::Result<Self> {
        let path: PathBuf = data_dir.join(STORAGE_FILE);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(path).await?);
        Self::with_store(store).await
    }

    /// Build state over an existing store, with overrides from the environment
    pub async fn with_store(store: Arc<dyn KeyValueStore>) -> kati_core::Result<Self> {
        Self::with_overrides(store, EnvOverrides::from_env()).await
    }

    pub async fn with_overrides(
        store: Arc<dyn KeyValueStore>,
        overrides: EnvOverrides,
    ) -> kati_core::Result<Self> {
        let session = SessionManager::restore(Arc::clone(&store)).await?;
        let settings = SettingsStore::new(store);
        let api_settings = overrides.apply(&settings.load().await?);
        info!("Using API at {}", api_settings.api_url);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                client: ApiClient::new(ApiConfig::from(&api_settings)),
                cache: QueryCache::new(),
                notifier: Notifier::new(),
                session,
                settings,
                overrides,
            }),
        })
    }

    /// Page context over `api`, sharing this state's cache and notifier
    pub fn context_with(&self, api: Arc<dyn ReportApi>) -> PageContext {
        PageContext::new(api, self.inner.cache.clone(), self.inner.notifier.clone())
    }

    pub fn settings_page(&self) -> SettingsPage {
        SettingsPage::new(
            self.inner.settings.clone(),
            self.inner.client.clone(),
            self.inner.cache.clone(),
            self.inner.notifier.clone(),
            self.inner.overrides.clone(),
        )
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }
}
