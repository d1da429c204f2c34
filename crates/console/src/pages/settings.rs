//! Settings page
//!
//! Saved settings take effect on the live client right away; the read cache
//! is cleared so nothing fetched from the previous backend is shown.
//! Environment overrides stay in force over whatever is saved.

use std::fmt::Write as _;

use kati_core::api::{ApiClient, ApiConfig};
use kati_core::cache::QueryCache;
use kati_core::settings::{ApiSettings, EnvOverrides, SettingsStore};

use crate::notify::Notifier;

pub struct SettingsPage {
    store: SettingsStore,
    client: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
    overrides: EnvOverrides,
    pub settings: ApiSettings,
}

impl SettingsPage {
    pub fn new(
        store: SettingsStore,
        client: ApiClient,
        cache: QueryCache,
        notifier: Notifier,
        overrides: EnvOverrides,
    ) -> Self {
        Self {
            store,
            client,
            cache,
            notifier,
            overrides,
            settings: ApiSettings::default(),
        }
    }

    /// Read the persisted settings into the form
    pub async fn load(&mut self) -> bool {
        match self.store.load().await {
            Ok(settings) => {
                self.settings = settings;
                true
            }
            Err(e) => {
                self.notifier.error(&e).await;
                false
            }
        }
    }

    pub async fn save(&mut self) -> bool {
        if let Err(e) = self.store.save(&self.settings).await {
            self.notifier.error(&e).await;
            return false;
        }
        self.apply().await;
        self.notifier
            .info("Settings saved", "API configuration has been updated.")
            .await;
        true
    }

    pub async fn reset(&mut self) -> bool {
        match self.store.reset().await {
            Ok(defaults) => self.settings = defaults,
            Err(e) => {
                self.notifier.error(&e).await;
                return false;
            }
        }
        self.apply().await;
        self.notifier
            .info("Settings reset", "API configuration has been reset to defaults.")
            .await;
        true
    }

    /// Settings the client runs with
    pub fn effective(&self) -> ApiSettings {
        self.overrides.apply(&self.settings)
    }

    async fn apply(&self) {
        self.client
            .reconfigure(ApiConfig::from(&self.effective()))
            .await;
        self.cache.clear().await;
    }

    pub fn render(&self) -> String {
        let token = if self.settings.bearer_token.is_empty() {
            "(not set)"
        } else {
            "********"
        };
        let mut out = String::new();
        let _ = writeln!(out, "API Configuration");
        let _ = writeln!(out, "  api_url:      {}", self.settings.api_url);
        let _ = writeln!(out, "  bearer_token: {}", token);
        if let Some(url) = &self.overrides.api_url {
            let _ = writeln!(out, "  in effect:    {} (KATI_API_URL)", url);
        }
        if self.overrides.bearer_token.is_some() {
            let _ = writeln!(out, "  bearer token overridden by KATI_API_TOKEN");
        }
        out
    }
}
