//! Dashboard page

use chrono::Duration;
use std::fmt::Write as _;
use std::sync::Arc;

use kati_core::api::HealthStatus;
use kati_core::cache::QueryKey;

use super::PageContext;
use crate::ui::{Route, StatusBadge};

/// The health read is refetched once it is this old
const HEALTH_MAX_AGE_SECS: i64 = 30;

const QUICK_ACTIONS: [(&str, &str, Route); 4] = [
    ("Manage Companies", "View and configure client companies", Route::Companies),
    ("Generate Report", "Create ticket reports instantly", Route::Reports),
    ("Schedule Reports", "Automate report generation", Route::Schedules),
    ("Manage Users", "Configure user permissions", Route::Users),
];

pub struct DashboardPage {
    ctx: PageContext,
    health: Option<HealthStatus>,
    active_companies: usize,
}

impl DashboardPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            health: None,
            active_companies: 0,
        }
    }

    /// Read the company count and backend health
    pub async fn load(&mut self) -> bool {
        let companies = self.ctx.active_companies().await;
        let companies_ok = match self.ctx.settle(companies).await {
            Some(companies) => {
                self.active_companies = companies.len();
                true
            }
            None => false,
        };

        let api = Arc::clone(&self.ctx.api);
        let health = self
            .ctx
            .cache
            .fetch_with_max_age(
                &QueryKey::new("health"),
                Duration::seconds(HEALTH_MAX_AGE_SECS),
                move || async move { api.health().await },
            )
            .await;
        self.health = self.ctx.settle(health).await;

        companies_ok && self.health.is_some()
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub fn active_companies(&self) -> usize {
        self.active_companies
    }

    pub fn render(&self) -> String {
        let (status, version) = match &self.health {
            Some(health) => (health.status.as_str(), health.version.as_str()),
            None => ("Unavailable", "-"),
        };

        let mut out = String::new();
        let _ = writeln!(out, "Welcome Back");
        let _ = writeln!(out);
        let _ = writeln!(out, "  Total Companies  {}", self.active_companies);
        let _ = writeln!(out, "  System Status    {}", StatusBadge::new(status));
        let _ = writeln!(out, "  API Version      {}", version);
        let _ = writeln!(out);
        let _ = writeln!(out, "Quick Actions");
        for (title, description, route) in QUICK_ACTIONS.iter() {
            let _ = writeln!(out, "  {:<17} {:<11} {}", title, route.path(), description);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fake::{context, FakeApi};

    #[tokio::test]
    async fn test_load_counts_active_companies() {
        let api = FakeApi::seeded();
        let mut page = DashboardPage::new(context(&api));
        assert!(page.load().await);

        assert_eq!(page.active_companies(), 2);
        assert_eq!(page.health().unwrap().version, "1.0.0");
        let rendered = page.render();
        assert!(rendered.contains("Total Companies  2"));
        assert!(rendered.contains("/reports"));
    }

    #[tokio::test]
    async fn test_fresh_health_is_served_from_cache() {
        let api = FakeApi::seeded();
        let mut page = DashboardPage::new(context(&api));
        page.load().await;
        page.load().await;
        assert_eq!(api.count("health"), 1);
        assert_eq!(api.count("list_companies:true"), 1);
    }

    #[tokio::test]
    async fn test_health_failure_renders_unavailable() {
        let api = FakeApi::seeded();
        let ctx = context(&api);
        let mut page = DashboardPage::new(ctx.clone());
        page.load().await;
        ctx.cache.invalidate(&QueryKey::new("health")).await;

        api.fail_next("Failed to fetch health");
        assert!(!page.load().await);
        assert!(page.render().contains("Unavailable"));
        assert_eq!(ctx.notifier.drain().await[0].title, "Error");
    }
}
