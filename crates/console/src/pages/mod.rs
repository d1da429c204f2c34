//! Page controllers
//!
//! Each page owns one feature area. Reads go through the shared query cache;
//! mutations call the backend, invalidate the affected key family and report
//! the outcome as a notification.

mod companies;
mod dashboard;
mod login;
mod picker;
mod reports;
mod schedules;
mod settings;
mod users;

#[cfg(test)]
pub(crate) mod fake;

pub use companies::{CompaniesPage, CompanyForm};
pub use dashboard::DashboardPage;
pub use login::{LoginOutcome, LoginPage};
pub use picker::CompanyPicker;
pub use reports::{ReportForm, ReportsPage};
pub use schedules::SchedulesPage;
pub use settings::SettingsPage;
pub use users::{UserForm, UsersPage};

use std::sync::Arc;
use tracing::debug;

use kati_core::api::{Company, ReportApi};
use kati_core::cache::{QueryCache, QueryKey};
use kati_core::{Error, Result};

use crate::notify::Notifier;

pub(crate) const SELECT_COMPANY: &str = "Please select a company";

/// Collaborators every page works with
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn ReportApi>,
    pub cache: QueryCache,
    pub notifier: Notifier,
}

impl PageContext {
    pub fn new(api: Arc<dyn ReportApi>, cache: QueryCache, notifier: Notifier) -> Self {
        Self {
            api,
            cache,
            notifier,
        }
    }

    /// Turn a failure into an error notification
    pub(crate) async fn settle<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Operation failed: {}", e);
                self.notifier.error(&e).await;
                None
            }
        }
    }

    /// Active companies, shared by every page under the `["companies"]` key
    pub(crate) async fn active_companies(&self) -> Result<Vec<Company>> {
        let api = Arc::clone(&self.api);
        self.cache
            .fetch(&companies_key(), move || async move {
                api.list_companies(true).await
            })
            .await
    }
}

pub(crate) fn companies_key() -> QueryKey {
    QueryKey::new("companies")
}

/// Create/edit dialog state
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog<T> {
    Closed,
    Create,
    Edit(T),
}

impl<T> Default for Dialog<T> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<T> Dialog<T> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn editing(&self) -> Option<&T> {
        match self {
            Self::Edit(record) => Some(record),
            _ => None,
        }
    }
}

/// Proof that the operator was asked before a destructive action
///
/// Obtained from a page's `ask_*` method and handed back to the matching
/// action method, which is the only way to issue the request.
#[derive(Debug)]
#[must_use = "the action only runs when the confirmation is passed back to its page"]
pub struct Confirmation<A> {
    prompt: &'static str,
    action: A,
}

impl<A> Confirmation<A> {
    pub(crate) fn new(prompt: &'static str, action: A) -> Self {
        Self { prompt, action }
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub(crate) fn into_action(self) -> A {
        self.action
    }
}

/// Require a non-blank form value
pub(crate) fn required(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", label)));
    }
    Ok(())
}
