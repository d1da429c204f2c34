//! Login page
//!
//! Any non-empty email and password pair is accepted; there is no
//! credential check against the backend.

use tracing::debug;

use kati_core::session::SessionManager;

use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Rejected,
    Failed,
}

pub struct LoginPage {
    session: SessionManager,
    notifier: Notifier,
    pub email: String,
    pub password: String,
}

impl LoginPage {
    pub fn new(session: SessionManager, notifier: Notifier) -> Self {
        Self {
            session,
            notifier,
            email: String::new(),
            password: String::new(),
        }
    }

    pub async fn submit(&mut self) -> LoginOutcome {
        let outcome = match self.session.login(&self.email, &self.password).await {
            Ok(true) => {
                self.notifier.info("Welcome back!", "Login successful").await;
                LoginOutcome::LoggedIn
            }
            Ok(false) => {
                self.notifier
                    .failure("Login failed", "Invalid credentials")
                    .await;
                LoginOutcome::Rejected
            }
            Err(e) => {
                debug!("Login could not be stored: {}", e);
                self.notifier
                    .failure("Error", "Something went wrong")
                    .await;
                LoginOutcome::Failed
            }
        };
        self.password.clear();
        outcome
    }
}
