//! Operator notifications
//!
//! Every page reports outcomes here instead of returning errors to the shell.
//! The shell prints pending notifications after each command and dismisses them.

use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use kati_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.variant {
            Variant::Default => "*",
            Variant::Destructive => "!",
        };
        match &self.description {
            Some(description) => write!(f, "{} {}: {}", marker, self.title, description),
            None => write!(f, "{} {}", marker, self.title),
        }
    }
}

/// Queue of notifications waiting to be shown
#[derive(Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, notification: Notification) {
        self.queue.lock().await.push(notification);
    }

    pub async fn success(&self, title: impl Into<String>) {
        self.push(Notification {
            title: title.into(),
            description: None,
            variant: Variant::Default,
        })
        .await;
    }

    pub async fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification {
            title: title.into(),
            description: Some(description.into()),
            variant: Variant::Default,
        })
        .await;
    }

    pub async fn failure(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification {
            title: title.into(),
            description: Some(description.into()),
            variant: Variant::Destructive,
        })
        .await;
    }

    /// Report an error under the generic "Error" title
    pub async fn error(&self, error: &Error) {
        self.failure("Error", error.to_string()).await;
    }

    /// Take every pending notification, dismissing them
    pub async fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock().await)
    }
}
