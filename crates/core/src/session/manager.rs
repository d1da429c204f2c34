//! Session holder backed by a key-value store

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::model::{Session, SessionUser};
use crate::storage::KeyValueStore;
use crate::Result;

const AUTH_FLAG_KEY: &str = "isAuthenticated";
const USER_KEY: &str = "user";

/// Shared session state with durable persistence
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    state: Arc<RwLock<Session>>,
}

impl SessionManager {
    /// Create a logged-out session over `store` without reading it
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Create a session and rehydrate it from `store`
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let manager = Self::new(store);
        manager.reload().await?;
        Ok(manager)
    }

    /// Re-read persisted state
    ///
    /// The session is restored only when the flag is `"true"` and the stored
    /// user record parses; anything else leaves the operator logged out.
    pub async fn reload(&self) -> Result<()> {
        let flag = self.store.get(AUTH_FLAG_KEY).await?;
        let raw_user = self.store.get(USER_KEY).await?;

        let user = match (flag.as_deref(), raw_user) {
            (Some("true"), Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable stored session user: {}", e);
                    None
                }
            },
            _ => None,
        };

        if let Some(user) = &user {
            debug!("Restored session for {}", user.email);
        }
        self.state.write().await.user = user;
        Ok(())
    }

    /// Log in; returns `false` without touching storage when either field is empty
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        if email.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let user = SessionUser {
            email: email.to_string(),
        };
        self.store.set(AUTH_FLAG_KEY, "true").await?;
        self.store
            .set(USER_KEY, &serde_json::to_string(&user)?)
            .await?;

        info!("Operator {} logged in", user.email);
        self.state.write().await.user = Some(user);
        Ok(true)
    }

    /// Log out and clear persisted state
    pub async fn logout(&self) -> Result<()> {
        self.state.write().await.user = None;
        self.store.remove(AUTH_FLAG_KEY).await?;
        self.store.remove(USER_KEY).await?;
        info!("Operator logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKvStore, MemoryKvStore};
    use tempfile::TempDir;

    fn memory_store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryKvStore::new())
    }

    #[tokio::test]
    async fn test_login_with_credentials_persists() {
        let store = memory_store();
        let session = SessionManager::new(Arc::clone(&store));

        assert!(session.login("a@b.com", "x").await.unwrap());
        assert!(session.is_authenticated().await);
        assert_eq!(
            store.get("isAuthenticated").await.unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.get("user").await.unwrap().as_deref(),
            Some(r#"{"email":"a@b.com"}"#)
        );
    }

    #[tokio::test]
    async fn test_login_with_empty_field_fails_without_persisting() {
        let store = memory_store();
        let session = SessionManager::new(Arc::clone(&store));

        assert!(!session.login("", "x").await.unwrap());
        assert!(!session.login("a@b.com", "").await.unwrap());
        assert!(!session.is_authenticated().await);
        assert_eq!(store.get("isAuthenticated").await.unwrap(), None);
        assert_eq!(store.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_persisted_session() {
        let store = memory_store();
        let session = SessionManager::new(Arc::clone(&store));
        session.login("a@b.com", "x").await.unwrap();

        session.logout().await.unwrap();

        assert!(session.user().await.is_none());
        assert_eq!(store.get("isAuthenticated").await.unwrap(), None);
        assert_eq!(store.get("user").await.unwrap(), None);

        // Logging out again is harmless.
        session.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_restore_across_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        {
            let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(&path).await.unwrap());
            let session = SessionManager::new(store);
            session.login("ops@example.com", "pw").await.unwrap();
        }

        let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::open(&path).await.unwrap());
        let session = SessionManager::restore(store).await.unwrap();
        assert_eq!(
            session.user().await,
            Some(SessionUser {
                email: "ops@example.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_restore_requires_flag_and_user() {
        let store = memory_store();
        store.set("user", r#"{"email":"a@b.com"}"#).await.unwrap();
        let session = SessionManager::restore(Arc::clone(&store)).await.unwrap();
        assert!(!session.is_authenticated().await);

        store.set("isAuthenticated", "true").await.unwrap();
        store.set("user", "{broken").await.unwrap();
        session.reload().await.unwrap();
        assert!(!session.is_authenticated().await);
    }
}
