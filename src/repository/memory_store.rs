//! In-memory token store, for tests and ephemeral runs

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::{error::AppResult, models::session::StoredSession};

#[derive(Default)]
pub struct MemoryTokenStore {
    inner: RwLock<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new(initial: StoredSession) -> Self {
        Self { inner: RwLock::new(initial) }
    }

    /// Copy of the current contents
    pub async fn snapshot(&self) -> StoredSession {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> AppResult<StoredSession> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> AppResult<()> {
        *self.inner.write().await = session.clone();
        Ok(())
    }

    async fn clear_tokens(&self) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.access_token = None;
        inner.refresh_token = None;
        Ok(())
    }
}
