//! Persistence for the console's own state (tokens and last route)

pub mod file_store;
pub mod memory_store;

use async_trait::async_trait;

use crate::{error::AppResult, models::session::StoredSession};

pub use file_store::FileTokenStore;
pub use memory_store::MemoryTokenStore;

/// Storage for the persisted session document.
///
/// Only `SessionManager` talks to a token store; everything else asks the
/// session manager.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> AppResult<StoredSession>;

    async fn save(&self, session: &StoredSession) -> AppResult<()>;

    /// Drop both tokens, keeping the saved route and label
    async fn clear_tokens(&self) -> AppResult<()> {
        let mut session = self.load().await?;
        session.access_token = None;
        session.refresh_token = None;
        self.save(&session).await
    }
}
