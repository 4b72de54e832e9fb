//! JSON file backed token store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TokenStore;
use crate::{
    error::{AppError, AppResult},
    models::session::StoredSession,
};

pub struct FileTokenStore {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> AppResult<StoredSession> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoredSession::default()),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => Ok(session),
                Err(e) => {
                    // A corrupt file is treated like no session at all
                    tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                    Ok(StoredSession::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_vec_pretty(session)
            .map_err(|e| AppError::Storage(format!("Failed to encode session: {}", e)))?;

        // Write-then-rename so a crash never leaves a half written file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<StoredSession> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn save(&self, session: &StoredSession) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        self.write(session).await
    }

    async fn clear_tokens(&self) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut session = self.read().await?;
        session.access_token = None;
        session.refresh_token = None;
        self.write(&session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FileTokenStore {
        let dir = std::env::temp_dir().join(format!("inventory-console-{}", uuid::Uuid::new_v4()));
        FileTokenStore::new(dir.join("session.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_session() {
        let store = temp_store();
        assert_eq!(store.load().await.unwrap(), StoredSession::default());
    }

    #[tokio::test]
    async fn save_then_load_and_clear_tokens_keeps_route() {
        let store = temp_store();
        let session = StoredSession {
            access_token: Some("a".into()),
            refresh_token: Some("r".into()),
            last_path: Some("/rooms/4".into()),
            last_nav_label: Some("Аудитории".into()),
        };
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), session);

        store.clear_tokens().await.unwrap();
        let cleared = store.load().await.unwrap();
        assert_eq!(cleared.access_token, None);
        assert_eq!(cleared.refresh_token, None);
        assert_eq!(cleared.last_path.as_deref(), Some("/rooms/4"));
        assert_eq!(cleared.last_nav_label.as_deref(), Some("Аудитории"));

        let _ = tokio::fs::remove_dir_all(store.path().parent().unwrap()).await;
    }

    #[tokio::test]
    async fn corrupt_file_is_ignored() {
        let store = temp_store();
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), b"{not json").await.unwrap();
        assert_eq!(store.load().await.unwrap(), StoredSession::default());

        let _ = tokio::fs::remove_dir_all(store.path().parent().unwrap()).await;
    }
}
