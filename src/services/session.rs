//! Session manager: the single owner of upstream credentials.
//!
//! Resolves whether the console is authenticated, keeps the access token
//! fresh, and remembers where the user was. The gateway, API handlers and the
//! logout path all go through here instead of touching the token store.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::{auth_api::AuthApi, token};
use crate::{
    error::{AppError, AppResult},
    models::session::{AuthState, Resolution, Session, StoredSession, LOGIN_ROUTE},
    repository::TokenStore,
};

pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    auth: Arc<dyn AuthApi>,
    default_route: String,
    state: RwLock<Session>,
    // Held for the whole refresh exchange so concurrent 401s refresh once
    refresh_lock: Mutex<()>,
    // Held across every load-modify-save of the stored session
    store_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn TokenStore>,
        auth: Arc<dyn AuthApi>,
        default_route: impl Into<String>,
    ) -> Self {
        Self {
            store,
            auth,
            default_route: default_route.into(),
            state: RwLock::new(Session::unknown()),
            refresh_lock: Mutex::new(()),
            store_lock: Mutex::new(()),
        }
    }

    pub async fn current(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Token to attach to outgoing requests, if any
    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    /// Resolve the session from storage, refreshing once if needed
    pub async fn bootstrap(&self) -> AppResult<Resolution> {
        let _guard = self.refresh_lock.lock().await;
        self.bootstrap_locked().await
    }

    /// Bootstrap on first use; afterwards return the known session
    pub async fn resolve(&self) -> AppResult<Session> {
        let session = self.current().await;
        if session.state != AuthState::Unknown {
            return Ok(session);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another request may have finished bootstrapping while we waited
        if self.current().await.state == AuthState::Unknown {
            self.bootstrap_locked().await?;
        }
        Ok(self.current().await)
    }

    async fn bootstrap_locked(&self) -> AppResult<Resolution> {
        let stored = self.store.load().await?;

        let session = match stored.access_token.as_deref() {
            Some(access) if !token::is_expired(access) => {
                tracing::debug!("Stored access token is still valid");
                authenticated(access)
            }
            _ => match stored.refresh_token.as_deref() {
                Some(refresh) => match self.exchange(refresh).await? {
                    Some(access) => authenticated(&access),
                    None => unauthenticated(),
                },
                None => {
                    self.clear_tokens().await?;
                    unauthenticated()
                }
            },
        };

        tracing::info!("Session resolved: {:?}", session.state);
        *self.state.write().await = session.clone();
        Ok(self.resolution_for(&session, &stored))
    }

    /// Where the dashboard should be right now
    pub async fn resolution(&self) -> AppResult<Resolution> {
        let session = self.resolve().await?;
        let stored = self.store.load().await?;
        Ok(self.resolution_for(&session, &stored))
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<Resolution> {
        // Serialised with refreshes so a refresh in flight cannot undo a login
        let _refresh = self.refresh_lock.lock().await;
        let pair = self.auth.login(username, password).await?;

        let session = authenticated(&pair.access);
        let stored = {
            let _guard = self.store_lock.lock().await;
            let mut stored = self.store.load().await?;
            stored.access_token = Some(pair.access.clone());
            stored.refresh_token = Some(pair.refresh);
            self.store.save(&stored).await?;
            *self.state.write().await = session.clone();
            stored
        };
        tracing::info!("Logged in as {}", username);
        Ok(self.resolution_for(&session, &stored))
    }

    pub async fn logout(&self) -> AppResult<()> {
        {
            let _guard = self.store_lock.lock().await;
            self.store.clear_tokens().await?;
            *self.state.write().await = unauthenticated();
        }
        tracing::info!("Logged out");
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token
    pub async fn refresh(&self) -> AppResult<String> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh after the upstream rejected `rejected`.
    ///
    /// If the token was already rotated by a concurrent request while waiting
    /// for the lock, the new token is returned without another exchange.
    pub async fn refresh_after_unauthorized(&self, rejected: Option<&str>) -> AppResult<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.access_token().await {
            if Some(current.as_str()) != rejected {
                return Ok(current);
            }
        }
        self.refresh_locked().await
    }

    pub async fn remember_location(&self, path: &str, label: Option<&str>) -> AppResult<()> {
        let _guard = self.store_lock.lock().await;
        let mut stored = self.store.load().await?;
        stored.last_path = Some(path.to_string());
        stored.last_nav_label = label.map(str::to_string);
        self.store.save(&stored).await
    }

    async fn refresh_locked(&self) -> AppResult<String> {
        let stored = self.store.load().await?;
        let Some(refresh) = stored.refresh_token else {
            self.logout().await?;
            return Err(AppError::Authentication("No refresh token available".to_string()));
        };

        match self.exchange(&refresh).await? {
            Some(access) => {
                *self.state.write().await = authenticated(&access);
                Ok(access)
            }
            None => {
                *self.state.write().await = unauthenticated();
                Err(AppError::Authentication(
                    "Session expired, please log in again".to_string(),
                ))
            }
        }
    }

    /// Run one refresh call. `None` means it failed and the tokens were cleared,
    /// or the session was logged out while the call was in flight.
    async fn exchange(&self, refresh: &str) -> AppResult<Option<String>> {
        match self.auth.refresh(refresh).await {
            Ok(access) => {
                let _guard = self.store_lock.lock().await;
                let mut stored = self.store.load().await?;
                if stored.refresh_token.as_deref() != Some(refresh) {
                    tracing::info!("Session changed during refresh, discarding new token");
                    return Ok(None);
                }
                stored.access_token = Some(access.clone());
                self.store.save(&stored).await?;
                tracing::info!("Access token refreshed");
                Ok(Some(access))
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.clear_tokens().await?;
                Ok(None)
            }
        }
    }

    async fn clear_tokens(&self) -> AppResult<()> {
        let _guard = self.store_lock.lock().await;
        self.store.clear_tokens().await
    }

    fn resolution_for(&self, session: &Session, stored: &StoredSession) -> Resolution {
        let redirect = if session.is_authenticated() {
            stored
                .last_path
                .as_deref()
                .filter(|p| *p != LOGIN_ROUTE)
                .unwrap_or(self.default_route.as_str())
                .to_string()
        } else {
            LOGIN_ROUTE.to_string()
        };

        Resolution {
            state: session.state,
            is_authenticated: session.is_authenticated(),
            redirect,
            nav_label: stored.last_nav_label.clone(),
        }
    }
}

fn authenticated(access: &str) -> Session {
    Session {
        state: AuthState::Authenticated,
        access_token: Some(access.to_string()),
    }
}

fn unauthenticated() -> Session {
    Session {
        state: AuthState::Unauthenticated,
        access_token: None,
    }
}
