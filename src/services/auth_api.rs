//! Remote authentication endpoints (login and token refresh)
//!
//! These calls bypass the gateway: they must never trigger the gateway's own
//! refresh-and-retry handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{endpoints, gateway::error_from_response};
use crate::{error::AppResult, models::session::TokenPair};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an access/refresh token pair
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> AppResult<String>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// `AuthApi` over HTTP against the remote university API
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenPair> {
        let response = self
            .http
            .post(endpoints::join(&self.base_url, endpoints::LOGIN))
            .json(&LoginBody { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<TokenPair>().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let response = self
            .http
            .post(endpoints::join(&self.base_url, endpoints::TOKEN_REFRESH))
            .json(&RefreshBody { refresh: refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<RefreshResponse>().await?.access)
    }
}
