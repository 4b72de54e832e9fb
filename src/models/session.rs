//! Session model: stored tokens, auth state and navigation targets

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Route unauthenticated users are sent to
pub const LOGIN_ROUTE: &str = "/login";

/// Everything the console persists between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub last_path: Option<String>,
    pub last_nav_label: Option<String>,
}

/// Resolution state of the upstream session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Current session as seen by the rest of the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: AuthState,
    pub access_token: Option<String>,
}

impl Session {
    pub fn unknown() -> Self {
        Self { state: AuthState::Unknown, access_token: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}

/// Outcome of resolving the session, with where the dashboard should go next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Resolution {
    pub state: AuthState,
    pub is_authenticated: bool,
    pub redirect: String,
    pub nav_label: Option<String>,
}

/// Token pair returned by `user/login/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Last visited route and the navigation entry that was active on it
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LocationUpdate {
    #[validate(length(min = 1, message = "Path is required."))]
    pub path: String,
    pub label: Option<String>,
}
