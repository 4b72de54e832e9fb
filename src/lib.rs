//! Inventory Console
//!
//! Backend for the university equipment inventory dashboard. It owns the
//! session with the remote university API and serves a REST JSON API for
//! locations, equipment, specification templates and contracts.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
