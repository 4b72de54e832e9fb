//! Business logic services

pub mod auth_api;
pub mod composition;
pub mod contracts;
pub mod endpoints;
pub mod equipment;
pub mod gateway;
pub mod locations;
pub mod session;
pub mod specifications;
pub mod token;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repository::TokenStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: Arc<session::SessionManager>,
    pub gateway: gateway::GatewayClient,
    pub locations: locations::LocationService,
    pub equipment: equipment::EquipmentService,
    pub specifications: specifications::SpecificationService,
    pub contracts: contracts::ContractService,
}

impl Services {
    /// Create all services against the configured upstream
    pub fn new(config: &AppConfig, store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let auth = Arc::new(auth_api::HttpAuthApi::new(
            http.clone(),
            config.upstream.base_url.clone(),
        ));

        Ok(Self::with_auth(config, http, store, auth))
    }

    /// Same as `new`, with the authentication endpoints supplied by the caller
    pub fn with_auth(
        config: &AppConfig,
        http: reqwest::Client,
        store: Arc<dyn TokenStore>,
        auth: Arc<dyn auth_api::AuthApi>,
    ) -> Self {
        let session = Arc::new(session::SessionManager::new(
            store,
            auth,
            config.session.default_route.clone(),
        ));
        let gateway = gateway::GatewayClient::new(
            http,
            config.upstream.base_url.clone(),
            session.clone(),
        );

        Self {
            locations: locations::LocationService::new(gateway.clone()),
            equipment: equipment::EquipmentService::new(
                gateway.clone(),
                config.pagination.page_size,
            ),
            specifications: specifications::SpecificationService::new(gateway.clone()),
            contracts: contracts::ContractService::new(gateway.clone()),
            session,
            gateway,
        }
    }
}
