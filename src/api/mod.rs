//! API handlers for the inventory console REST endpoints

pub mod contracts;
pub mod equipment;
pub mod health;
pub mod locations;
pub mod openapi;
pub mod session;
pub mod specifications;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Session, AppState};

/// Extractor that only lets requests through while the upstream session is authenticated
pub struct ActiveSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for ActiveSession {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = state.services.session.resolve().await?;

        if !session.is_authenticated() {
            return Err(AppError::Authentication("Not logged in".to_string()));
        }

        Ok(ActiveSession(session))
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/session", get(session::get_session))
        .route("/session/bootstrap", post(session::bootstrap))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/session/location", put(session::remember_location))
        // Locations
        .route("/university", get(locations::university))
        .route("/buildings", get(locations::buildings))
        .route("/floors", get(locations::floors))
        .route("/rooms", get(locations::rooms))
        .route("/faculties", get(locations::faculties))
        // Equipment
        .route("/equipment-types", get(equipment::equipment_types))
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route("/equipment/bulk-create", post(equipment::bulk_create))
        .route("/equipment/bulk-update", put(equipment::bulk_update))
        .route("/equipment/bulk-delete", post(equipment::bulk_delete))
        .route("/equipment/move", post(equipment::move_equipment))
        .route("/equipment/:id/status", put(equipment::update_status))
        .route("/rooms/:id/equipment", get(equipment::room_equipment))
        // Specifications
        .route(
            "/specifications/:type",
            get(specifications::list_templates).post(specifications::create_template),
        )
        // Contracts
        .route(
            "/contracts",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route("/contracts/all", get(contracts::list_all_contracts))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
