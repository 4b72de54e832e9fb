//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{contracts, equipment, health, locations, session, specifications};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Console API",
        version = "0.3.0",
        description = "Backend for the university equipment inventory dashboard"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::get_session,
        session::bootstrap,
        session::login,
        session::logout,
        session::remember_location,
        // Locations
        locations::university,
        locations::buildings,
        locations::floors,
        locations::rooms,
        locations::faculties,
        // Equipment
        equipment::equipment_types,
        equipment::list_equipment,
        equipment::create_equipment,
        equipment::bulk_create,
        equipment::bulk_update,
        equipment::bulk_delete,
        equipment::move_equipment,
        equipment::update_status,
        equipment::room_equipment,
        // Specifications
        specifications::list_templates,
        specifications::create_template,
        // Contracts
        contracts::list_contracts,
        contracts::list_all_contracts,
        contracts::create_contract,
    ),
    components(
        schemas(
            // Session
            crate::models::session::AuthState,
            crate::models::session::Resolution,
            crate::models::session::LoginRequest,
            crate::models::session::LocationUpdate,
            // Locations
            crate::models::location::University,
            crate::models::location::Building,
            crate::models::location::Floor,
            crate::models::location::Room,
            crate::models::location::Faculty,
            // Equipment
            crate::models::enums::EquipmentType,
            crate::models::enums::EquipmentStatus,
            crate::models::equipment::Equipment,
            crate::models::equipment::TypeBreakdown,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::NewEquipmentBatch,
            crate::models::equipment::EquipmentPatch,
            crate::models::equipment::BulkUpdate,
            crate::models::equipment::BulkDelete,
            crate::models::equipment::MoveEquipment,
            crate::models::equipment::UpdateStatus,
            crate::models::equipment::EquipmentTypeRecord,
            crate::services::composition::StatusCounts,
            crate::services::composition::TypeBucket,
            crate::services::equipment::RoomEquipmentView,
            // Specifications
            specifications::FieldView,
            specifications::TemplateView,
            specifications::SpecificationList,
            specifications::TemplateDraft,
            // Contracts
            crate::models::contract::Contract,
            crate::models::contract::ContractPage,
            contracts::ContractUpload,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Upstream session lifecycle"),
        (name = "locations", description = "University, buildings, floors, rooms and faculties"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "specifications", description = "Per-type specification templates"),
        (name = "contracts", description = "Supply contracts")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
