//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::equipment::{
        BulkDelete, BulkUpdate, CreateEquipment, Equipment, EquipmentTypeRecord, MoveEquipment,
        NewEquipmentBatch, UpdateStatus,
    },
    services::equipment::RoomEquipmentView,
    AppState,
};

use super::ActiveSession;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomEquipmentQuery {
    /// 1-based page of type groups
    pub page: Option<usize>,
}

/// Equipment type catalog from the remote API
#[utoipa::path(
    get,
    path = "/equipment-types",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment types", body = Vec<EquipmentTypeRecord>)
    )
)]
pub async fn equipment_types(
    State(state): State<AppState>,
    _session: ActiveSession,
) -> AppResult<Json<Vec<EquipmentTypeRecord>>> {
    Ok(Json(state.services.equipment.equipment_types().await?))
}

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    _session: ActiveSession,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    _session: ActiveSession,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Create a batch of identical items in one room
#[utoipa::path(
    post,
    path = "/equipment/bulk-create",
    tag = "equipment",
    request_body = NewEquipmentBatch,
    responses(
        (status = 201, description = "Batch created"),
        (status = 400, description = "Invalid batch")
    )
)]
pub async fn bulk_create(
    State(state): State<AppState>,
    _session: ActiveSession,
    Json(batch): Json<NewEquipmentBatch>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.services.equipment.bulk_create(batch).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update several items at once
#[utoipa::path(
    put,
    path = "/equipment/bulk-update",
    tag = "equipment",
    request_body = BulkUpdate,
    responses(
        (status = 200, description = "Items updated")
    )
)]
pub async fn bulk_update(
    State(state): State<AppState>,
    _session: ActiveSession,
    Json(update): Json<BulkUpdate>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.services.equipment.bulk_update(update).await?))
}

/// Delete several items at once
#[utoipa::path(
    post,
    path = "/equipment/bulk-delete",
    tag = "equipment",
    request_body = BulkDelete,
    responses(
        (status = 204, description = "Items deleted")
    )
)]
pub async fn bulk_delete(
    State(state): State<AppState>,
    _session: ActiveSession,
    Json(request): Json<BulkDelete>,
) -> AppResult<StatusCode> {
    state.services.equipment.bulk_delete(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move items to another room
#[utoipa::path(
    post,
    path = "/equipment/move",
    tag = "equipment",
    request_body = MoveEquipment,
    responses(
        (status = 200, description = "Items moved")
    )
)]
pub async fn move_equipment(
    State(state): State<AppState>,
    _session: ActiveSession,
    Json(request): Json<MoveEquipment>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.services.equipment.move_equipment(request).await?))
}

/// Change the status of one item
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    _session: ActiveSession,
    Path(id): Path<i64>,
    Json(update): Json<UpdateStatus>,
) -> AppResult<Json<Value>> {
    let result = state
        .services
        .equipment
        .update_status(id, update.status)
        .await?;
    Ok(Json(result))
}

/// A room's equipment grouped by type, one page of groups at a time
#[utoipa::path(
    get,
    path = "/rooms/{id}/equipment",
    tag = "equipment",
    params(
        ("id" = i64, Path, description = "Room ID"),
        RoomEquipmentQuery
    ),
    responses(
        (status = 200, description = "Grouped room equipment", body = RoomEquipmentView)
    )
)]
pub async fn room_equipment(
    State(state): State<AppState>,
    _session: ActiveSession,
    Path(id): Path<i64>,
    Query(query): Query<RoomEquipmentQuery>,
) -> AppResult<Json<RoomEquipmentView>> {
    let view = state
        .services
        .equipment
        .room_equipment(id, query.page.unwrap_or(1))
        .await?;
    Ok(Json(view))
}
