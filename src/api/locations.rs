//! Location hierarchy endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        location::{FloorQuery, PlacementQuery},
        Building, Faculty, Floor, Room, University,
    },
    AppState,
};

use super::ActiveSession;

/// University records
#[utoipa::path(
    get,
    path = "/university",
    tag = "locations",
    responses(
        (status = 200, description = "University list", body = Vec<University>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn university(
    State(state): State<AppState>,
    _session: ActiveSession,
) -> AppResult<Json<Vec<University>>> {
    Ok(Json(state.services.locations.university().await?))
}

/// All buildings
#[utoipa::path(
    get,
    path = "/buildings",
    tag = "locations",
    responses(
        (status = 200, description = "Building list", body = Vec<Building>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn buildings(
    State(state): State<AppState>,
    _session: ActiveSession,
) -> AppResult<Json<Vec<Building>>> {
    Ok(Json(state.services.locations.buildings().await?))
}

/// Floors of one building, ordered by number
#[utoipa::path(
    get,
    path = "/floors",
    tag = "locations",
    params(FloorQuery),
    responses(
        (status = 200, description = "Floor list", body = Vec<Floor>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn floors(
    State(state): State<AppState>,
    _session: ActiveSession,
    Query(query): Query<FloorQuery>,
) -> AppResult<Json<Vec<Floor>>> {
    Ok(Json(state.services.locations.floors(query.building_id).await?))
}

/// Rooms on a building floor
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "locations",
    params(PlacementQuery),
    responses(
        (status = 200, description = "Room list", body = Vec<Room>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn rooms(
    State(state): State<AppState>,
    _session: ActiveSession,
    Query(query): Query<PlacementQuery>,
) -> AppResult<Json<Vec<Room>>> {
    let rooms = state
        .services
        .locations
        .rooms(query.building_id, query.floor_id)
        .await?;
    Ok(Json(rooms))
}

/// Faculties located on a building floor
#[utoipa::path(
    get,
    path = "/faculties",
    tag = "locations",
    params(PlacementQuery),
    responses(
        (status = 200, description = "Faculty list", body = Vec<Faculty>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn faculties(
    State(state): State<AppState>,
    _session: ActiveSession,
    Query(query): Query<PlacementQuery>,
) -> AppResult<Json<Vec<Faculty>>> {
    let faculties = state
        .services
        .locations
        .faculties(query.building_id, query.floor_id)
        .await?;
    Ok(Json(faculties))
}
