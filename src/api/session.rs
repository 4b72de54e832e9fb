//! Session endpoints: resolution, login, logout and location tracking

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::session::{LocationUpdate, LoginRequest, Resolution},
    AppState,
};

/// Current session state and where the dashboard should go
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Session resolution", body = Resolution)
    )
)]
pub async fn get_session(State(state): State<AppState>) -> AppResult<Json<Resolution>> {
    let resolution = state.services.session.resolution().await?;
    Ok(Json(resolution))
}

/// Re-read stored credentials and resolve the session again
#[utoipa::path(
    post,
    path = "/session/bootstrap",
    tag = "session",
    responses(
        (status = 200, description = "Session resolution", body = Resolution)
    )
)]
pub async fn bootstrap(State(state): State<AppState>) -> AppResult<Json<Resolution>> {
    let resolution = state.services.session.bootstrap().await?;
    Ok(Json(resolution))
}

/// Log in against the remote API
#[utoipa::path(
    post,
    path = "/session/login",
    tag = "session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = Resolution),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<Resolution>> {
    request.validate()?;
    let resolution = state
        .services
        .session
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(resolution))
}

/// Drop stored tokens
#[utoipa::path(
    post,
    path = "/session/logout",
    tag = "session",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.session.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remember the last visited route and navigation label
#[utoipa::path(
    put,
    path = "/session/location",
    tag = "session",
    request_body = LocationUpdate,
    responses(
        (status = 204, description = "Location saved")
    )
)]
pub async fn remember_location(
    State(state): State<AppState>,
    Json(update): Json<LocationUpdate>,
) -> AppResult<StatusCode> {
    update.validate()?;
    state
        .services
        .session
        .remember_location(&update.path, update.label.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
