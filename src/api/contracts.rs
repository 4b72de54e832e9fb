//! Contract endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use chrono::NaiveDate;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::contract::{Contract, ContractFile, ContractPage, ContractQuery, NewContract},
    AppState,
};

use super::ActiveSession;

/// Multipart form accepted by `POST /contracts` (documentation only)
#[derive(ToSchema)]
pub struct ContractUpload {
    pub number: String,
    /// `YYYY-MM-DD`
    pub valid_until: String,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// One page of contracts
#[utoipa::path(
    get,
    path = "/contracts",
    tag = "contracts",
    params(ContractQuery),
    responses(
        (status = 200, description = "Contract page", body = ContractPage)
    )
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    _session: ActiveSession,
    Query(query): Query<ContractQuery>,
) -> AppResult<Json<ContractPage>> {
    Ok(Json(state.services.contracts.list(query.page).await?))
}

/// Every contract, unpaginated
#[utoipa::path(
    get,
    path = "/contracts/all",
    tag = "contracts",
    responses(
        (status = 200, description = "All contracts", body = Vec<Contract>)
    )
)]
pub async fn list_all_contracts(
    State(state): State<AppState>,
    _session: ActiveSession,
) -> AppResult<Json<Vec<Contract>>> {
    Ok(Json(state.services.contracts.list_all().await?))
}

/// Upload a new contract with its document
#[utoipa::path(
    post,
    path = "/contracts",
    tag = "contracts",
    request_body(content = ContractUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Contract created", body = Contract),
        (status = 400, description = "Missing number, date or file")
    )
)]
pub async fn create_contract(
    State(state): State<AppState>,
    _session: ActiveSession,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Contract>)> {
    let contract = read_upload(multipart).await?;
    let created = state.services.contracts.create(contract).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_upload(mut multipart: Multipart) -> AppResult<NewContract> {
    let mut number = None;
    let mut valid_until = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "number" => number = Some(read_text(field).await?),
            "valid_until" => {
                let raw = read_text(field).await?;
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!("Invalid valid_until date: {}", raw))
                })?;
                valid_until = Some(date);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("contract").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some(ContractFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(NewContract {
        number: number.unwrap_or_default(),
        valid_until: valid_until
            .ok_or_else(|| AppError::Validation("valid_until is required".to_string()))?,
        file: file.ok_or_else(|| AppError::Validation("Contract file is required".to_string()))?,
    })
}

async fn read_text(field: axum_extra::extract::multipart::Field) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}
