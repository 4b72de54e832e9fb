//! Contracts service

use validator::Validate;

use super::{
    endpoints,
    gateway::{ApiRequest, FilePart, GatewayClient, MultipartBody},
};
use crate::{
    error::{AppError, AppResult},
    models::contract::{Contract, ContractPage, NewContract},
};

#[derive(Clone)]
pub struct ContractService {
    gateway: GatewayClient,
}

impl ContractService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    /// One page of the remote contract list, passed through as is
    pub async fn list(&self, page: Option<u32>) -> AppResult<ContractPage> {
        let mut request = ApiRequest::get(endpoints::CONTRACTS);
        if let Some(page) = page {
            request = request.query("page", page.max(1));
        }
        self.gateway.fetch(&request).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Contract>> {
        self.gateway.get_json(endpoints::CONTRACTS_ALL).await
    }

    pub async fn create(&self, contract: NewContract) -> AppResult<Contract> {
        let body = upload_body(contract)?;
        let created: Contract = self
            .gateway
            .post_multipart(endpoints::CONTRACTS, body)
            .await?;
        tracing::info!("Uploaded contract {} ({})", created.number, created.id);
        Ok(created)
    }
}

/// Validate a new contract and lay it out as the upstream multipart form
pub fn upload_body(contract: NewContract) -> AppResult<MultipartBody> {
    contract.validate()?;
    if contract.file.bytes.is_empty() {
        return Err(AppError::Validation("Contract file is required".to_string()));
    }

    Ok(MultipartBody::default()
        .text("number", contract.number.trim())
        .text("valid_until", contract.valid_until.format("%Y-%m-%d").to_string())
        .file(FilePart {
            field: "file".to_string(),
            file_name: contract.file.file_name,
            content_type: contract.file.content_type,
            bytes: contract.file.bytes,
        }))
}
