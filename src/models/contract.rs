//! Contract model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub id: i64,
    pub number: String,
    /// URL of the uploaded contract document
    #[serde(default)]
    pub file: Option<String>,
    pub valid_until: NaiveDate,
}

/// One page of the remote paginated contract list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Contract>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContractQuery {
    pub page: Option<u32>,
}

/// Attached contract document
#[derive(Debug, Clone)]
pub struct ContractFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// New contract, assembled from a multipart form
#[derive(Debug, Clone, Validate)]
pub struct NewContract {
    #[validate(length(min = 1, message = "Contract number is required."))]
    pub number: String,
    pub valid_until: NaiveDate,
    pub file: ContractFile,
}
