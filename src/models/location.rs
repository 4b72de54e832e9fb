//! Location hierarchy: university, buildings, floors, faculties, rooms

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct University {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Building (a "block" in university terms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Building {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub university: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Floor {
    pub id: i64,
    pub number: i32,
    pub building: i64,
}

/// Faculty, attached to one floor of one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub building: i64,
    pub floor: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: i64,
    pub number: String,
    #[serde(default)]
    pub name: Option<String>,
    pub building: i64,
    pub floor: i64,
    #[serde(default)]
    pub faculty: Option<i64>,
}

/// Building filter
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct FloorQuery {
    pub building_id: i64,
}

/// Building + floor filter
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PlacementQuery {
    pub building_id: i64,
    pub floor_id: i64,
}
