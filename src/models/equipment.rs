//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use super::enums::EquipmentStatus;

/// Equipment record as served by the remote inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: i64,
    /// Equipment type id (see the type catalog)
    #[serde(rename = "type")]
    pub type_id: i32,
    pub room: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub status: EquipmentStatus,
    /// Attached specification template id
    #[serde(default)]
    pub specification: Option<i64>,
    #[serde(default)]
    pub contract: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Per-room count of items by type, from the remote summary endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TypeBreakdown {
    pub type_id: i32,
    pub name: String,
    pub count: i64,
}

/// Create a single equipment item
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEquipment {
    #[serde(rename = "type")]
    pub type_id: i32,
    pub room: i64,
    pub name: String,
    pub status: Option<EquipmentStatus>,
    pub specification: Option<i64>,
    pub contract: Option<i64>,
}

/// Batch of identical items to create in one room.
///
/// Exactly one of `template_id` / `specification` may be given for types that
/// carry a specification.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewEquipmentBatch {
    #[serde(rename = "type")]
    pub type_id: i32,
    pub room: i64,
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub status: Option<EquipmentStatus>,
    #[serde(default)]
    pub contract: Option<i64>,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub specification: Option<Map<String, Value>>,
}

/// Payload sent to `inventory/equipment/bulk-create/`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkCreatePayload {
    #[serde(rename = "type")]
    pub type_id: i32,
    pub room: i64,
    pub name: String,
    pub quantity: u32,
    pub status: EquipmentStatus,
    pub contract: Option<i64>,
    pub specification_id: Option<i64>,
    pub specification_data: Option<Map<String, Value>>,
}

/// Partial update of one item inside a bulk update
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentPatch {
    pub id: i64,
    pub name: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub is_active: Option<bool>,
    pub contract: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdate {
    pub items: Vec<EquipmentPatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDelete {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoveEquipment {
    pub equipment_ids: Vec<i64>,
    pub to_room: i64,
}

/// Status change for a single item
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatus {
    pub status: EquipmentStatus,
}

/// Remote equipment type record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EquipmentTypeRecord {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub requires_specification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equipment_defaults_missing_optional_fields() {
        let item: Equipment = serde_json::from_value(json!({
            "id": 5,
            "type": 2,
            "room": 12,
            "name": "ПК-05"
        }))
        .unwrap();
        assert_eq!(item.status, EquipmentStatus::New);
        assert!(item.is_active);
        assert_eq!(item.specification, None);
    }

    #[test]
    fn bulk_create_payload_skips_absent_specification() {
        let payload = BulkCreatePayload {
            type_id: 10,
            room: 3,
            name: "Удлинитель".into(),
            quantity: 4,
            status: EquipmentStatus::New,
            contract: None,
            specification_id: None,
            specification_data: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({ "type": 10, "room": 3, "name": "Удлинитель", "quantity": 4, "status": "NEW" })
        );
    }
}
