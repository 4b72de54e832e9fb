//! Equipment service

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::{
    composition::{self, TypeBucket, TypeCatalog},
    endpoints,
    gateway::{ApiRequest, GatewayClient},
    specifications::{Attachment, SpecificationForm},
};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        equipment::{
            BulkCreatePayload, BulkDelete, BulkUpdate, CreateEquipment, EquipmentPatch,
            EquipmentTypeRecord, MoveEquipment, NewEquipmentBatch, TypeBreakdown,
        },
        Equipment, EquipmentStatus, EquipmentType,
    },
};

/// One page of a room's equipment, grouped by type
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomEquipmentView {
    pub room_id: i64,
    pub groups: Vec<TypeBucket>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Number of non-empty type groups across all pages
    pub total_items: usize,
    pub type_breakdown: Vec<TypeBreakdown>,
}

#[derive(Clone)]
pub struct EquipmentService {
    gateway: GatewayClient,
    catalog: TypeCatalog,
    page_size: usize,
}

impl EquipmentService {
    pub fn new(gateway: GatewayClient, page_size: usize) -> Self {
        Self {
            gateway,
            catalog: TypeCatalog::default(),
            page_size,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.gateway.get_json(endpoints::EQUIPMENT).await
    }

    pub async fn create(&self, input: CreateEquipment) -> AppResult<Equipment> {
        if input.name.trim().is_empty() {
            return Err(field_error("name", "This field may not be blank."));
        }
        if EquipmentType::from_id(input.type_id).is_none() {
            return Err(field_error("type", "Unknown equipment type."));
        }

        let created: Equipment = self.gateway.post_json(endpoints::EQUIPMENT, &input).await?;
        tracing::info!("Created equipment {} in room {:?}", created.id, created.room);
        Ok(created)
    }

    pub async fn bulk_create(&self, batch: NewEquipmentBatch) -> AppResult<Value> {
        let payload = batch_payload(batch)?;
        let result = self
            .gateway
            .post_json(endpoints::EQUIPMENT_BULK_CREATE, &payload)
            .await?;

        tracing::info!(
            "Created {} x '{}' (type {}) in room {}",
            payload.quantity,
            payload.name,
            payload.type_id,
            payload.room
        );
        Ok(result)
    }

    pub async fn bulk_update(&self, update: BulkUpdate) -> AppResult<Value> {
        if update.items.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        self.gateway
            .put_json(endpoints::EQUIPMENT_BULK_UPDATE, &update)
            .await
    }

    pub async fn bulk_delete(&self, request: BulkDelete) -> AppResult<()> {
        if request.ids.is_empty() {
            return Err(AppError::Validation("No equipment selected".to_string()));
        }
        let count = request.ids.len();
        self.gateway
            .execute(&ApiRequest::post(endpoints::EQUIPMENT_BULK_DELETE).json(&request)?)
            .await?;
        tracing::info!("Deleted {} equipment items", count);
        Ok(())
    }

    pub async fn move_equipment(&self, request: MoveEquipment) -> AppResult<Value> {
        if request.equipment_ids.is_empty() {
            return Err(AppError::Validation("No equipment selected".to_string()));
        }
        let result = self
            .gateway
            .post_json(endpoints::EQUIPMENT_MOVE, &request)
            .await?;
        tracing::info!(
            "Moved {} equipment items to room {}",
            request.equipment_ids.len(),
            request.to_room
        );
        Ok(result)
    }

    /// Change one item's status through the bulk-update endpoint
    pub async fn update_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Value> {
        self.bulk_update(BulkUpdate {
            items: vec![EquipmentPatch {
                id,
                name: None,
                status: Some(status),
                is_active: None,
                contract: None,
            }],
        })
        .await
    }

    pub async fn equipment_types(&self) -> AppResult<Vec<EquipmentTypeRecord>> {
        self.gateway.get_json(endpoints::EQUIPMENT_TYPES).await
    }

    pub async fn room_equipment(&self, room_id: i64, page: usize) -> AppResult<RoomEquipmentView> {
        let items_request = ApiRequest::get(endpoints::EQUIPMENT).query("room", room_id);
        let breakdown_request =
            ApiRequest::get(endpoints::EQUIPMENT_TYPES_BY_ROOM).query("room", room_id);

        let (items, type_breakdown) = tokio::try_join!(
            self.gateway.fetch::<Vec<Equipment>>(&items_request),
            self.gateway.fetch::<Vec<TypeBreakdown>>(&breakdown_request),
        )?;

        Ok(compose_room(
            room_id,
            items,
            type_breakdown,
            &self.catalog,
            page,
            self.page_size,
        ))
    }
}

/// Group a room's items by type and cut out the requested page of groups
pub fn compose_room(
    room_id: i64,
    items: Vec<Equipment>,
    type_breakdown: Vec<TypeBreakdown>,
    catalog: &TypeCatalog,
    page: usize,
    page_size: usize,
) -> RoomEquipmentView {
    let in_room: Vec<Equipment> = items
        .into_iter()
        .filter(|item| item.room == Some(room_id))
        .collect();

    let groups = composition::group_by_type(&in_room, catalog);
    let page = composition::paginate(&groups, page, page_size);

    RoomEquipmentView {
        room_id,
        groups: page.items,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        total_items: page.total_items,
        type_breakdown,
    }
}

/// Check a batch and build the bulk-create payload.
///
/// Types with a specification go through a selection-mode form, so a batch
/// names either a template or an inline specification, never both.
pub fn batch_payload(batch: NewEquipmentBatch) -> AppResult<BulkCreatePayload> {
    let mut errors = FieldErrors::new();
    if batch.quantity < 1 {
        errors
            .entry("quantity".to_string())
            .or_default()
            .push("Ensure this value is greater than or equal to 1.".to_string());
    }
    if batch.name.trim().is_empty() {
        errors
            .entry("name".to_string())
            .or_default()
            .push("This field may not be blank.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::FieldErrors(errors));
    }

    let ty = EquipmentType::from_id(batch.type_id)
        .ok_or_else(|| field_error("type", "Unknown equipment type."))?;

    let (specification_id, specification_data) = match (batch.template_id, batch.specification) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "Choose an existing specification or provide a new one, not both".to_string(),
            ))
        }
        (template_id, specification) if ty.schema().is_none() => {
            if template_id.is_some() || specification.is_some() {
                return Err(AppError::Validation(format!("{} has no specification", ty.label())));
            }
            (None, None)
        }
        (template_id, specification) => {
            let mut form = SpecificationForm::selection(ty)?;
            if let Some(id) = template_id {
                form.select_template(id)?;
            }
            if let Some(fields) = specification {
                form.fill(fields)?;
            }
            match form.attachment()? {
                Attachment::Reference(id) => (Some(id), None),
                Attachment::Inline(fields) => (None, Some(fields)),
            }
        }
    };

    Ok(BulkCreatePayload {
        type_id: ty.id(),
        room: batch.room,
        name: batch.name.trim().to_string(),
        quantity: batch.quantity,
        status: batch.status.unwrap_or_default(),
        contract: batch.contract,
        specification_id,
        specification_data,
    })
}

fn field_error(field: &str, message: &str) -> AppError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    AppError::FieldErrors(errors)
}
