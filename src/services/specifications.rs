//! Specification templates and the generic per-type specification form

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{endpoints, gateway::GatewayClient};
use crate::{
    error::{AppError, AppResult},
    models::{EquipmentType, SpecificationSchema, SpecificationTemplate},
};

/// Where specification templates live
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list(&self, ty: EquipmentType) -> AppResult<Vec<SpecificationTemplate>>;

    async fn create(
        &self,
        ty: EquipmentType,
        fields: Map<String, Value>,
    ) -> AppResult<SpecificationTemplate>;
}

/// Templates stored in the remote inventory, one endpoint pair per type
#[derive(Clone)]
pub struct SpecificationService {
    gateway: GatewayClient,
}

impl SpecificationService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TemplateStore for SpecificationService {
    async fn list(&self, ty: EquipmentType) -> AppResult<Vec<SpecificationTemplate>> {
        let schema = require_schema(ty)?;
        self.gateway
            .get_json(&endpoints::specification(schema.equipment_type))
            .await
    }

    async fn create(
        &self,
        ty: EquipmentType,
        fields: Map<String, Value>,
    ) -> AppResult<SpecificationTemplate> {
        let schema = require_schema(ty)?;
        let template: SpecificationTemplate = self
            .gateway
            .post_json(&endpoints::specification(schema.equipment_type), &fields)
            .await?;
        tracing::info!("Created {} specification template {}", ty.slug(), template.id);
        Ok(template)
    }
}

pub fn require_schema(ty: EquipmentType) -> AppResult<&'static SpecificationSchema> {
    ty.schema().ok_or_else(|| {
        AppError::BadRequest(format!("{} has no specification", ty.label()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Submits straight to the create-specification endpoint
    Authoring,
    /// Picks an existing template or an inline draft for a new equipment batch
    Selection,
}

/// Signal handed back to the step flow that hosts an authoring form
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    TemplateCreated(SpecificationTemplate),
}

/// What a selection-mode form contributes to an equipment batch
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Reference(i64),
    Inline(Map<String, Value>),
}

/// One form for every equipment type, driven by the type's field schema.
///
/// In selection mode the selected template id and the inline draft exclude
/// each other: choosing one clears the other.
#[derive(Debug, Clone)]
pub struct SpecificationForm {
    schema: &'static SpecificationSchema,
    mode: FormMode,
    draft: Map<String, Value>,
    selected_template: Option<i64>,
}

impl SpecificationForm {
    pub fn new(ty: EquipmentType, mode: FormMode) -> AppResult<Self> {
        Ok(Self {
            schema: require_schema(ty)?,
            mode,
            draft: Map::new(),
            selected_template: None,
        })
    }

    pub fn authoring(ty: EquipmentType) -> AppResult<Self> {
        Self::new(ty, FormMode::Authoring)
    }

    pub fn selection(ty: EquipmentType) -> AppResult<Self> {
        Self::new(ty, FormMode::Selection)
    }

    pub fn draft(&self) -> &Map<String, Value> {
        &self.draft
    }

    pub fn selected_template(&self) -> Option<i64> {
        self.selected_template
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> AppResult<()> {
        if self.schema.field(name).is_none() {
            return Err(AppError::Validation(format!(
                "{} specification has no field '{}'",
                self.schema.equipment_type.slug(),
                name
            )));
        }
        self.selected_template = None;
        self.draft.insert(name.to_string(), value);
        Ok(())
    }

    pub fn fill(&mut self, fields: Map<String, Value>) -> AppResult<()> {
        for (name, value) in fields {
            self.set_field(&name, value)?;
        }
        Ok(())
    }

    pub fn select_template(&mut self, id: i64) -> AppResult<()> {
        if self.mode != FormMode::Selection {
            return Err(AppError::BadRequest(
                "Templates can only be selected when attaching to equipment".to_string(),
            ));
        }
        self.draft.clear();
        self.selected_template = Some(id);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.draft.clear();
        self.selected_template = None;
    }

    pub fn validate(&self) -> AppResult<()> {
        self.schema.validate(&self.draft).map_err(AppError::FieldErrors)
    }

    /// Create a template from the draft. The draft is reset only on success.
    pub async fn submit(&mut self, store: &dyn TemplateStore) -> AppResult<FormOutcome> {
        if self.mode != FormMode::Authoring {
            return Err(AppError::BadRequest(
                "Only authoring forms create templates".to_string(),
            ));
        }
        self.validate()?;

        let template = store
            .create(self.schema.equipment_type, self.draft.clone())
            .await?;
        self.reset();
        Ok(FormOutcome::TemplateCreated(template))
    }

    /// Reference or inline specification for a new equipment batch
    pub fn attachment(&self) -> AppResult<Attachment> {
        if self.mode != FormMode::Selection {
            return Err(AppError::BadRequest(
                "Only selection forms attach specifications".to_string(),
            ));
        }
        if let Some(id) = self.selected_template {
            return Ok(Attachment::Reference(id));
        }
        if self.draft.is_empty() {
            return Err(AppError::Validation(format!(
                "Choose an existing {} specification or fill one in",
                self.schema.equipment_type.slug()
            )));
        }
        self.validate()?;
        Ok(Attachment::Inline(self.draft.clone()))
    }
}
