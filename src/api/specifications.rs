//! Specification template endpoints, one pair for every equipment type

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{specification::FieldKind, EquipmentType, SpecificationSchema, SpecificationTemplate},
    services::specifications::{require_schema, FormOutcome, SpecificationForm, TemplateStore},
    AppState,
};

use super::ActiveSession;

/// One field of a type's specification form
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    /// `text`, `integer`, `boolean` or `choice`
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateView {
    pub id: i64,
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

/// Form schema and stored templates for one equipment type
#[derive(Debug, Serialize, ToSchema)]
pub struct SpecificationList {
    pub equipment_type: EquipmentType,
    pub label: String,
    pub fields: Vec<FieldView>,
    pub templates: Vec<TemplateView>,
}

/// Field values for a new template
#[derive(Debug, Deserialize, ToSchema)]
pub struct TemplateDraft {
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

impl From<SpecificationTemplate> for TemplateView {
    fn from(template: SpecificationTemplate) -> Self {
        Self {
            id: template.id,
            fields: template.fields,
        }
    }
}

fn field_views(schema: &SpecificationSchema) -> Vec<FieldView> {
    schema
        .fields
        .iter()
        .map(|field| FieldView {
            name: field.name.to_string(),
            label: field.label.to_string(),
            kind: field.kind.as_str().to_string(),
            required: field.required,
            choices: match field.kind {
                FieldKind::Choice(choices) => choices.iter().map(|c| c.to_string()).collect(),
                _ => Vec::new(),
            },
        })
        .collect()
}

fn parse_type(slug: &str) -> AppResult<EquipmentType> {
    slug.parse().map_err(AppError::NotFound)
}

/// Form schema plus stored templates for a type
#[utoipa::path(
    get,
    path = "/specifications/{type}",
    tag = "specifications",
    params(("type" = String, Path, description = "Equipment type slug, e.g. `projector`")),
    responses(
        (status = 200, description = "Schema and templates", body = SpecificationList),
        (status = 400, description = "Type has no specification"),
        (status = 404, description = "Unknown equipment type")
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
    _session: ActiveSession,
    Path(slug): Path<String>,
) -> AppResult<Json<SpecificationList>> {
    let ty = parse_type(&slug)?;
    let schema = require_schema(ty)?;
    let templates = state.services.specifications.list(ty).await?;

    Ok(Json(SpecificationList {
        equipment_type: ty,
        label: ty.label().to_string(),
        fields: field_views(schema),
        templates: templates.into_iter().map(TemplateView::from).collect(),
    }))
}

/// Create a specification template
#[utoipa::path(
    post,
    path = "/specifications/{type}",
    tag = "specifications",
    params(("type" = String, Path, description = "Equipment type slug, e.g. `projector`")),
    request_body = TemplateDraft,
    responses(
        (status = 201, description = "Template created", body = TemplateView),
        (status = 400, description = "Invalid draft"),
        (status = 404, description = "Unknown equipment type")
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    _session: ActiveSession,
    Path(slug): Path<String>,
    Json(draft): Json<TemplateDraft>,
) -> AppResult<(StatusCode, Json<TemplateView>)> {
    let ty = parse_type(&slug)?;
    let mut form = SpecificationForm::authoring(ty)?;
    form.fill(draft.fields)?;

    let FormOutcome::TemplateCreated(template) = form.submit(&state.services.specifications).await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_fields_expose_their_options() {
        let views = field_views(EquipmentType::Projector.schema().unwrap());
        let throw = views.iter().find(|v| v.name == "throw_type").unwrap();
        assert_eq!(throw.kind, "choice");
        assert_eq!(throw.choices, vec!["standard", "short", "ultra-short"]);

        let model = views.iter().find(|v| v.name == "model").unwrap();
        assert!(model.choices.is_empty());
        assert!(model.required);
    }

    #[test]
    fn unknown_slug_is_not_found() {
        assert!(matches!(parse_type("toaster"), Err(AppError::NotFound(_))));
        assert_eq!(parse_type("electronic-board").unwrap(), EquipmentType::ElectronicBoard);
    }
}
