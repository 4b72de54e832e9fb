//! Specification templates: per-type field schemas and stored templates

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::EquipmentType;
use crate::error::FieldErrors;

/// Kind of value a specification field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice(_) => "choice",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Text, required: true }
}

const fn integer(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Integer, required: true }
}

const fn flag(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Boolean, required: false }
}

const fn choice(
    name: &'static str,
    label: &'static str,
    choices: &'static [&'static str],
) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Choice(choices), required: true }
}

const fn optional(mut field: FieldSpec) -> FieldSpec {
    field.required = false;
    field
}

/// Field list describing one equipment type's specification
#[derive(Debug)]
pub struct SpecificationSchema {
    pub equipment_type: EquipmentType,
    pub fields: &'static [FieldSpec],
}

impl SpecificationSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check a draft against the schema, collecting every problem per field
    pub fn validate(&self, draft: &Map<String, Value>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for name in draft.keys() {
            if self.field(name).is_none() {
                errors
                    .entry(name.clone())
                    .or_default()
                    .push("Unknown field.".to_string());
            }
        }

        for field in self.fields {
            match draft.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        errors
                            .entry(field.name.to_string())
                            .or_default()
                            .push("This field is required.".to_string());
                    }
                }
                Some(value) => {
                    if let Err(msg) = check_value(field, value) {
                        errors.entry(field.name.to_string()).or_default().push(msg);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_value(field: &FieldSpec, value: &Value) -> Result<(), String> {
    match (field.kind, value) {
        (_, Value::String(s)) if s.trim().is_empty() && field.required => {
            Err("This field may not be blank.".to_string())
        }
        // A blank optional input is the same as leaving it out
        (_, Value::String(s)) if s.trim().is_empty() => Ok(()),
        (FieldKind::Text, Value::String(_)) => Ok(()),
        (FieldKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(()),
        (FieldKind::Integer, Value::String(s)) if s.trim().parse::<i64>().is_ok() => Ok(()),
        (FieldKind::Integer, _) => Err("A valid integer is required.".to_string()),
        (FieldKind::Boolean, Value::Bool(_)) => Ok(()),
        (FieldKind::Boolean, _) => Err("Must be true or false.".to_string()),
        (FieldKind::Choice(choices), Value::String(s)) if choices.contains(&s.as_str()) => Ok(()),
        (FieldKind::Choice(choices), _) => {
            Err(format!("Must be one of: {}.", choices.join(", ")))
        }
        (FieldKind::Text, _) => Err("Not a valid string.".to_string()),
    }
}

/// Stored, reusable specification as returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationTemplate {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Per-type schemas
// ---------------------------------------------------------------------------

const STORAGE_KINDS: &[&str] = &["HDD", "SSD"];
const THROW_TYPES: &[&str] = &["standard", "short", "ultra-short"];
const PANEL_TYPES: &[&str] = &["IPS", "VA", "TN", "OLED"];
const PRINT_TYPES: &[&str] = &["laser", "inkjet"];

static COMPUTER: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Computer,
    fields: &[
        text("cpu", "Процессор"),
        integer("ram", "ОЗУ, ГБ"),
        choice("storage_type", "Тип накопителя", STORAGE_KINDS),
        integer("storage", "Объём накопителя, ГБ"),
        optional(integer("monitor_size", "Диагональ монитора")),
        flag("has_keyboard", "Клавиатура"),
        flag("has_mouse", "Мышь"),
    ],
};

static MONOBLOCK: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Monoblock,
    fields: &[
        text("cpu", "Процессор"),
        integer("ram", "ОЗУ, ГБ"),
        choice("storage_type", "Тип накопителя", STORAGE_KINDS),
        integer("storage", "Объём накопителя, ГБ"),
        integer("screen_size", "Диагональ экрана"),
        flag("has_keyboard", "Клавиатура"),
        flag("has_mouse", "Мышь"),
    ],
};

static LAPTOP: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Laptop,
    fields: &[
        text("cpu", "Процессор"),
        integer("ram", "ОЗУ, ГБ"),
        choice("storage_type", "Тип накопителя", STORAGE_KINDS),
        integer("storage", "Объём накопителя, ГБ"),
        integer("monitor_size", "Диагональ экрана"),
    ],
};

static PROJECTOR: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Projector,
    fields: &[
        text("model", "Модель"),
        integer("lumens", "Яркость, лм"),
        text("resolution", "Разрешение"),
        choice("throw_type", "Тип проекции", THROW_TYPES),
    ],
};

static PRINTER: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Printer,
    fields: &[
        text("model", "Модель"),
        choice("print_type", "Тип печати", PRINT_TYPES),
        flag("color", "Цветная печать"),
        flag("duplex", "Двусторонняя печать"),
    ],
};

static ELECTRONIC_BOARD: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::ElectronicBoard,
    fields: &[
        text("model", "Модель"),
        integer("screen_size", "Диагональ"),
        flag("touch", "Сенсорная"),
    ],
};

static TV: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Tv,
    fields: &[
        text("model", "Модель"),
        integer("screen_size", "Диагональ"),
        optional(text("resolution", "Разрешение")),
    ],
};

static ROUTER: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Router,
    fields: &[
        text("model", "Модель"),
        integer("ports", "Количество портов"),
        text("wifi_standard", "Стандарт Wi-Fi"),
    ],
};

static MONITOR: SpecificationSchema = SpecificationSchema {
    equipment_type: EquipmentType::Monitor,
    fields: &[
        text("model", "Модель"),
        integer("screen_size", "Диагональ"),
        choice("panel_type", "Тип матрицы", PANEL_TYPES),
        optional(integer("refresh_rate", "Частота обновления, Гц")),
    ],
};

pub(crate) fn schema_for(ty: EquipmentType) -> Option<&'static SpecificationSchema> {
    match ty {
        EquipmentType::Computer => Some(&COMPUTER),
        EquipmentType::Monoblock => Some(&MONOBLOCK),
        EquipmentType::Laptop => Some(&LAPTOP),
        EquipmentType::Projector => Some(&PROJECTOR),
        EquipmentType::Printer => Some(&PRINTER),
        EquipmentType::ElectronicBoard => Some(&ELECTRONIC_BOARD),
        EquipmentType::Tv => Some(&TV),
        EquipmentType::Router => Some(&ROUTER),
        EquipmentType::Monitor => Some(&MONITOR),
        EquipmentType::Extension => None,
    }
}
