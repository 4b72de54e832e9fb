//! Shared domain enums: the equipment type catalog and item status

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::specification::{self, SpecificationSchema};

// ---------------------------------------------------------------------------
// EquipmentType
// ---------------------------------------------------------------------------

/// Hardware categories known to the inventory, with their remote ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[repr(i32)]
pub enum EquipmentType {
    Monoblock = 1,
    Computer = 2,
    Projector = 3,
    Printer = 4,
    ElectronicBoard = 5,
    Tv = 6,
    Laptop = 7,
    Router = 8,
    Monitor = 9,
    Extension = 10,
}

impl EquipmentType {
    /// Catalog order, which is also display order
    pub const ALL: [EquipmentType; 10] = [
        EquipmentType::Monoblock,
        EquipmentType::Computer,
        EquipmentType::Projector,
        EquipmentType::Printer,
        EquipmentType::ElectronicBoard,
        EquipmentType::Tv,
        EquipmentType::Laptop,
        EquipmentType::Router,
        EquipmentType::Monitor,
        EquipmentType::Extension,
    ];

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Display label used throughout the dashboard
    pub fn label(self) -> &'static str {
        match self {
            EquipmentType::Monoblock => "Моноблок",
            EquipmentType::Computer => "Компьютер",
            EquipmentType::Projector => "Проектор",
            EquipmentType::Printer => "Принтер",
            EquipmentType::ElectronicBoard => "Электронная доска",
            EquipmentType::Tv => "Телевизор",
            EquipmentType::Laptop => "Ноутбук",
            EquipmentType::Router => "Роутер",
            EquipmentType::Monitor => "Монитор",
            EquipmentType::Extension => "Удлинитель",
        }
    }

    /// Path segment used both by our routes and by `inventory/<slug>-specification/`
    pub fn slug(self) -> &'static str {
        match self {
            EquipmentType::Monoblock => "monoblock",
            EquipmentType::Computer => "computer",
            EquipmentType::Projector => "projector",
            EquipmentType::Printer => "printer",
            EquipmentType::ElectronicBoard => "electronic-board",
            EquipmentType::Tv => "tv",
            EquipmentType::Laptop => "laptop",
            EquipmentType::Router => "router",
            EquipmentType::Monitor => "monitor",
            EquipmentType::Extension => "extension",
        }
    }

    /// Specification shape for this type; extension cords have none
    pub fn schema(self) -> Option<&'static SpecificationSchema> {
        specification::schema_for(self)
    }
}

impl std::fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for EquipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == s)
            .ok_or_else(|| format!("Unknown equipment type: {}", s))
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a single equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    New,
    Working,
    NeedsRepair,
    Disposed,
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        EquipmentStatus::New
    }
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::New => "NEW",
            EquipmentStatus::Working => "WORKING",
            EquipmentStatus::NeedsRepair => "NEEDS_REPAIR",
            EquipmentStatus::Disposed => "DISPOSED",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
