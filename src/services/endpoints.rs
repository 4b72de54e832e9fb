//! Remote API paths, relative to the configured base URL

use crate::models::EquipmentType;

pub const LOGIN: &str = "user/login/";
pub const TOKEN_REFRESH: &str = "api/token/refresh/";

pub const UNIVERSITY: &str = "university/";
pub const BUILDINGS: &str = "university/buildings/";
pub const FLOORS: &str = "university/floors/";
pub const FACULTIES: &str = "university/faculties/";
pub const ROOMS: &str = "university/rooms/";

pub const EQUIPMENT: &str = "inventory/equipment/";
pub const EQUIPMENT_TYPES_BY_ROOM: &str = "inventory/equipment/types-by-room/";
pub const EQUIPMENT_BULK_CREATE: &str = "inventory/equipment/bulk-create/";
pub const EQUIPMENT_BULK_UPDATE: &str = "inventory/equipment/bulk-update/";
pub const EQUIPMENT_BULK_DELETE: &str = "inventory/equipment/bulk-delete/";
pub const EQUIPMENT_MOVE: &str = "inventory/equipment/move-equipment/";
pub const EQUIPMENT_TYPES: &str = "inventory/equipment-types/";

pub const CONTRACTS: &str = "inventory/contracts/";
pub const CONTRACTS_ALL: &str = "inventory/contracts/all/";

/// `inventory/<slug>-specification/`
pub fn specification(ty: EquipmentType) -> String {
    format!("inventory/{}-specification/", ty.slug())
}

/// Join `path` onto `base`, tolerating a missing or doubled slash
pub fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specification_paths_follow_slugs() {
        assert_eq!(specification(EquipmentType::Computer), "inventory/computer-specification/");
        assert_eq!(
            specification(EquipmentType::ElectronicBoard),
            "inventory/electronic-board-specification/"
        );
    }

    #[test]
    fn join_normalises_slashes() {
        assert_eq!(join("https://api.example.edu/", "/user/login/"), "https://api.example.edu/user/login/");
        assert_eq!(join("https://api.example.edu", "university/"), "https://api.example.edu/university/");
    }
}
