//! Data models mirrored from the remote inventory API

pub mod contract;
pub mod enums;
pub mod equipment;
pub mod location;
pub mod session;
pub mod specification;

// Re-export commonly used types
pub use contract::Contract;
pub use enums::{EquipmentStatus, EquipmentType};
pub use equipment::Equipment;
pub use location::{Building, Faculty, Floor, Room, University};
pub use session::{AuthState, Session, StoredSession};
pub use specification::{SpecificationSchema, SpecificationTemplate};
