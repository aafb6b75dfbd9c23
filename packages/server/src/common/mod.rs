// Common utilities and types shared across domains
pub mod field_update;
pub mod record_id;

pub use field_update::FieldUpdate;
pub use record_id::RecordId;
