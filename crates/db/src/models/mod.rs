//! Domain model structs and DTOs.
//!
//! Each entity submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for partial updates
//!
//! Update DTOs use `Option<Option<T>>` for nullable columns so that an
//! explicit JSON `null` clears the value while an absent key leaves it alone.

pub mod milestone;
pub mod project;
pub mod status;
pub mod task;
pub mod worklog;

/// Largest value an hours column (`NUMERIC(10, 2)`) can hold.
pub const MAX_HOURS: f64 = 99_999_999.99;
