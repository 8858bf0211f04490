//! Pure domain logic for the project manager backend.
//!
//! Nothing in this crate touches the database; the `pm-db` and `pm-api`
//! crates build on these types.

pub mod error;
pub mod hierarchy;
pub mod serde_helpers;
pub mod types;
