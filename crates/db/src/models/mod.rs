//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod campaign;
pub mod creative;
pub mod episode;
pub mod event;
pub mod expense;
pub mod financial;
pub mod invoice;
pub mod notification;
pub mod organization;
pub mod proposal;
pub mod role;
pub mod session;
pub mod show;
pub mod talent_approval;
pub mod user;
