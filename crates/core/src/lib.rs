//! Domain logic for the ad-ops backend.
//!
//! Everything here is pure: constants, validation and arithmetic shared by
//! the database and HTTP layers. No I/O happens in this crate.

pub mod campaign;
pub mod error;
pub mod event_types;
pub mod export;
pub mod financials;
pub mod pagination;
pub mod pnl;
pub mod proposal;
pub mod revenue;
pub mod roles;
pub mod show;
pub mod talent_approval;
pub mod types;
pub mod validation;
