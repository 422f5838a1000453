//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate through `adops_core`, delegate to the matching
//! repository in `adops_db`, publish events where other users care, and
//! map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod campaign;
pub mod creative;
pub mod episode;
pub mod expense;
pub mod financials;
pub mod invoice;
pub mod notification;
pub mod organization;
pub mod proposal;
pub mod revenue;
pub mod show;
pub mod talent_approval;
