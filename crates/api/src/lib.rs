//! Ad-ops API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! notification routing) so integration tests and the binary entrypoint
//! share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
