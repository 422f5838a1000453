//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller decoded from a Bearer token.
//! - [`rbac::RequireAdmin`], [`rbac::RequireSales`], [`rbac::RequireFinance`]
//!   -- role gates; `admin` passes every gate.

pub mod auth;
pub mod rbac;
