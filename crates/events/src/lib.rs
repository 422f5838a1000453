//! Ad-ops event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventPersistence`]: background service writing every event to the
//!   `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
