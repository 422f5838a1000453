//! Notification routing.
//!
//! The [`NotificationRouter`] subscribes to the event bus and turns
//! platform events into per-user in-app notifications.

pub mod router;

pub use router::NotificationRouter;
