//! RingGate - ring-only private calls for a bot protocol gateway
//!
//! Given a target user, the `call_private_ring` action starts a private
//! voice call and cancels it automatically a few seconds later, leaving
//! the target with a ring and nothing more.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
