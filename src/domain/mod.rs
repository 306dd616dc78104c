//! Domain layer - Core business rules
//!
//! This layer contains:
//! - Value Objects: identities and call parameters
//! - Request validation
//! - Ports: the identity resolver and the call transport

pub mod call;
pub mod shared;
pub mod user;

// Re-export commonly used types
pub use shared::{DomainError, Result};
