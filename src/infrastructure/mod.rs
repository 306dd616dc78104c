//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - In-memory identity directory
//! - Loopback call transport

pub mod memory;

pub use memory::{InMemoryDirectory, LoopbackTransport};
