//! Interface layer - External interfaces
//!
//! This layer handles:
//! - Bot action dispatch
//! - HTTP endpoints
//! - Request/response formatting

pub mod api;
