//! API interface implementations

pub mod action;
pub mod action_dto;
pub mod actions_handler;
pub mod call_private_ring;
pub mod metrics_handler;
pub mod router;

pub use action::{ActionHandler, ActionName, ActionRouter};
pub use action_dto::{ActionResponse, ActionStatus};
pub use actions_handler::AppState;
pub use call_private_ring::CallPrivateRing;
pub use metrics_handler::init_metrics;
pub use router::build_router;
