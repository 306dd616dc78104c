//! Call transport interface

use super::value_object::{StartCallParams, StartCallResult};
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::CallSessionId;
use async_trait::async_trait;

/// Outbound voice-call service
///
/// This is defined in the domain layer as a trait (port),
/// and implemented by whatever protocol stack carries the calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Ask the transport to start a voice call; a nonzero result code means it declined
    async fn start_voice_call(&self, params: StartCallParams) -> Result<StartCallResult>;

    /// Stop a call session, best effort
    async fn stop_voice_call(&self, session_id: &CallSessionId) -> Result<()>;
}
