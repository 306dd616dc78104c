//! Ring-only call use case
//!
//! Resolves the target, starts a private voice call and hands the new
//! session to the [`AutoTerminator`]. Validation has already happened by
//! the time [`RingService::ring`] is called.

use super::auto_terminator::AutoTerminator;
use crate::domain::call::{CallRequest, CallTransport, StartCallParams};
use crate::domain::shared::error::{DomainError, Result};
use crate::domain::shared::value_objects::{CallSessionId, PeerUid, PublicId};
use crate::domain::user::IdentityResolver;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What an accepted ring call leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingReceipt {
    pub public_id: PublicId,
    pub peer_uid: PeerUid,
    pub session_id: CallSessionId,
}

pub struct RingService {
    resolver: Arc<dyn IdentityResolver>,
    transport: Arc<dyn CallTransport>,
    terminator: AutoTerminator,
}

impl RingService {
    pub fn new(
        resolver: Arc<dyn IdentityResolver>,
        transport: Arc<dyn CallTransport>,
        terminator: AutoTerminator,
    ) -> Self {
        Self {
            resolver,
            transport,
            terminator,
        }
    }

    /// Ring the target of a validated request and schedule the hang-up
    pub async fn ring(&self, request: &CallRequest) -> Result<RingReceipt> {
        let public_id = request.public_id()?;

        let peer_uid = match self.resolver.resolve(&public_id.to_string()).await? {
            Some(uid) => uid,
            None => {
                warn!("No internal identifier for user {}", public_id);
                return Err(DomainError::UnknownTarget);
            }
        };
        debug!("Resolved user {} to {}", public_id, peer_uid);

        let result = self
            .transport
            .start_voice_call(StartCallParams::private(peer_uid.clone()))
            .await?;
        if !result.is_accepted() {
            warn!("Call to user {} rejected with code {}", public_id, result.result_code);
            return Err(DomainError::CallRejected(result.result_code));
        }

        self.terminator.schedule(result.session_id.clone())?;
        info!("Ringing user {} (call {})", public_id, result.session_id);

        Ok(RingReceipt {
            public_id,
            peer_uid,
            session_id: result.session_id,
        })
    }

    pub fn terminator(&self) -> &AutoTerminator {
        &self.terminator
    }
}
