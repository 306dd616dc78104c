//! Identity resolver interface

use crate::domain::shared::error::Result;
use crate::domain::shared::value_objects::PeerUid;
use async_trait::async_trait;

/// Resolves a public identity to the identifier the call transport understands
///
/// Implemented outside the domain layer. An `Ok(None)` means the target
/// is unknown; implementations do not distinguish why.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up the internal identifier for a public identity in its canonical text form
    async fn resolve(&self, public_id: &str) -> Result<Option<PeerUid>>;
}
