//! Call value objects

use crate::domain::shared::value_objects::{CallSessionId, PeerUid};
use serde::{Deserialize, Serialize};

/// Result code the transport returns for an accepted call
pub const RESULT_OK: i64 = 0;

/// Scope a call is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// One-to-one conversation
    Private,
    /// Group conversation
    Group,
}

/// Parameters for starting a voice call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCallParams {
    pub context_mode: ContextMode,
    pub peer_uid: PeerUid,
    /// Empty outside of group scope
    pub guild_id: String,
}

impl StartCallParams {
    /// Parameters for a call to a single peer
    pub fn private(peer_uid: PeerUid) -> Self {
        Self {
            context_mode: ContextMode::Private,
            peer_uid,
            guild_id: String::new(),
        }
    }
}

/// Transport answer to a start request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCallResult {
    pub result_code: i64,
    pub session_id: CallSessionId,
}

impl StartCallResult {
    pub fn is_accepted(&self) -> bool {
        self.result_code == RESULT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_params() {
        let params = StartCallParams::private(PeerUid::new("u_abc"));
        assert_eq!(params.context_mode, ContextMode::Private);
        assert_eq!(params.peer_uid.as_str(), "u_abc");
        assert!(params.guild_id.is_empty());
    }

    #[test]
    fn test_result_accepted() {
        let accepted = StartCallResult {
            result_code: 0,
            session_id: CallSessionId::new("S1"),
        };
        let rejected = StartCallResult {
            result_code: 7,
            session_id: CallSessionId::new(""),
        };
        assert!(accepted.is_accepted());
        assert!(!rejected.is_accepted());
    }
}
