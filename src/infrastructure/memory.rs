//! In-memory collaborators
//!
//! Stand-ins for the identity service and the call transport, used when the
//! gateway runs without a real protocol backend and by the integration tests.

use crate::domain::call::value_object::RESULT_OK;
use crate::domain::call::{CallTransport, StartCallParams, StartCallResult};
use crate::domain::shared::error::{DomainError, Result};
use crate::domain::shared::value_objects::{CallSessionId, PeerUid};
use crate::domain::user::IdentityResolver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Identity directory backed by a map of public id to internal uid
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<String, PeerUid>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(public_id, uid)| (public_id, PeerUid::new(uid)))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub async fn insert(&self, public_id: impl Into<String>, uid: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(public_id.into(), PeerUid::new(uid));
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryDirectory {
    async fn resolve(&self, public_id: &str) -> Result<Option<PeerUid>> {
        Ok(self.entries.read().await.get(public_id).cloned())
    }
}

/// A call the loopback transport has seen
#[derive(Debug, Clone)]
pub struct StartedCall {
    pub session_id: CallSessionId,
    pub params: StartCallParams,
    pub started_at: DateTime<Utc>,
}

/// A stop request the loopback transport has seen
#[derive(Debug, Clone)]
pub struct StoppedCall {
    pub session_id: CallSessionId,
    pub at: Instant,
}

/// Call transport that accepts calls locally and records what it was asked to do
pub struct LoopbackTransport {
    reject_with: Option<i64>,
    fail_stops: bool,
    started: RwLock<Vec<StartedCall>>,
    stopped: RwLock<Vec<StoppedCall>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            reject_with: None,
            fail_stops: false,
            started: RwLock::new(Vec::new()),
            stopped: RwLock::new(Vec::new()),
        }
    }

    /// Decline every call with the given result code
    pub fn rejecting(code: i64) -> Self {
        Self {
            reject_with: Some(code),
            ..Self::new()
        }
    }

    /// Accept calls but fail every stop request
    pub fn failing_stops() -> Self {
        Self {
            fail_stops: true,
            ..Self::new()
        }
    }

    pub async fn started_calls(&self) -> Vec<StartedCall> {
        self.started.read().await.clone()
    }

    pub async fn stopped_calls(&self) -> Vec<StoppedCall> {
        self.stopped.read().await.clone()
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallTransport for LoopbackTransport {
    async fn start_voice_call(&self, params: StartCallParams) -> Result<StartCallResult> {
        if let Some(code) = self.reject_with {
            debug!("Loopback transport declining call to {} with {}", params.peer_uid, code);
            return Ok(StartCallResult {
                result_code: code,
                session_id: CallSessionId::new(""),
            });
        }

        let session_id = CallSessionId::new(Uuid::new_v4().to_string());
        info!("Loopback call {} started to {}", session_id, params.peer_uid);

        self.started.write().await.push(StartedCall {
            session_id: session_id.clone(),
            params,
            started_at: Utc::now(),
        });

        Ok(StartCallResult {
            result_code: RESULT_OK,
            session_id,
        })
    }

    async fn stop_voice_call(&self, session_id: &CallSessionId) -> Result<()> {
        self.stopped.write().await.push(StoppedCall {
            session_id: session_id.clone(),
            at: Instant::now(),
        });

        if self.fail_stops {
            return Err(DomainError::Transport(format!("call {} is not stoppable", session_id)));
        }

        info!("Loopback call {} stopped", session_id);
        Ok(())
    }
}
