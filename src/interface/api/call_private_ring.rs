//! `call_private_ring` action
//!
//! Rings a user through a private voice call that is hung up automatically
//! after [`RING_DURATION`]. Every outcome, including panics inside the
//! collaborators, comes back as an [`ActionResponse`].

use super::action::{ActionHandler, ActionName};
use super::action_dto::{ActionResponse, RingData, RETCODE_OK};
use crate::application::{RingService, RING_DURATION};
use crate::domain::call::CallRequest;
use crate::domain::shared::error::{DomainError, Result, RETCODE_INTERNAL};
use async_trait::async_trait;
use futures::FutureExt;
use metrics::counter;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::error;

pub struct CallPrivateRing {
    service: Arc<RingService>,
}

impl CallPrivateRing {
    pub fn new(service: Arc<RingService>) -> Self {
        Self { service }
    }

    fn parse(payload: &Value) -> Result<CallRequest> {
        serde_json::from_value(payload.clone()).map_err(|_| {
            DomainError::MalformedField("user_id must be a number or a string of digits".to_string())
        })
    }
}

#[async_trait]
impl ActionHandler for CallPrivateRing {
    fn name(&self) -> ActionName {
        ActionName::CallPrivateRing
    }

    async fn check(&self, payload: &Value) -> Result<()> {
        Self::parse(payload)?.validate()
    }

    async fn handle(&self, payload: Value) -> ActionResponse {
        let request = match Self::parse(&payload) {
            Ok(request) => request,
            Err(e) => return ActionResponse::failed(RETCODE_INTERNAL, e.to_string()),
        };

        let outcome = AssertUnwindSafe(self.service.ring(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DomainError::Internal(panic_message(panic.as_ref()))));

        let response = match outcome {
            Ok(receipt) => ActionResponse::ok(RingData {
                call_id: receipt.session_id.to_string(),
                message: format!(
                    "Call request sent, it will be cancelled automatically in {} seconds",
                    RING_DURATION.as_secs()
                ),
            }),
            Err(e) => {
                if e.retcode() == RETCODE_INTERNAL {
                    error!("Ring call failed: {}", e);
                }
                ActionResponse::failed(e.retcode(), failure_message(&e))
            }
        };

        let label = if response.retcode == RETCODE_OK { "ok" } else { "failed" };
        counter!("ring_requests_total", "outcome" => label).increment(1);
        response
    }
}

fn failure_message(error: &DomainError) -> String {
    match error {
        DomainError::UnknownTarget | DomainError::CallRejected(_) => error.to_string(),
        other => format!("Server failed to process the request: {}", other),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "call handler panicked".to_string()
    }
}
