//! Action dispatch
//!
//! Each bot action is a named handler with a payload check and a handle
//! step. The router looks handlers up by wire name; payloads that fail the
//! check never reach `handle`.

use super::action_dto::{ActionResponse, RETCODE_BAD_REQUEST, RETCODE_UNSUPPORTED_ACTION};
use crate::domain::shared::error::Result;
use async_trait::async_trait;
use metrics::counter;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Names of the actions this gateway serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    CallPrivateRing,
}

impl ActionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::CallPrivateRing => "call_private_ring",
        }
    }
}

impl FromStr for ActionName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "call_private_ring" => Ok(ActionName::CallPrivateRing),
            other => Err(format!("Unsupported action: {}", other)),
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for handling bot actions
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn name(&self) -> ActionName;

    /// Validate the payload; no side effects
    async fn check(&self, _payload: &Value) -> Result<()> {
        Ok(())
    }

    /// Execute the action on a checked payload
    async fn handle(&self, payload: Value) -> ActionResponse;

    /// Check, then handle
    async fn run(&self, payload: Value) -> ActionResponse {
        if let Err(e) = self.check(&payload).await {
            debug!("Action {} rejected: {}", self.name(), e);
            return ActionResponse::failed(RETCODE_BAD_REQUEST, e.to_string());
        }
        self.handle(payload).await
    }
}

/// Registry of action handlers
#[derive(Default)]
pub struct ActionRouter {
    handlers: HashMap<ActionName, Arc<dyn ActionHandler>>,
}

impl ActionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        info!("Registered action {}", handler.name());
        self.handlers.insert(handler.name(), handler);
    }

    pub fn actions(&self) -> Vec<ActionName> {
        self.handlers.keys().copied().collect()
    }

    /// Run the action registered under `name`
    pub async fn dispatch(&self, name: &str, payload: Value) -> ActionResponse {
        let handler = match name.parse::<ActionName>().ok().and_then(|n| self.handlers.get(&n)) {
            Some(handler) => handler,
            None => {
                warn!("No handler for action {}", name);
                return ActionResponse::failed(
                    RETCODE_UNSUPPORTED_ACTION,
                    format!("Unsupported action: {}", name),
                );
            }
        };

        let response = handler.run(payload).await;
        counter!(
            "action_requests_total",
            "action" => handler.name().as_str(),
            "status" => response.status.as_str()
        )
        .increment(1);
        response
    }
}
