//! HTTP handlers for bot actions

use super::action::ActionRouter;
use super::action_dto::ActionResponse;
use crate::application::AutoTerminator;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<ActionRouter>,
    pub terminator: AutoTerminator,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub actions: Vec<String>,
    pub pending_cancellations: usize,
}

/// Run an action with a JSON body
pub async fn post_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    payload: Option<Json<Value>>,
) -> Json<ActionResponse> {
    info!("API: Action {}", action);

    let payload = payload
        .map(|Json(value)| value)
        .unwrap_or_else(|| Value::Object(Map::new()));
    Json(state.actions.dispatch(&action, payload).await)
}

/// Run an action with its parameters in the query string
pub async fn get_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ActionResponse> {
    info!("API: Action {} (query)", action);

    let payload = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect::<Map<String, Value>>();
    Json(state.actions.dispatch(&action, Value::Object(payload)).await)
}

/// Health check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut actions: Vec<String> = state
        .actions
        .actions()
        .iter()
        .map(|name| name.to_string())
        .collect();
    actions.sort();

    Json(HealthResponse {
        status: "ok".to_string(),
        actions,
        pending_cancellations: state.terminator.pending_count(),
    })
}
