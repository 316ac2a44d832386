//! Webhook handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::actions::ActionRegistry;
use crate::error::ActionError;
use crate::server::AppError;
use crate::tracker::{BotMessage, Tracker};

/// Action call posted by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionCall {
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub tracker: Tracker,
    #[serde(default)]
    pub domain: Value,
    #[serde(default)]
    pub version: Option<String>,
}

/// Events to apply and messages to send back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Value>,
    pub responses: Vec<BotMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionSummary {
    pub name: String,
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /actions
pub async fn list_actions(State(registry): State<Arc<ActionRegistry>>) -> Json<Vec<ActionSummary>> {
    Json(
        registry
            .names()
            .into_iter()
            .map(|name| ActionSummary {
                name: name.to_string(),
            })
            .collect(),
    )
}

/// POST /webhook
pub async fn webhook(
    State(registry): State<Arc<ActionRegistry>>,
    payload: Result<Json<ActionCall>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let Json(call) = payload.map_err(|rejection| {
        ActionError::InvalidRequest(rejection.body_text())
    })?;
    let action_name = call
        .next_action
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ActionError::InvalidRequest("missing 'next_action'".to_string()))?;

    let mut tracker = call.tracker;
    if tracker.sender_id.is_empty() {
        tracker.sender_id = call.sender_id;
    }
    debug!(
        action = %action_name,
        sender_id = %tracker.sender_id,
        version = call.version.as_deref().unwrap_or("unknown"),
        "Received action call"
    );

    let (events, dispatcher) = registry.run(&action_name, &tracker, &call.domain).await?;
    Ok(Json(ActionResponse {
        events,
        responses: dispatcher.into_messages(),
    }))
}
