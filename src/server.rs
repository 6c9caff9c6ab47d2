//! Action-server webhook.
//!
//! Speaks the custom-action protocol of the conversational framework:
//! the framework POSTs the action name plus a tracker snapshot to `/webhook`
//! and receives the uttered messages and follow-up events back.

use crate::actions::{ActionError, ActionRegistry, Tracker};
use crate::github::client::IssueSource;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body of a `/webhook` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCall {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: Tracker,
    #[serde(default)]
    pub domain: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionInfo {
    pub name: String,
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        match &self {
            ActionError::UnknownAction(name) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": self.to_string(),
                    "action_name": name,
                })),
            )
                .into_response(),
        }
    }
}

pub fn router<S>(registry: Arc<ActionRegistry<S>>) -> Router
where
    S: IssueSource + 'static,
{
    Router::new()
        .route("/webhook", post(handle_webhook::<S>))
        .route("/health", get(handle_health))
        .route("/actions", get(handle_actions::<S>))
        .with_state(registry)
}

async fn handle_webhook<S: IssueSource + 'static>(
    State(registry): State<Arc<ActionRegistry<S>>>,
    Json(call): Json<ActionCall>,
) -> Response {
    tracing::debug!(
        action = %call.next_action,
        sender = call.sender_id.as_deref().or(call.tracker.sender_id.as_deref()),
        "received action call"
    );
    match registry.run(&call.next_action, &call.tracker).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "rejected action call");
            err.into_response()
        }
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_actions<S: IssueSource + 'static>(
    State(registry): State<Arc<ActionRegistry<S>>>,
) -> Json<Vec<ActionInfo>> {
    Json(
        registry
            .names()
            .into_iter()
            .map(|name| ActionInfo {
                name: name.to_string(),
            })
            .collect(),
    )
}

/// Serves the webhook on an already bound listener until the task is dropped.
pub async fn serve<S>(listener: TcpListener, registry: Arc<ActionRegistry<S>>) -> anyhow::Result<()>
where
    S: IssueSource + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "action server listening");
    axum::serve(listener, router(registry)).await?;
    Ok(())
}
