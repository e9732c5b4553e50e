//! Plain-text summarisation route.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Optional context prepended to the text before summarisation.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// POST /summarize
pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, RelayError> {
    let text = request
        .text
        .ok_or_else(|| RelayError::MissingField("text required in body".into()))?;

    // Detached so a client disconnect does not abort the upstream call.
    let summarizer = state.summarizer.clone();
    let context = request.context;
    let summary = tokio::spawn(async move {
        summarizer.summarize(&text, context.as_deref(), None).await
    })
    .await
    .map_err(|e| RelayError::Internal(format!("request task failed: {e}")))??;

    Ok(Json(SummarizeResponse { summary }))
}
