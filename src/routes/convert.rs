//! Document-to-text routes: `/buffer-to-text` and `/blob-to-text`.
//!
//! Both routes share one flow: decode the request into a [`RawPayload`],
//! normalise it, run extraction when the payload resolved to bytes, then
//! summarise whatever text came out. They differ only in how the payload
//! arrives: a JSON `buffer` field versus a multipart upload or JSON `blob`.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::RelayError;
use crate::pipeline::payload::{self, NormalizedPayload, RawPayload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BufferRequest {
    /// Byte array or base64 string. `Option` so a missing field maps to the
    /// documented 400 instead of a deserialisation rejection.
    #[serde(default)]
    pub buffer: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct BlobRequest {
    #[serde(default)]
    pub blob: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Extracted (or passed-through) text, echoed alongside the summary.
    pub text: String,
    pub summary: String,
}

/// POST /buffer-to-text
pub async fn buffer_to_text(
    State(state): State<AppState>,
    Json(request): Json<BufferRequest>,
) -> Result<Json<ConvertResponse>, RelayError> {
    let value = request
        .buffer
        .ok_or_else(|| RelayError::MissingField("buffer required in body".into()))?;

    let payload = RawPayload::from_value(&value)?;
    respond_with_summary(&state, payload).await
}

/// POST /blob-to-text
///
/// Accepts either a multipart upload (field `file`) or a JSON body with a
/// byte-like `blob` field. The branch is picked off the Content-Type header
/// because multipart cannot be sniffed from the body alone.
pub async fn blob_to_text(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ConvertResponse>, RelayError> {
    let payload = decode_blob_request(&state, request).await?;
    respond_with_summary(&state, payload).await
}

async fn decode_blob_request(
    state: &AppState,
    request: Request,
) -> Result<RawPayload, RelayError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| RelayError::UnsupportedInput(format!("malformed multipart body: {e}")))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| RelayError::UnsupportedInput(format!("malformed multipart body: {e}")))?
        {
            if field.name() == Some("file") {
                let bytes = field.bytes().await.map_err(|e| {
                    RelayError::Internal(format!("failed to read uploaded file: {e}"))
                })?;
                debug!(bytes = bytes.len(), "received multipart upload");
                return Ok(RawPayload::Bytes(bytes.to_vec()));
            }
        }

        return Err(missing_blob());
    }

    let body = axum::body::to_bytes(request.into_body(), state.config.max_body_bytes)
        .await
        .map_err(|e| RelayError::Internal(format!("failed to read request body: {e}")))?;
    let request: BlobRequest = serde_json::from_slice(&body).map_err(|_| missing_blob())?;
    let value = request.blob.ok_or_else(missing_blob)?;
    RawPayload::from_value(&value)
}

fn missing_blob() -> RelayError {
    RelayError::MissingField("file or blob required in body".into())
}

/// Normalise, extract if needed, summarise, respond.
///
/// The work runs in a detached task: a dropped client connection must not
/// abort extraction or the upstream call already in flight, so the handler
/// only awaits the task's result.
async fn respond_with_summary(
    state: &AppState,
    payload: RawPayload,
) -> Result<Json<ConvertResponse>, RelayError> {
    let state = state.clone();
    let response = tokio::spawn(async move {
        let text = resolve_text(&state, payload).await?;
        let summary = state.summarizer.summarize(&text, None, None).await?;
        Ok::<_, RelayError>(ConvertResponse { text, summary })
    })
    .await
    .map_err(|e| RelayError::Internal(format!("request task failed: {e}")))??;

    Ok(Json(response))
}

/// Run the payload through normalisation and, for buffers, extraction.
///
/// Extraction is CPU-bound, so it runs on the blocking pool rather than
/// stalling the request executor.
async fn resolve_text(state: &AppState, payload: RawPayload) -> Result<String, RelayError> {
    match payload::normalize(payload)? {
        NormalizedPayload::Text(text) => Ok(text),
        NormalizedPayload::Buffer(bytes) => {
            let extractor = state.extractor.clone();
            tokio::task::spawn_blocking(move || extractor.extract(&bytes))
                .await
                .map_err(|e| RelayError::Internal(format!("extraction task failed: {e}")))?
        }
    }
}
