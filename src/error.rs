//! Error types for the docrelay library.
//!
//! One enum covers the whole request path. The variants mirror the stages a
//! request moves through (payload normalisation, text extraction,
//! summarisation) plus configuration and transport failures. Handlers never
//! recover from any of these; every error propagates to the HTTP boundary
//! where [`IntoResponse`] turns it into a JSON body. Only a missing request
//! field maps to 400; everything else is a 500 carrying the error's message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// All errors returned by the docrelay library.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Payload errors ────────────────────────────────────────────────────
    /// The payload shape is not one the normalisation cascade recognises.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// A required request body field is absent. The only 400.
    ///
    /// The message is the full client-facing text (e.g. "buffer required in
    /// body"), so `Display` passes it through unchanged.
    #[error("{0}")]
    MissingField(String),

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The PDF parser rejected the buffer; carries the parser's own message.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    // ── Summarisation errors ──────────────────────────────────────────────
    /// No API credential configured; checked before any network call.
    #[error("no summarization API key configured (set OPENAI_API_KEY)")]
    MissingCredential,

    /// The summarisation endpoint answered with a non-success status.
    #[error("summarization API returned HTTP {status}: {body}")]
    SummarizationApi { status: u16, body: String },

    /// Transport-level failure (connect, timeout) before any HTTP status
    /// existed.
    #[error("summarization request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── Config / catch-all ────────────────────────────────────────────────
    /// Bad bind address or CORS origin at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error (task join failures etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingField(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        // Log server-side before the message is handed to the client.
        if status.is_server_error() {
            tracing::error!(%message, "request failed");
        } else {
            tracing::warn!(%message, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
