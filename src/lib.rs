//! # docrelay
//!
//! A small HTTP relay that turns document payloads into summaries. It does
//! three things, in order, and nothing else:
//!
//! ```text
//! request payload
//!  │
//!  ├─ 1. Normalise  bytes / numeric array / base64 / plain text / upload
//!  │                → one canonical byte buffer, or already-decoded text
//!  ├─ 2. Extract    PDF bytes → text (pdf-extract, behind a trait)
//!  └─ 3. Summarise  text → summary via a chat-completions API (reqwest)
//! ```
//!
//! Each request is handled end-to-end as one independent task; there is no
//! shared mutable state, no retry, no persistence, and no streaming.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docrelay::{serve, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), docrelay::RelayError> {
//!     // Credential and port come from OPENAI_API_KEY / PORT.
//!     serve(AppConfig::from_env()).await
//! }
//! ```
//!
//! ## HTTP surface
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `GET /test` | — | status probe |
//! | `GET /` | — | HTML usage page |
//! | `POST /buffer-to-text` | `{"buffer": number[] \| base64}` | `{"text", "summary"}` |
//! | `POST /blob-to-text` | multipart `file` or `{"blob": ...}` | `{"text", "summary"}` |
//! | `POST /summarize` | `{"text", "context"?}` | `{"summary"}` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod routes;
pub mod server;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::AppConfig;
pub use error::RelayError;
pub use pipeline::extract::{PdfTextExtractor, TextExtractor};
pub use pipeline::payload::{normalize, NormalizedPayload, RawPayload};
pub use pipeline::summarize::{OpenAiSummarizer, SummarizeOptions, Summarizer};
pub use server::{build_router, serve};
pub use state::AppState;
