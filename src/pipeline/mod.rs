//! Pipeline stages for the document relay.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! can be tested in isolation and swapped behind its trait without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! payload ──────▶ extract ──────▶ summarize
//! (bytes/text)   (pdf-extract)   (chat completion)
//! ```
//!
//! 1. [`payload`] — resolve a heterogeneous request payload (bytes, numeric
//!    array, base64 string, plain text, uploaded file) to a canonical byte
//!    buffer or already-decoded text
//! 2. [`extract`] — pull text out of PDF bytes; callers run it under
//!    `spawn_blocking` because the parser is CPU-bound and not async-safe
//! 3. [`summarize`] — the only stage with network I/O; one request per
//!    summary, no retry, no caching

pub mod extract;
pub mod payload;
pub mod summarize;
