//! Text extraction boundary: PDF bytes in, text out.
//!
//! The actual parsing is delegated wholesale to the `pdf-extract` crate; this
//! module only pins down the calling contract. The trait exists so handlers
//! can be tested against a stub that maps a known buffer to deterministic
//! text without parsing anything.

use tracing::debug;

use crate::error::RelayError;

/// Extracts text from a canonical byte buffer.
///
/// Implementations are synchronous and CPU-bound; callers on the async path
/// run them under `tokio::task::spawn_blocking`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, buffer: &[u8]) -> Result<String, RelayError>;
}

/// Production extractor backed by `pdf_extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, buffer: &[u8]) -> Result<String, RelayError> {
        // An empty buffer is a valid (if useless) document: empty text, not
        // a parse error.
        if buffer.is_empty() {
            return Ok(String::new());
        }

        let text = pdf_extract::extract_text_from_mem(buffer)
            .map_err(|e| RelayError::Extraction(e.to_string()))?;
        debug!(bytes = buffer.len(), chars = text.len(), "extracted text");
        Ok(text)
    }
}
