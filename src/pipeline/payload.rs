//! Payload normalisation: many client encodings, one canonical buffer.
//!
//! Clients reach this service from three very different places: browser code
//! sends array-buffer-like objects or uploads, JSON callers can only express
//! strings and numeric arrays, and some callers just post plain text. The
//! resolution cascade in [`normalize`] accepts all of them without requiring
//! the caller to declare an encoding, with an ordered, documented fallback
//! chain instead of ad hoc type checks.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::error::RelayError;

/// Leading bytes every PDF file starts with.
const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A request payload as it arrives, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Already-binary input: an uploaded file or a byte-like blob.
    Bytes(Vec<u8>),
    /// A JSON array of numbers, one prospective byte per element.
    Numbers(Vec<i64>),
    /// A string: base64-encoded PDF, a serialised numeric array, or plain
    /// text. [`normalize`] decides which.
    Text(String),
}

/// The outcome of normalisation: ready for extraction, or already text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedPayload {
    /// Canonical byte buffer, to be handed to the text extractor.
    Buffer(Vec<u8>),
    /// The input was already decoded text; extraction is bypassed.
    Text(String),
}

impl RawPayload {
    /// Decode a JSON body field into a raw payload.
    ///
    /// Accepts the JSON-safe shapes a field may carry: a string or an array
    /// of integers. Any other shape (object, bool, bare number, null) fails
    /// with [`RelayError::UnsupportedInput`].
    pub fn from_value(value: &Value) -> Result<Self, RelayError> {
        match value {
            Value::String(text) => Ok(RawPayload::Text(text.clone())),
            Value::Array(items) => {
                let mut numbers = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let number = item.as_i64().ok_or_else(|| {
                        RelayError::UnsupportedInput(format!(
                            "array element at index {index} is not an integer"
                        ))
                    })?;
                    numbers.push(number);
                }
                Ok(RawPayload::Numbers(numbers))
            }
            other => Err(RelayError::UnsupportedInput(format!(
                "expected a string, numeric array, or byte buffer, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Resolve a raw payload to a canonical buffer or plain text.
///
/// Resolution rules, in priority order:
/// 1. Bytes pass through unchanged. An empty buffer is valid.
/// 2. A numeric array becomes one byte per element; every element must be in
///    0..=255, otherwise the payload is rejected.
/// 3. A string is tried as base64 (accepted as a buffer only when the
///    decoded bytes start with `%PDF`), then as a serialised numeric array,
///    and finally kept as plain text. Strings never hard-fail: a decode or
///    range failure falls through to the next rule.
pub fn normalize(payload: RawPayload) -> Result<NormalizedPayload, RelayError> {
    match payload {
        RawPayload::Bytes(bytes) => Ok(NormalizedPayload::Buffer(bytes)),
        RawPayload::Numbers(numbers) => bytes_from_numbers(&numbers).map(NormalizedPayload::Buffer),
        RawPayload::Text(text) => Ok(normalize_text(text)),
    }
}

/// Apply the string branch of the cascade. Infallible: the worst case is
/// "this is plain text".
fn normalize_text(text: String) -> NormalizedPayload {
    // A valid base64 decode alone is not enough; lots of plain text is
    // accidentally valid base64. Only the PDF magic number commits us to
    // treating the decode as binary.
    if let Ok(decoded) = STANDARD.decode(text.as_bytes()) {
        if decoded.starts_with(PDF_MAGIC) {
            return NormalizedPayload::Buffer(decoded);
        }
    }

    if let Ok(numbers) = serde_json::from_str::<Vec<i64>>(&text) {
        if let Ok(bytes) = bytes_from_numbers(&numbers) {
            return NormalizedPayload::Buffer(bytes);
        }
    }

    NormalizedPayload::Text(text)
}

/// Convert a numeric array to bytes, rejecting anything outside 0..=255.
fn bytes_from_numbers(numbers: &[i64]) -> Result<Vec<u8>, RelayError> {
    numbers
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u8::try_from(value).map_err(|_| {
                RelayError::UnsupportedInput(format!(
                    "array element {value} at index {index} is outside the byte range 0-255"
                ))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a bare number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
