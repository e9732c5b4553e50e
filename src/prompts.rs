//! Prompts for the summarisation call.
//!
//! Centralising the prompt text here keeps the wire code in
//! [`crate::pipeline::summarize`] free of copy, and lets unit tests inspect
//! exactly what would be sent without a live API.

/// System instruction sent with every summarisation request.
pub const SYSTEM_PROMPT: &str = "You are a precise summarization assistant. \
Summarize the user's document in a few short sentences. Keep the substantive \
points and concrete facts; drop boilerplate. Do not add commentary or \
information that is not in the document.";

/// Assemble the user message from the document text and optional context.
///
/// When context is supplied and non-empty it is prepended, separated from the
/// text by a blank line; otherwise the text is sent as-is.
pub fn effective_prompt(text: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!("{ctx}\n\n{text}"),
        _ => text.to_string(),
    }
}
