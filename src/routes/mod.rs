//! HTTP request handlers.
//!
//! One module per concern: [`health`] for the probes, [`convert`] for the two
//! document-to-text routes, [`summarize`] for plain-text summarisation.
//! Request and response types live beside the handlers that use them.

pub mod convert;
pub mod health;
pub mod summarize;
