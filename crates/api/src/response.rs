//! Shared response body types for API handlers.
//!
//! Issues and list pages are returned bare (see `issuetrack_core::issue`);
//! this module holds the small envelopes that have no domain type.

use serde::Serialize;

/// `{ "message": ... }` body for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
