//! Error types for unihttp.

use thiserror::Error;

use crate::response::UnifiedResponse;

/// Errors surfaced by the facade.
///
/// Transport-reported failures are never thrown mid-pipeline; they arrive as
/// [`HttpError::Rejected`] carrying the same [`UnifiedResponse`] shape a
/// successful call would produce. Callers distinguish success from failure
/// only by which side of the `Result` they observe.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The transport reported a failed outcome (non-2xx status, network
    /// error, unreadable body). The response inside has already been shaped
    /// by the same unifier as the success path; a network-level failure with
    /// no observed HTTP status carries status code `0`.
    #[error("http request rejected: {} {}", .0.status_code, .0.status_text)]
    Rejected(Box<UnifiedResponse>),

    /// The request target was missing or could not be parsed into a URL.
    #[error("invalid request target: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// The unified response carried by a rejected outcome, if any.
    pub fn response(&self) -> Option<&UnifiedResponse> {
        match self {
            Self::Rejected(response) => Some(response),
            _ => None,
        }
    }
}

/// Result alias for facade calls: one response shape either way.
pub type HttpResult = Result<UnifiedResponse, HttpError>;
