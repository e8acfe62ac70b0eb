//! Hook points around the send pipeline.
//!
//! Hooks fire at two named points: before dispatch (`http.sending`, with the
//! target and the full request options) and after completion (`http.done`,
//! with the unified response and the original options). A hook may veto;
//! the dispatcher short-circuits on the first veto and the call is silently
//! abandoned, leaving its future pending forever.

use std::sync::Arc;

use crate::request::{RequestOptions, Target};
use crate::response::UnifiedResponse;

/// What one hook handler wants done with the current call. `Proceed` and
/// `NoOpinion` both let the pipeline continue; only `Veto` stops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookDecision {
    Proceed,
    Veto,
    #[default]
    NoOpinion,
}

/// Observer/veto seam around the send pipeline. Implementations should stay
/// cheap; they run inline on every call.
pub trait HttpHook: Send + Sync {
    /// The `http.sending` hook point, fired before the transport is invoked.
    fn on_sending(&self, _url: &Target, _options: &RequestOptions) -> HookDecision {
        HookDecision::NoOpinion
    }

    /// The `http.done` hook point, fired after the outcome has been shaped
    /// but before the future settles. Fires on both success and failure.
    fn on_done(&self, _response: &UnifiedResponse, _options: &RequestOptions) -> HookDecision {
        HookDecision::NoOpinion
    }
}

/// Runs the `http.sending` hooks in registration order; `false` means a hook
/// vetoed the call.
pub(crate) fn allow_sending(
    hooks: &[Arc<dyn HttpHook>],
    url: &Target,
    options: &RequestOptions,
) -> bool {
    hooks
        .iter()
        .all(|hook| hook.on_sending(url, options) != HookDecision::Veto)
}

/// Runs the `http.done` hooks in registration order; `false` means a hook
/// vetoed delivery of the result.
pub(crate) fn allow_done(
    hooks: &[Arc<dyn HttpHook>],
    response: &UnifiedResponse,
    options: &RequestOptions,
) -> bool {
    hooks
        .iter()
        .all(|hook| hook.on_done(response, options) != HookDecision::Veto)
}

/// A simple logging hook backed by `tracing` (no payload contents).
#[derive(Clone, Default)]
pub struct LoggingHook;

impl HttpHook for LoggingHook {
    fn on_sending(&self, url: &Target, options: &RequestOptions) -> HookDecision {
        tracing::debug!(target: "unihttp", url = %url, method = ?options.method, "sending request");
        HookDecision::NoOpinion
    }

    fn on_done(&self, response: &UnifiedResponse, _options: &RequestOptions) -> HookDecision {
        tracing::debug!(target: "unihttp", status = response.status_code, "request finished");
        HookDecision::NoOpinion
    }
}
