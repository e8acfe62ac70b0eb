//! Request description and normalization.
//!
//! A [`RequestOptions`] value is built fresh per call, mutated only by the
//! normalization pipeline, and discarded after dispatch.

pub mod normalize;
pub mod payload;

pub use normalize::normalize;
pub use payload::{FormData, FormElement, FormValue, Payload};

use std::fmt;
use std::sync::Arc;

/// Upload-progress callback, invoked with a fractional completion value in
/// `0.0..=1.0`.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// The five supported verbs. Parsing is case-insensitive; rendering is
/// always upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether this verb carries a request payload (POST/PUT/PATCH). Only
    /// payload-bearing verbs go through the compatibility rewrites.
    pub fn has_payload(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request target: a raw address string or an already-structured URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Raw(String),
    Url(reqwest::Url),
}

impl Target {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Raw(raw) => raw,
            Self::Url(url) => url.as_str(),
        }
    }

    /// Resolves the target into a dispatchable URL.
    pub fn into_url(self) -> Result<reqwest::Url, crate::error::HttpError> {
        match self {
            Self::Url(url) => Ok(url),
            Self::Raw(raw) => raw
                .parse()
                .map_err(|err| crate::error::HttpError::InvalidUrl(format!("{raw}: {err}"))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Target {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for Target {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<reqwest::Url> for Target {
    fn from(url: reqwest::Url) -> Self {
        Self::Url(url)
    }
}

/// The canonical, mutable description of one outgoing call.
///
/// `cache`, `process_data` and `content_type` are transport-level override
/// flags set only as a side effect of data-shape detection; callers never
/// set them directly.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub url: Option<Target>,
    pub data: Payload,
    pub cache: Option<bool>,
    pub process_data: Option<bool>,
    pub content_type: Option<bool>,
    /// Upload-progress callback; only fires for form-data payloads.
    pub progress: Option<ProgressFn>,
    /// Per-call override for the uploadable-PUT rewrite; falls back to
    /// [`crate::config::HttpConfig::uploadable_put`] when unset.
    pub uploadable_put: Option<bool>,
    pub(crate) request_id: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<Payload>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_progress(mut self, progress: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn with_uploadable_put(mut self, enabled: bool) -> Self {
        self.uploadable_put = Some(enabled);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("data", &self.data)
            .field("cache", &self.cache)
            .field("process_data", &self.process_data)
            .field("content_type", &self.content_type)
            .field("progress", &self.progress.is_some())
            .field("uploadable_put", &self.uploadable_put)
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// Generates a per-call request id for log correlation.
pub(crate) fn generate_request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
