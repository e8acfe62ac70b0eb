//! Transport abstraction.
//!
//! The facade never talks to the network itself; it hands a wire-ready
//! request to an injectable transport and gets back either a succeeded or a
//! failed outcome. This seam also lets tests return synthetic responses
//! without a server.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::request::{Method, Payload, ProgressFn};
use crate::response::NativeHandle;

/// One wire-ready request handed to the transport. The shape flags mirror
/// the request options verbatim; a transport honors them as its stack
/// requires (the bundled reqwest transport maps `cache=false` to a
/// `Cache-Control: no-cache` header and lets multipart own its content
/// type).
#[derive(Clone)]
pub struct TransportRequest {
    pub request_id: String,
    pub method: Method,
    pub url: reqwest::Url,
    pub body: Payload,
    pub cache: Option<bool>,
    pub process_data: Option<bool>,
    pub content_type: Option<bool>,
    /// Upload-progress callback to wire into request construction.
    pub progress: Option<ProgressFn>,
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("body", &self.body)
            .field("cache", &self.cache)
            .field("process_data", &self.process_data)
            .field("content_type", &self.content_type)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// A succeeded outcome: the parsed payload, the transport's status text and
/// the native handle.
#[derive(Debug, Clone)]
pub struct TransportSuccess {
    pub body: Value,
    pub status_text: String,
    pub handle: Arc<NativeHandle>,
}

/// A failed outcome: only the native handle, which exposes a parsed-JSON
/// body or raw text plus status code and text.
#[derive(Debug, Clone)]
pub struct TransportFailure {
    pub handle: Arc<NativeHandle>,
}

impl TransportFailure {
    /// A failure observed before any HTTP status existed (connect error,
    /// body encode error). Reported with status `0`, the native XHR
    /// convention.
    pub fn without_status(message: impl Into<String>) -> Self {
        Self {
            handle: Arc::new(NativeHandle {
                status: 0,
                status_text: String::new(),
                headers: reqwest::header::HeaderMap::new(),
                response_text: message.into(),
                response_json: None,
            }),
        }
    }
}

/// Issues the network call for one request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: TransportRequest)
    -> Result<TransportSuccess, TransportFailure>;
}
