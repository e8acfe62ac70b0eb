//! Response unification.
//!
//! Success and failure outcomes from the transport funnel through one
//! shaping function, so callers cannot distinguish the two by response
//! shape, only by which side of the `Result` they observe.

use std::ops::Index;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::transport::{TransportFailure, TransportSuccess};

/// Opaque reference to the transport's native result, kept for advanced
/// inspection. For failures the body is exposed either as parsed JSON or as
/// raw text, whichever the transport could produce.
#[derive(Debug, Clone)]
pub struct NativeHandle {
    /// Transport-reported status code; `0` when no HTTP status was observed
    /// (network-level failure).
    pub status: u16,
    pub status_text: String,
    pub headers: reqwest::header::HeaderMap,
    pub response_text: String,
    pub response_json: Option<Value>,
}

impl NativeHandle {
    /// The body a failure path reports: parsed JSON when available,
    /// otherwise the raw text.
    pub fn error_body(&self) -> Value {
        self.response_json
            .clone()
            .unwrap_or_else(|| Value::String(self.response_text.clone()))
    }
}

/// The single response shape returned to callers regardless of outcome.
///
/// When the body is a plain object its fields are merged into the top-level
/// view, shadowing the synthetic `status_code`/`status_text`/`body`/
/// `original_response` entries on key collision. The merged view is
/// reachable through [`UnifiedResponse::get`] and `response["key"]`.
#[derive(Debug, Clone)]
pub struct UnifiedResponse {
    pub handle: Arc<NativeHandle>,
    pub body: Value,
    pub status_code: u16,
    pub status_text: String,
    /// The untouched payload before any merging. Currently identical to
    /// `body`; kept as a separate field on purpose.
    pub original_response: Value,
    fields: Map<String, Value>,
}

impl UnifiedResponse {
    fn from_parts(body: Value, handle: Arc<NativeHandle>) -> Self {
        let mut fields = Map::new();
        fields.insert("status_code".to_string(), Value::from(handle.status));
        fields.insert(
            "status_text".to_string(),
            Value::String(handle.status_text.clone()),
        );
        fields.insert("body".to_string(), body.clone());
        fields.insert("original_response".to_string(), body.clone());
        if let Value::Object(map) = &body {
            for (key, value) in map {
                fields.insert(key.clone(), value.clone());
            }
        }

        Self {
            status_code: handle.status,
            status_text: handle.status_text.clone(),
            original_response: body.clone(),
            body,
            handle,
            fields,
        }
    }

    /// Looks a key up in the merged top-level view.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Serializes as the merged top-level view.
impl serde::Serialize for UnifiedResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.fields.serialize(serializer)
    }
}

impl Index<&str> for UnifiedResponse {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.fields[key]
    }
}

/// Shapes a transport outcome into one unified response. Both branches go
/// through [`UnifiedResponse::from_parts`]; the returned flag records
/// whether the call should resolve (`true`) or reject (`false`).
pub(crate) fn shape_outcome(
    outcome: Result<TransportSuccess, TransportFailure>,
) -> (UnifiedResponse, bool) {
    match outcome {
        Ok(success) => (
            UnifiedResponse::from_parts(success.body, success.handle),
            true,
        ),
        Err(failure) => {
            let body = failure.handle.error_body();
            (UnifiedResponse::from_parts(body, failure.handle), false)
        }
    }
}
