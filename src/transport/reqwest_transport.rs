//! The bundled `reqwest`-backed transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::request::payload::{FormData, FormValue};
use crate::request::{Method, Payload, ProgressFn};
use crate::response::NativeHandle;

use super::{Transport, TransportFailure, TransportRequest, TransportSuccess};

/// Default transport: plain mappings go out as JSON bodies (or query pairs
/// for verbs without a payload), form-data containers as multipart bodies.
/// Non-2xx statuses come back as failed outcomes with the body parsed as
/// JSON when possible.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (proxies, timeouts, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(
        &self,
        request: TransportRequest,
    ) -> Result<TransportSuccess, TransportFailure> {
        let mut url = request.url.clone();

        // payloads on GET/DELETE travel in the query string
        if !request.method.has_payload() {
            if let Payload::Fields(map) = &request.body {
                if !map.is_empty() {
                    let mut pairs = url.query_pairs_mut();
                    for (key, value) in map {
                        match value {
                            Value::String(text) => pairs.append_pair(key, text),
                            other => pairs.append_pair(key, &other.to_string()),
                        };
                    }
                }
            }
        }

        let mut rb = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };

        if request.cache == Some(false) {
            rb = rb.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }

        rb = match &request.body {
            Payload::Empty => rb,
            Payload::Fields(map) if request.method.has_payload() => {
                rb.json(&Value::Object(map.clone()))
            }
            Payload::Fields(_) => rb,
            Payload::Raw(value) => rb.json(value),
            Payload::Element(element) => {
                let form = FormData::from_element(element);
                rb.multipart(build_multipart(&form, request.progress.as_ref())?)
            }
            Payload::ElementSet(elements) => {
                let mut form = FormData::new();
                for element in elements {
                    for (name, value) in element.fields() {
                        form.append(name.clone(), value.clone());
                    }
                }
                rb.multipart(build_multipart(&form, request.progress.as_ref())?)
            }
            Payload::FormData(form) => {
                rb.multipart(build_multipart(form, request.progress.as_ref())?)
            }
        };

        tracing::trace!(
            target: "unihttp",
            request_id = %request.request_id,
            method = %request.method,
            "dispatching over reqwest"
        );

        let response = match rb.send().await {
            Ok(response) => response,
            Err(err) => return Err(TransportFailure::without_status(err.to_string())),
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response.headers().clone();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => return Err(TransportFailure::without_status(err.to_string())),
        };
        let json = serde_json::from_str::<Value>(&text).ok();

        let handle = Arc::new(NativeHandle {
            status: status.as_u16(),
            status_text,
            headers,
            response_text: text,
            response_json: json,
        });

        if status.is_success() {
            let body = handle
                .response_json
                .clone()
                .unwrap_or_else(|| Value::String(handle.response_text.clone()));
            Ok(TransportSuccess {
                body,
                status_text: handle.status_text.clone(),
                handle,
            })
        } else {
            Err(TransportFailure { handle })
        }
    }
}

/// Assembles the multipart body. With a progress callback, every part
/// streams through a shared byte counter so the callback sees `loaded /
/// total` as chunks are pulled onto the wire.
fn build_multipart(
    form: &FormData,
    progress: Option<&ProgressFn>,
) -> Result<reqwest::multipart::Form, TransportFailure> {
    let mut multipart = reqwest::multipart::Form::new();

    let Some(progress) = progress else {
        for (name, value) in form.entries() {
            multipart = match value {
                FormValue::Text(text) => multipart.text(name.clone(), text.clone()),
                FormValue::File {
                    filename,
                    mime,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.clone())
                        .file_name(filename.clone());
                    multipart.part(name.clone(), set_mime(part, filename, mime.as_deref())?)
                }
            };
        }
        return Ok(multipart);
    };

    let total: u64 = form.entries().iter().map(|(_, value)| value.len() as u64).sum();
    let loaded = Arc::new(AtomicU64::new(0));

    for (name, value) in form.entries() {
        let part = match value {
            FormValue::Text(text) => {
                let body = counting_body(
                    text.clone().into_bytes(),
                    loaded.clone(),
                    total,
                    progress.clone(),
                );
                reqwest::multipart::Part::stream_with_length(body, text.len() as u64)
            }
            FormValue::File {
                filename,
                mime,
                bytes,
            } => {
                let body = counting_body(bytes.clone(), loaded.clone(), total, progress.clone());
                let part = reqwest::multipart::Part::stream_with_length(body, bytes.len() as u64)
                    .file_name(filename.clone());
                set_mime(part, filename, mime.as_deref())?
            }
        };
        multipart = multipart.part(name.clone(), part);
    }

    Ok(multipart)
}

fn set_mime(
    part: reqwest::multipart::Part,
    filename: &str,
    mime: Option<&str>,
) -> Result<reqwest::multipart::Part, TransportFailure> {
    let mime = match mime {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };
    part.mime_str(&mime)
        .map_err(|err| TransportFailure::without_status(format!("invalid mime type {mime}: {err}")))
}

/// Wraps bytes in a chunked stream that reports fractional completion as the
/// chunks are consumed.
fn counting_body(
    bytes: Vec<u8>,
    loaded: Arc<AtomicU64>,
    total: u64,
    progress: ProgressFn,
) -> reqwest::Body {
    const CHUNK: usize = 16 * 1024;
    let chunks: Vec<Bytes> = bytes.chunks(CHUNK).map(Bytes::copy_from_slice).collect();
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        let done = loaded.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        if total > 0 {
            progress(done as f64 / total as f64);
        }
        Ok::<Bytes, std::convert::Infallible>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}
