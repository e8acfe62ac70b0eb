//! The facade itself: verb shorthands over the send pipeline.

use std::sync::Arc;

use crate::config::HttpConfig;
use crate::error::{HttpError, HttpResult};
use crate::hooks::{HttpHook, allow_done, allow_sending};
use crate::request::payload::Payload;
use crate::request::{Method, RequestOptions, Target, generate_request_id, normalize};
use crate::response::shape_outcome;
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// Unified HTTP facade.
///
/// Every call funnels into [`Http::send`]: normalize the options, fire the
/// `http.sending` hooks, dispatch through the transport, shape the outcome,
/// fire the `http.done` hooks, settle. A hook veto abandons the call and the
/// returned future never completes; callers without their own timeout will
/// wait forever. Some integrations lean on the hang as a de facto
/// cancellation mechanism, so it stays.
pub struct Http {
    config: HttpConfig,
    transport: Arc<dyn Transport>,
    hooks: Vec<Arc<dyn HttpHook>>,
}

impl Default for Http {
    fn default() -> Self {
        Self::new()
    }
}

impl Http {
    /// A facade over the bundled reqwest transport.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: HttpConfig::default(),
            transport,
            hooks: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a hook; hooks run in registration order.
    pub fn with_hook(mut self, hook: Arc<dyn HttpHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Sends a GET request.
    pub async fn get(&self, target: impl Into<Target>) -> HttpResult {
        self.get_with(target, RequestOptions::new()).await
    }

    /// Sends a GET request with per-call options.
    pub async fn get_with(&self, target: impl Into<Target>, options: RequestOptions) -> HttpResult {
        self.run(Method::Get, target.into(), options).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, target: impl Into<Target>) -> HttpResult {
        self.run(Method::Delete, target.into(), RequestOptions::new())
            .await
    }

    /// Sends a POST request.
    pub async fn post(&self, target: impl Into<Target>, data: impl Into<Payload>) -> HttpResult {
        self.post_with(target, data, RequestOptions::new()).await
    }

    /// Sends a POST request with per-call options.
    pub async fn post_with(
        &self,
        target: impl Into<Target>,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> HttpResult {
        self.run_with_data(Method::Post, target.into(), data.into(), options)
            .await
    }

    /// Sends a PUT request. Rewritten to an uploadable POST unless disabled
    /// per call or via [`HttpConfig::uploadable_put`].
    pub async fn put(&self, target: impl Into<Target>, data: impl Into<Payload>) -> HttpResult {
        self.put_with(target, data, RequestOptions::new()).await
    }

    /// Sends a PUT request with per-call options.
    pub async fn put_with(
        &self,
        target: impl Into<Target>,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> HttpResult {
        self.run_with_data(Method::Put, target.into(), data.into(), options)
            .await
    }

    /// Sends a PATCH request.
    pub async fn patch(&self, target: impl Into<Target>, data: impl Into<Payload>) -> HttpResult {
        self.patch_with(target, data, RequestOptions::new()).await
    }

    /// Sends a PATCH request with per-call options.
    pub async fn patch_with(
        &self,
        target: impl Into<Target>,
        data: impl Into<Payload>,
        options: RequestOptions,
    ) -> HttpResult {
        self.run_with_data(Method::Patch, target.into(), data.into(), options)
            .await
    }

    async fn run(&self, method: Method, target: Target, mut options: RequestOptions) -> HttpResult {
        options.method = Some(method);
        options.url = Some(target);
        self.send(options).await
    }

    async fn run_with_data(
        &self,
        method: Method,
        target: Target,
        data: Payload,
        mut options: RequestOptions,
    ) -> HttpResult {
        // an absent payload still becomes an empty mapping before
        // normalization, so the PUT marker always has a container
        options.data = match data {
            Payload::Empty => Payload::Fields(serde_json::Map::new()),
            payload => payload,
        };
        self.run(method, target, options).await
    }

    /// Low-level entry all verb calls funnel into.
    pub async fn send(&self, mut options: RequestOptions) -> HttpResult {
        normalize(&mut options, &self.config);
        if options.request_id.is_none() {
            options.request_id = Some(generate_request_id());
        }

        let url = options
            .url
            .clone()
            .ok_or_else(|| HttpError::InvalidUrl("request has no target".to_string()))?;

        if !allow_sending(&self.hooks, &url, &options) {
            tracing::debug!(target: "unihttp", url = %url, "send vetoed by hook, call abandoned");
            return std::future::pending().await;
        }

        let request = TransportRequest {
            request_id: options.request_id.clone().unwrap_or_default(),
            method: options.method.unwrap_or(Method::Get),
            url: url.into_url()?,
            body: options.data.clone(),
            cache: options.cache,
            process_data: options.process_data,
            content_type: options.content_type,
            progress: options.progress.clone(),
        };

        tracing::debug!(
            target: "unihttp",
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            "dispatching request"
        );

        let outcome = self.transport.dispatch(request).await;
        let (response, resolved) = shape_outcome(outcome);

        tracing::debug!(
            target: "unihttp",
            status = response.status_code,
            resolved,
            "request completed"
        );

        if !allow_done(&self.hooks, &response, &options) {
            tracing::debug!(target: "unihttp", "completion vetoed by hook, result abandoned");
            return std::future::pending().await;
        }

        if resolved {
            Ok(response)
        } else {
            Err(HttpError::Rejected(Box::new(response)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::NativeHandle;
    use crate::transport::{TransportFailure, TransportSuccess};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Transport double that records the request it saw and replays a canned
    /// outcome.
    struct FakeTransport {
        seen: Mutex<Vec<TransportRequest>>,
        status: u16,
        body: Value,
    }

    impl FakeTransport {
        fn new(status: u16, body: Value) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                status,
                body,
            })
        }

        fn last_request(&self) -> TransportRequest {
            self.seen.lock().unwrap().last().cloned().expect("no request dispatched")
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn dispatch(
            &self,
            request: TransportRequest,
        ) -> Result<TransportSuccess, TransportFailure> {
            self.seen.lock().unwrap().push(request);
            let handle = Arc::new(NativeHandle {
                status: self.status,
                status_text: String::new(),
                headers: reqwest::header::HeaderMap::new(),
                response_text: self.body.to_string(),
                response_json: Some(self.body.clone()),
            });
            if (200..300).contains(&self.status) {
                Ok(TransportSuccess {
                    body: self.body.clone(),
                    status_text: String::new(),
                    handle,
                })
            } else {
                Err(TransportFailure { handle })
            }
        }
    }

    #[tokio::test]
    async fn put_reaches_transport_as_post_with_marker() {
        let transport = FakeTransport::new(200, json!({}));
        let http = Http::with_transport(transport.clone());

        http.put("http://example.invalid/items/1", json!({"name": "x"}))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        match request.body {
            Payload::Fields(map) => assert_eq!(map["_method"], json!("PUT")),
            other => panic!("expected fields, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn put_stays_put_when_config_disables_rewrite() {
        let transport = FakeTransport::new(200, json!({}));
        let http = Http::with_transport(transport.clone())
            .with_config(HttpConfig::new().with_uploadable_put(false));

        http.put("http://example.invalid/items/1", json!({"name": "x"}))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Put);
        match request.body {
            Payload::Fields(map) => assert!(!map.contains_key("_method")),
            other => panic!("expected fields, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_leaves_shape_flags_unset() {
        let transport = FakeTransport::new(200, json!({}));
        let http = Http::with_transport(transport.clone());

        http.get("http://example.invalid/x").await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.cache, None);
        assert_eq!(request.process_data, None);
        assert_eq!(request.content_type, None);
    }

    #[tokio::test]
    async fn failure_rejects_with_unified_shape() {
        let transport = FakeTransport::new(400, json!({"error": "bad"}));
        let http = Http::with_transport(transport);

        let err = http
            .post("http://example.invalid/x", json!({}))
            .await
            .unwrap_err();

        let response = err.response().expect("rejection carries a response");
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, json!({"error": "bad"}));
        assert_eq!(response["error"], json!("bad"));
    }

    #[tokio::test]
    async fn missing_url_is_an_invalid_target() {
        let transport = FakeTransport::new(200, json!({}));
        let http = Http::with_transport(transport);

        let err = http.send(RequestOptions::new()).await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }
}
