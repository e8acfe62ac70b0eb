//! unihttp
//!
//! A thin, unified HTTP request facade: verb shorthands (`get`, `post`,
//! `put`, `patch`, `delete`) over a pluggable transport, with
//! transport-compatibility rewrites (form-data detection, uploadable-PUT
//! method override, upload-progress wiring) and one response shape for both
//! successful and failed outcomes. Hook points fire before send and after
//! completion and may veto the call.
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Http;
pub use config::HttpConfig;
pub use error::{HttpError, HttpResult};
pub use hooks::{HookDecision, HttpHook, LoggingHook};
pub use request::{
    FormData, FormElement, FormValue, Method, Payload, RequestOptions, Target,
    normalize::METHOD_MARKER,
};
pub use response::{NativeHandle, UnifiedResponse};
pub use transport::{
    ReqwestTransport, Transport, TransportFailure, TransportRequest, TransportSuccess,
};
