//! Reqwest-based transport layer shared by the Jenkins client and the webhook notifier.
//!
//! Requests reach the transport fully resolved: absolute URL, final headers and body.
//! Status codes are returned as-is; callers decide what counts as a failure.

pub mod async_transport;
pub mod request;

use http::{HeaderMap, HeaderValue, Method, StatusCode};
use std::time::Duration;
use url::Url;

pub use async_transport::{AsyncTransport, DynAsyncTransport, ReqwestAsync};

#[derive(Clone, Debug)]
pub struct TransportBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<HeaderValue>,
}

#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<TransportBody>,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}
