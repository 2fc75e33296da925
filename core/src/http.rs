//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; the host that owns the event loop (web shell, mobile
//! shell, test harness) implements [`Transport`] and performs the actual
//! round trip. This separation keeps the core deterministic and easy to test,
//! and maps cleanly to the C FFI boundary used by the mobile client.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross FFI
//! boundaries without lifetime concerns.

use crate::error::TransportError;

/// HTTP method for a request. The dashboard API uses partial updates, so
/// writes go out as PATCH rather than PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by [`Gateway::build`](crate::Gateway::build). The transport is
/// responsible for executing this request against the network and returning
/// the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to [`Gateway::parse`](crate::Gateway::parse) for envelope shaping.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes a built [`HttpRequest`] and returns the raw [`HttpResponse`].
///
/// Implementations own connection reuse and any timeout policy; the gateway
/// specifies neither and cannot abort an in-flight request. A failed round
/// trip is the only condition that reaches gateway callers as an error;
/// bad statuses and unparsable bodies are folded into the result envelope.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
