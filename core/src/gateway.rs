//! Request construction and response shaping for the dashboard API.
//!
//! # Design
//! `Gateway` holds the base URL and the injected auth token and carries no
//! other state between calls. `build` produces an `HttpRequest`, `parse`
//! consumes an `HttpResponse`, and `send` glues the two around a
//! caller-supplied [`Transport`]. Expected failures (a bad status, a body
//! that does not parse) come back as envelopes with `ok: false`; only
//! transport trouble uses the error channel. Retries, if any, are a caller
//! concern.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::body;
use crate::envelope::{Envelope, ListEnvelope};
use crate::error::GatewayError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::page::PaginatedPage;
use crate::query::sanitize_params;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "LIFEBOARD_BASE_URL";

/// Keeps the dev tunnel from answering with its browser interstitial.
const TUNNEL_BYPASS_HEADER: (&str, &str) = ("ngrok-skip-browser-warning", "any");
/// Marks requests as coming from the companion client rather than a browser.
const MOBILE_ORIGIN_HEADER: (&str, &str) = ("X-From-Mobile", "true");

/// Path segment addressing a single item. Dashboard ids are integers, but a
/// few key-value endpoints (settings) address records by string slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemId {
    Num(i64),
    Slug(String),
}

impl ItemId {
    /// Numeric when the text parses as an integer, slug otherwise.
    pub fn parse(text: &str) -> Self {
        text.parse()
            .map_or_else(|_| ItemId::Slug(text.to_string()), ItemId::Num)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Num(n) => write!(f, "{n}"),
            ItemId::Slug(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Num(n)
    }
}

/// Stateless request builder and response parser for the dashboard API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network; [`Gateway::send`] runs both around any
/// [`Transport`].
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    token: Option<String>,
}

impl Gateway {
    /// The token is injected here instead of read from ambient storage so
    /// tests can run with fakes. `None` still builds requests without an
    /// `Authorization` header; rejecting those is the server's job.
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Gateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    /// Base URL from `LIFEBOARD_BASE_URL`, empty when unset.
    pub fn from_env(token: Option<&str>) -> Self {
        let base = std::env::var(BASE_URL_ENV).unwrap_or_default();
        Gateway::new(&base, token)
    }

    /// Build the request for one call.
    ///
    /// URL shape: `base/endpoint` + optional `item_id/` (the trailing slash
    /// is load-bearing for the server's path routing) + optional `?query`
    /// with blank parameter values dropped. Body encoding is negotiated by
    /// [`body::encode`].
    pub fn build(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Map<String, Value>>,
        item_id: Option<&ItemId>,
        params: Option<&str>,
    ) -> Result<HttpRequest, GatewayError> {
        let mut url = format!("{}/{endpoint}", self.base_url);
        if let Some(id) = item_id {
            url.push_str(&format!("{id}/"));
        }
        if let Some(raw) = params {
            url.push('?');
            url.push_str(&sanitize_params(raw));
        }

        let mut headers = vec![
            (
                TUNNEL_BYPASS_HEADER.0.to_string(),
                TUNNEL_BYPASS_HEADER.1.to_string(),
            ),
            (
                MOBILE_ORIGIN_HEADER.0.to_string(),
                MOBILE_ORIGIN_HEADER.1.to_string(),
            ),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Token {token}")));
        }

        let body = match body {
            Some(map) => {
                let encoded = body::encode(map)?;
                headers.push(("Content-Type".to_string(), encoded.content_type()));
                Some(encoded.into_payload())
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Shape a raw response into the uniform envelope.
    ///
    /// Never panics or errors for expected failure modes:
    /// - non-2xx: the body is parsed as JSON and returned verbatim in
    ///   `details` (raw string fallback when it is not JSON);
    /// - DELETE: the body is never read, success carries `data: None`;
    /// - 2xx body that does not parse: logged and folded into the fixed
    ///   `"Parsing Error"` envelope.
    pub fn parse<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        response: &HttpResponse,
    ) -> Envelope<T> {
        if !(200..300).contains(&response.status) {
            let details = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()));
            return Envelope::failure(details);
        }

        if method == HttpMethod::Delete {
            return Envelope::success_empty();
        }

        match serde_json::from_str(&response.body) {
            Ok(data) => Envelope::success(data),
            Err(err) => {
                tracing::error!(status = response.status, %err, "Parsing Error");
                Envelope::parse_failure()
            }
        }
    }

    /// Build, execute, parse. Only transport failures surface as `Err`.
    pub fn send<T: DeserializeOwned>(
        &self,
        transport: &impl Transport,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Map<String, Value>>,
        item_id: Option<&ItemId>,
        params: Option<&str>,
    ) -> Result<Envelope<T>, GatewayError> {
        let request = self.build(endpoint, method, body, item_id, params)?;
        let response = transport.execute(&request)?;
        Ok(self.parse(method, &response))
    }

    /// GET a collection page and split the results from the pagination
    /// metadata that the resolver needs.
    pub fn fetch_items<T: DeserializeOwned>(
        &self,
        transport: &impl Transport,
        endpoint: &str,
        params: Option<&str>,
    ) -> Result<ListEnvelope<T>, GatewayError> {
        let result: Envelope<PaginatedPage<T>> =
            self.send(transport, endpoint, HttpMethod::Get, None, None, params)?;

        let Envelope { details, ok, data } = result;
        match data {
            Some(page) if ok => {
                let (results, page_details) = page.split();
                Ok(ListEnvelope {
                    details: Value::String(String::new()),
                    ok: true,
                    data: Some(results),
                    page: Some(page_details),
                })
            }
            _ => Ok(ListEnvelope {
                details,
                ok: false,
                data: None,
                page: None,
            }),
        }
    }

    pub fn post_item<T: DeserializeOwned>(
        &self,
        transport: &impl Transport,
        endpoint: &str,
        body: &Map<String, Value>,
    ) -> Result<Envelope<T>, GatewayError> {
        self.send(transport, endpoint, HttpMethod::Post, Some(body), None, None)
    }

    pub fn update_item<T: DeserializeOwned>(
        &self,
        transport: &impl Transport,
        endpoint: &str,
        item_id: &ItemId,
        body: &Map<String, Value>,
    ) -> Result<Envelope<T>, GatewayError> {
        self.send(
            transport,
            endpoint,
            HttpMethod::Patch,
            Some(body),
            Some(item_id),
            None,
        )
    }

    pub fn delete_item(
        &self,
        transport: &impl Transport,
        endpoint: &str,
        item_id: &ItemId,
    ) -> Result<Envelope<Value>, GatewayError> {
        self.send(
            transport,
            endpoint,
            HttpMethod::Delete,
            None,
            Some(item_id),
            None,
        )
    }
}
