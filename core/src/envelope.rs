//! Uniform success/failure wrappers returned by every gateway call.

use serde_json::Value;

use crate::page::PageDetails;

/// Uniform result of a gateway call.
///
/// Callers must branch on `ok` before trusting `data`. On success `details`
/// is an empty string; on failure it carries the server's error payload
/// (non-2xx) or the fixed `"Parsing Error"` diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub details: Value,
    pub ok: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope {
            details: Value::String(String::new()),
            ok: true,
            data: Some(data),
        }
    }

    /// Success with no payload. DELETE responses are never read, so this is
    /// the only success shape a delete can produce.
    pub fn success_empty() -> Self {
        Envelope {
            details: Value::String(String::new()),
            ok: true,
            data: None,
        }
    }

    pub fn failure(details: Value) -> Self {
        Envelope {
            details,
            ok: false,
            data: None,
        }
    }

    /// Failure for a nominally successful response whose body did not parse.
    pub fn parse_failure() -> Self {
        Envelope::failure(Value::String("Parsing Error".to_string()))
    }
}

/// Result of a paginated list call: the page's items plus the pagination
/// metadata a view needs to drive the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<T> {
    pub details: Value,
    pub ok: bool,
    pub data: Option<Vec<T>>,
    pub page: Option<PageDetails>,
}
