//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String` and raw pointers instead of `Vec`.
//! Envelope payloads cross the boundary as JSON strings rather than tagged
//! unions, so the mobile shell can hand them straight to its own JSON
//! layer without a per-entity C struct. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use lifeboard_core::{Envelope, Gateway, HttpMethod};
use serde_json::Value;

/// Opaque handle to a [`Gateway`]. C callers receive a pointer to this and
/// pass it back into every FFI function.
pub struct FfiGateway {
    pub(crate) inner: Gateway,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Patch = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Patch => HttpMethod::Patch,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `lifeboard_build_request`. The C caller executes the request
/// and passes the raw response back through `lifeboard_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: lifeboard_core::HttpRequest) -> *mut Self {
        let url = CString::new(req.url).unwrap().into_raw();
        let body = match req.body {
            Some(b) => CString::new(b).unwrap().into_raw(),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let mut ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: CString::new(k).unwrap().into_raw(),
                    value: CString::new(v).unwrap().into_raw(),
                })
                .collect();
            let ptr = ffi_headers.as_mut_ptr();
            std::mem::forget(ffi_headers);
            ptr
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        });
        Box::into_raw(ffi_req)
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// The uniform result envelope, flattened for C.
///
/// `details_json` is always a JSON document (an empty string on success,
/// the server's error body otherwise). `data_json` is null when the call
/// carried no payload, a JSON document otherwise. The caller owns both
/// strings and must release the envelope with `lifeboard_free_envelope`.
#[repr(C)]
pub struct FfiEnvelope {
    pub ok: bool,
    pub details_json: *mut c_char,
    pub data_json: *mut c_char,
}

impl FfiEnvelope {
    /// Flatten a core envelope into heap-allocated JSON strings.
    pub(crate) fn from_core(envelope: Envelope<Value>) -> *mut Self {
        let details = envelope.details.to_string();
        let data = envelope.data.map(|value| value.to_string());

        let result = Box::new(FfiEnvelope {
            ok: envelope.ok,
            details_json: CString::new(details).unwrap().into_raw(),
            data_json: match data {
                Some(json) => CString::new(json).unwrap().into_raw(),
                None => std::ptr::null_mut(),
            },
        });
        Box::into_raw(result)
    }

    /// Build a failure envelope for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        FfiEnvelope::message(&format!("null argument: {name}"))
    }

    /// Build a failure envelope carrying a plain string message.
    pub(crate) fn message(msg: &str) -> *mut Self {
        FfiEnvelope::from_core(Envelope::failure(Value::String(msg.to_string())))
    }
}
