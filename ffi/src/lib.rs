//! C-ABI wrapper around `lifeboard-core`.
//!
//! # Overview
//! Exposes the gateway's build/parse halves and the page resolver through
//! `extern "C"` functions so the mobile shell can construct requests, run
//! them with its own HTTP stack, and shape the responses without linking
//! serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Request bodies, envelope payloads, and resolver arguments travel as
//!   JSON strings; the single `FfiEnvelope` carries every parse result.
//! - The C caller owns all returned pointers and must call the matching
//!   `lifeboard_free_*` function to release them.

pub mod types;

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use lifeboard_core::{order_by_page_ids, Envelope, Gateway, HttpResponse, ItemId};
use serde_json::Value;

use types::*;

/// Copy a C string the caller retains ownership of. Invalid UTF-8 reads as
/// empty, matching how a garbled header or URL would fail later anyway.
fn text(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .unwrap_or("")
        .to_string()
}

// ---------------------------------------------------------------------------
// Gateway lifecycle
// ---------------------------------------------------------------------------

/// Create a `Gateway` bound to `base_url`. `token` may be null for
/// anonymous requests (login, registration).
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `lifeboard_gateway_free`.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_gateway_new(
    base_url: *const c_char,
    token: *const c_char,
) -> *mut FfiGateway {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = text(base_url);
        let token = if token.is_null() {
            None
        } else {
            Some(text(token))
        };
        let gateway = Gateway::new(&url, token.as_deref());
        Box::into_raw(Box::new(FfiGateway { inner: gateway }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `Gateway` created by `lifeboard_gateway_new`. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_gateway_free(gateway: *mut FfiGateway) {
    if !gateway.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(gateway) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the HTTP request for one API call.
///
/// `body_json` is an optional JSON object (null to send no body); the
/// JSON-vs-multipart decision and the file-link stripping happen here.
/// `item_id` is an optional id or slug appended to the endpoint path.
/// `params` is an optional raw query string; blank values are dropped.
///
/// Returns null if `gateway` or `endpoint` is null, if `body_json` is not
/// a JSON object, or if encoding fails.
/// The caller must free the returned pointer with `lifeboard_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_build_request(
    gateway: *const FfiGateway,
    endpoint: *const c_char,
    method: FfiHttpMethod,
    body_json: *const c_char,
    item_id: *const c_char,
    params: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if gateway.is_null() || endpoint.is_null() {
            return std::ptr::null_mut();
        }
        let gateway = unsafe { &*gateway };

        let body = if body_json.is_null() {
            None
        } else {
            match serde_json::from_str(&text(body_json)) {
                Ok(Value::Object(map)) => Some(map),
                _ => return std::ptr::null_mut(),
            }
        };
        let item_id = if item_id.is_null() {
            None
        } else {
            Some(ItemId::parse(&text(item_id)))
        };
        let params = if params.is_null() {
            None
        } else {
            Some(text(params))
        };

        match gateway.inner.build(
            &text(endpoint),
            method.into(),
            body.as_ref(),
            item_id.as_ref(),
            params.as_deref(),
        ) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Shape a raw HTTP response into the uniform envelope.
///
/// `body` may be null (treated as empty, e.g. a 204). The returned
/// envelope carries the payload and error details as JSON strings; see
/// [`FfiEnvelope`]. Never returns null.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_parse_response(
    gateway: *const FfiGateway,
    method: FfiHttpMethod,
    status: u16,
    body: *const c_char,
) -> *mut FfiEnvelope {
    catch_unwind(|| {
        if gateway.is_null() {
            return FfiEnvelope::null_arg("gateway");
        }
        let gateway = unsafe { &*gateway };
        let response = HttpResponse {
            status,
            headers: Vec::new(),
            body: if body.is_null() {
                String::new()
            } else {
                text(body)
            },
        };
        let envelope: Envelope<Value> = gateway.inner.parse(method.into(), &response);
        FfiEnvelope::from_core(envelope)
    })
    .unwrap_or_else(|_| FfiEnvelope::message("panic in lifeboard_parse_response"))
}

// ---------------------------------------------------------------------------
// Page resolver
// ---------------------------------------------------------------------------

/// Order a cached item map by a page's id list.
///
/// `cache_json` is a JSON object keyed by item id, `ids_json` a JSON array
/// of integer ids. Returns a JSON array of the cached items in id-list
/// order, skipping ids without a cached entry. Object keys that are not
/// integers are ignored.
///
/// Returns null if either argument is null or not the expected JSON shape.
/// The caller must free the returned string with `lifeboard_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_order_page(
    cache_json: *const c_char,
    ids_json: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        if cache_json.is_null() || ids_json.is_null() {
            return std::ptr::null_mut();
        }

        let cache: HashMap<i64, Value> = match serde_json::from_str(&text(cache_json)) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .filter_map(|(key, value)| key.parse().ok().map(|id| (id, value)))
                .collect(),
            _ => return std::ptr::null_mut(),
        };
        let ids: Vec<i64> = match serde_json::from_str(&text(ids_json)) {
            Ok(ids) => ids,
            Err(_) => return std::ptr::null_mut(),
        };

        let view: Vec<Value> = order_by_page_ids(&cache, &ids).into_iter().cloned().collect();
        CString::new(Value::Array(view).to_string())
            .unwrap()
            .into_raw()
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `lifeboard_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiEnvelope` returned by `lifeboard_parse_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_free_envelope(envelope: *mut FfiEnvelope) {
    if envelope.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let envelope = unsafe { Box::from_raw(envelope) };
        if !envelope.details_json.is_null() {
            drop(unsafe { CString::from_raw(envelope.details_json) });
        }
        if !envelope.data_json.is_null() {
            drop(unsafe { CString::from_raw(envelope.data_json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lifeboard_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn gateway() -> *mut FfiGateway {
        let url = CString::new("http://localhost:8000").unwrap();
        let token = CString::new("ffi-token").unwrap();
        lifeboard_gateway_new(url.as_ptr(), token.as_ptr())
    }

    fn header_value(req: &FfiHttpRequest, key: &str) -> Option<String> {
        let headers = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        headers.iter().find_map(|h| {
            let k = unsafe { CStr::from_ptr(h.key) }.to_str().unwrap();
            (k == key).then(|| {
                unsafe { CStr::from_ptr(h.value) }
                    .to_str()
                    .unwrap()
                    .to_string()
            })
        })
    }

    #[test]
    fn gateway_new_and_free() {
        let gateway = gateway();
        assert!(!gateway.is_null());
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn gateway_new_null_base_url_returns_null() {
        let gateway = lifeboard_gateway_new(std::ptr::null(), std::ptr::null());
        assert!(gateway.is_null());
    }

    #[test]
    fn gateway_free_null_is_safe() {
        lifeboard_gateway_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_request_carries_auth_and_sanitized_query() {
        let gateway = gateway();
        let endpoint = CString::new("jobs/").unwrap();
        let params = CString::new("status=&source=linkedin").unwrap();
        let req = lifeboard_build_request(
            gateway,
            endpoint.as_ptr(),
            FfiHttpMethod::Get,
            std::ptr::null(),
            std::ptr::null(),
            params.as_ptr(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        let url = unsafe { CStr::from_ptr(req_ref.url) }.to_str().unwrap();
        assert_eq!(url, "http://localhost:8000/jobs/?source=linkedin");
        assert_eq!(
            header_value(req_ref, "Authorization").as_deref(),
            Some("Token ffi-token")
        );
        assert!(req_ref.body.is_null());

        lifeboard_free_request(req);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn build_request_with_item_id_addresses_the_item() {
        let gateway = gateway();
        let endpoint = CString::new("jobs/").unwrap();
        let id = CString::new("42").unwrap();
        let body = CString::new(r#"{"status": 3}"#).unwrap();
        let req = lifeboard_build_request(
            gateway,
            endpoint.as_ptr(),
            FfiHttpMethod::Patch,
            body.as_ptr(),
            id.as_ptr(),
            std::ptr::null(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        let url = unsafe { CStr::from_ptr(req_ref.url) }.to_str().unwrap();
        assert_eq!(url, "http://localhost:8000/jobs/42/");
        assert_eq!(
            header_value(req_ref, "Content-Type").as_deref(),
            Some("application/json")
        );
        let sent = unsafe { CStr::from_ptr(req_ref.body) }.to_str().unwrap();
        let sent: Value = serde_json::from_str(sent).unwrap();
        assert_eq!(sent, serde_json::json!({"status": 3}));

        lifeboard_free_request(req);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn build_request_with_upload_goes_multipart() {
        let gateway = gateway();
        let endpoint = CString::new("documents/").unwrap();
        let body = CString::new(
            r#"{"name": "Visa", "attachment": {"uri": "file:///tmp/visa.png", "type": "image/png"}}"#,
        )
        .unwrap();
        let req = lifeboard_build_request(
            gateway,
            endpoint.as_ptr(),
            FfiHttpMethod::Post,
            body.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        let content_type = header_value(req_ref, "Content-Type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        lifeboard_free_request(req);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn build_request_non_object_body_returns_null() {
        let gateway = gateway();
        let endpoint = CString::new("jobs/").unwrap();
        let body = CString::new(r#"[1, 2, 3]"#).unwrap();
        let req = lifeboard_build_request(
            gateway,
            endpoint.as_ptr(),
            FfiHttpMethod::Post,
            body.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
        );
        assert!(req.is_null());
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn build_request_null_gateway_returns_null() {
        let endpoint = CString::new("jobs/").unwrap();
        let req = lifeboard_build_request(
            std::ptr::null(),
            endpoint.as_ptr(),
            FfiHttpMethod::Get,
            std::ptr::null(),
            std::ptr::null(),
            std::ptr::null(),
        );
        assert!(req.is_null());
    }

    #[test]
    fn parse_success_returns_data_json() {
        let gateway = gateway();
        let body = CString::new(r#"{"id": 3, "title": "SRE"}"#).unwrap();
        let result = lifeboard_parse_response(gateway, FfiHttpMethod::Get, 200, body.as_ptr());
        assert!(!result.is_null());

        let r = unsafe { &*result };
        assert!(r.ok);
        assert!(!r.data_json.is_null());
        let data = unsafe { CStr::from_ptr(r.data_json) }.to_str().unwrap();
        let data: Value = serde_json::from_str(data).unwrap();
        assert_eq!(data["title"], "SRE");

        lifeboard_free_envelope(result);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn parse_failure_carries_error_details() {
        let gateway = gateway();
        let body = CString::new(r#"{"detail": "Not found."}"#).unwrap();
        let result = lifeboard_parse_response(gateway, FfiHttpMethod::Get, 404, body.as_ptr());
        let r = unsafe { &*result };
        assert!(!r.ok);
        assert!(r.data_json.is_null());
        let details = unsafe { CStr::from_ptr(r.details_json) }.to_str().unwrap();
        let details: Value = serde_json::from_str(details).unwrap();
        assert_eq!(details["detail"], "Not found.");

        lifeboard_free_envelope(result);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn parse_delete_ignores_null_body() {
        let gateway = gateway();
        let result =
            lifeboard_parse_response(gateway, FfiHttpMethod::Delete, 204, std::ptr::null());
        let r = unsafe { &*result };
        assert!(r.ok);
        assert!(r.data_json.is_null());

        lifeboard_free_envelope(result);
        lifeboard_gateway_free(gateway);
    }

    #[test]
    fn parse_null_gateway_returns_failure_envelope() {
        let body = CString::new("{}").unwrap();
        let result =
            lifeboard_parse_response(std::ptr::null(), FfiHttpMethod::Get, 200, body.as_ptr());
        let r = unsafe { &*result };
        assert!(!r.ok);

        lifeboard_free_envelope(result);
    }

    #[test]
    fn order_page_follows_id_list() {
        let cache = CString::new(r#"{"1": {"t": "A"}, "2": {"t": "B"}, "3": {"t": "C"}}"#).unwrap();
        let ids = CString::new("[3, 1]").unwrap();
        let view = lifeboard_order_page(cache.as_ptr(), ids.as_ptr());
        assert!(!view.is_null());

        let json = unsafe { CStr::from_ptr(view) }.to_str().unwrap();
        let json: Value = serde_json::from_str(json).unwrap();
        assert_eq!(json, serde_json::json!([{"t": "C"}, {"t": "A"}]));

        lifeboard_free_string(view);
    }

    #[test]
    fn order_page_skips_missing_ids() {
        let cache = CString::new(r#"{"1": "A"}"#).unwrap();
        let ids = CString::new("[1, 2]").unwrap();
        let view = lifeboard_order_page(cache.as_ptr(), ids.as_ptr());
        let json = unsafe { CStr::from_ptr(view) }.to_str().unwrap();
        assert_eq!(json, r#"["A"]"#);

        lifeboard_free_string(view);
    }

    #[test]
    fn order_page_bad_input_returns_null() {
        let cache = CString::new("[]").unwrap();
        let ids = CString::new("[1]").unwrap();
        assert!(lifeboard_order_page(cache.as_ptr(), ids.as_ptr()).is_null());
        assert!(lifeboard_order_page(std::ptr::null(), ids.as_ptr()).is_null());
    }

    #[test]
    fn free_functions_accept_null() {
        lifeboard_free_request(std::ptr::null_mut());
        lifeboard_free_envelope(std::ptr::null_mut());
        lifeboard_free_string(std::ptr::null_mut());
    }
}
