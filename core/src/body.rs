//! Body-encoding negotiation: JSON by default, multipart form data when the
//! payload carries an upload descriptor.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Extensions that mark a string value as a link to an already-stored file
/// rather than user data.
const FILE_LINK_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "pdf", "doc", "docx", "xls", "xlsx", "txt",
];

/// An encoded request body plus the Content-Type it must be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedBody {
    Json(String),
    Multipart { boundary: String, payload: String },
}

impl EncodedBody {
    pub fn content_type(&self) -> String {
        match self {
            EncodedBody::Json(_) => "application/json".to_string(),
            EncodedBody::Multipart { boundary, .. } => {
                format!("multipart/form-data; boundary={boundary}")
            }
        }
    }

    pub fn into_payload(self) -> String {
        match self {
            EncodedBody::Json(payload) => payload,
            EncodedBody::Multipart { payload, .. } => payload,
        }
    }
}

/// An upload descriptor is an object carrying both a content locator (`uri`)
/// and a declared content type (`type`).
fn is_upload(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.get("uri").is_some_and(Value::is_string)
                && map.get("type").is_some_and(Value::is_string)
        }
        _ => false,
    }
}

/// A string value pointing at a stored file by extension.
fn is_file_link(value: &Value) -> bool {
    let Value::String(text) = value else {
        return false;
    };
    let Some((_, extension)) = text.rsplit_once('.') else {
        return false;
    };
    FILE_LINK_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
}

/// Encode a request payload.
///
/// Without an upload descriptor the payload is JSON-encoded, minus any
/// stored-file-link strings: re-submitting a link would overwrite the
/// server's file field with a path string.
///
/// With an upload descriptor present the payload becomes multipart form
/// data carrying only the plain string fields; the `file` key and the
/// upload descriptors themselves are dropped from the encoding.
// TODO: write the actual upload parts once the server contract for binary
// uploads is settled; today a descriptor selects multipart but is never
// attached.
pub fn encode(body: &Map<String, Value>) -> Result<EncodedBody, serde_json::Error> {
    if !body.values().any(is_upload) {
        let filtered: Map<String, Value> = body
            .iter()
            .filter(|(_, value)| !is_file_link(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        return Ok(EncodedBody::Json(serde_json::to_string(&filtered)?));
    }

    let boundary = format!("----lifeboard-{}", Uuid::new_v4().simple());
    let mut payload = String::new();
    for (key, value) in body {
        if key == "file" {
            continue;
        }
        let Value::String(text) = value else {
            continue;
        };
        payload.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{key}\"\r\n\r\n{text}\r\n"
        ));
    }
    payload.push_str(&format!("--{boundary}--\r\n"));
    Ok(EncodedBody::Multipart { boundary, payload })
}
