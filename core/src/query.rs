//! Query-parameter sanitization.

use url::form_urlencoded;

/// Re-encode a raw query string, dropping every pair whose value is empty or
/// whitespace-only.
///
/// Filter widgets hand over their whole state as one param string, blank
/// fields included, and servers tend to read `?status=` as "filter on the
/// empty value" rather than "no filter", so blank pairs must never reach
/// the wire. Pair order is preserved; keys and values are re-percent-encoded.
pub fn sanitize_params(raw: &str) -> String {
    let mut filtered = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if value.trim().is_empty() {
            continue;
        }
        filtered.append_pair(&key, &value);
    }
    filtered.finish()
}
