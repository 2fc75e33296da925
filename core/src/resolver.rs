//! Pagination-aware ordering of cached items.

use std::collections::HashMap;

/// Project a page's id order onto the item cache.
///
/// Returns the cached items whose ids appear in `ids`, in exactly the order
/// of `ids`. The cache's own iteration order never leaks into the output:
/// server-side sort/filter/search decide what a page looks like, and `ids`
/// is the only carrier of that decision once results live in the cache.
///
/// An id with no cache entry means the client and server views have drifted;
/// the page degrades to a shorter list instead of failing.
pub fn order_by_page_ids<'a, T>(cache: &'a HashMap<i64, T>, ids: &[i64]) -> Vec<&'a T> {
    ids.iter().filter_map(|id| cache.get(id)).collect()
}
