//! Pagination metadata as returned by every list endpoint.

use serde::{Deserialize, Serialize};

/// One page of a collection listing.
///
/// `ids` is the authoritative ordering key for the page: once `results` are
/// merged into a larger cache, only `ids` can reproduce the server-side
/// sort/filter/search order. Extra server metadata (field-configuration
/// arrays for the form renderers) is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedPage<T> {
    pub results: Vec<T>,
    /// Total items across all pages, not just this one.
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub ids: Vec<i64>,
}

/// Pagination metadata kept after the page's results are merged away into
/// the item cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub ids: Vec<i64>,
}

impl<T> PaginatedPage<T> {
    /// Split into the items and the metadata that outlives them.
    pub fn split(self) -> (Vec<T>, PageDetails) {
        let PaginatedPage {
            results,
            count,
            next,
            previous,
            current_page,
            total_pages,
            ids,
        } = self;
        (
            results,
            PageDetails {
                count,
                next,
                previous,
                current_page,
                total_pages,
                ids,
            },
        )
    }
}
