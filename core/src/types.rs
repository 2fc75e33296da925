//! Reference entity for the career board.
//!
//! # Design
//! The gateway and collection are generic over entity types; `Job` is the
//! concrete entity the test suites run against. It mirrors the mock
//! server's schema but is defined independently so the FFI surface never
//! couples to Axum internals; the integration tests catch schema drift.

use serde::{Deserialize, Serialize};

use crate::collection::Record;

/// A job application row from the career board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    /// Wire code: 0 Wishlist, 1 Applied, 2 Interview, 3 Offer, 4 Rejected,
    /// 5 Accepted.
    pub status: i32,
    /// Wire code: 0 Walk-in, 1 LinkedIn, 2 Indeed, 3 Glassdoor, 5 Referral.
    pub source: i32,
    pub applied_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl Record for Job {
    fn id(&self) -> i64 {
        self.id
    }
}
