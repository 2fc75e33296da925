//! Data-access and pagination core for the lifeboard dashboard clients.
//!
//! # Overview
//! Two collaborating pieces back every collection view in the web and
//! mobile clients:
//!
//! - [`Gateway`] builds HTTP requests against a single base URL (auth token
//!   attachment, query-parameter sanitization, JSON-vs-multipart body
//!   negotiation) and shapes responses into a uniform [`Envelope`].
//! - [`order_by_page_ids`] reconciles a server-provided ordered id list
//!   with the locally cached unordered [`Collection`], producing the
//!   correctly ordered page-scoped view.
//!
//! # Design
//! - Host-does-IO: the core never touches the network. [`Transport`] is the
//!   seam where the host (or a test harness) performs the round trip.
//! - Expected failures (non-2xx, unparsable bodies) are envelope business;
//!   only transport trouble surfaces as `Err`.
//! - Types use owned `String` / `Vec` fields so values can cross the C FFI
//!   boundary used by the mobile client.

pub mod body;
pub mod collection;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod page;
pub mod query;
pub mod resolver;
pub mod types;

pub use collection::{Collection, Record};
pub use envelope::{Envelope, ListEnvelope};
pub use error::{GatewayError, TransportError};
pub use gateway::{Gateway, ItemId, BASE_URL_ENV};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use page::{PageDetails, PaginatedPage};
pub use resolver::order_by_page_ids;
pub use types::Job;
