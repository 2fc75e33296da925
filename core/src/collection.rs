//! Client-side item cache shared across views of one entity type.
//!
//! # Design
//! Each `Collection` pairs one endpoint with an unordered id-to-item map,
//! populated incrementally across requests. CRUD operations route through
//! the gateway and mutate the cache only after branching on the envelope,
//! so a failed call leaves the cache untouched. All mutation happens
//! synchronously with response arrival; two in-flight requests touching the
//! same entry resolve last-write-wins, and callers needing more must
//! serialize their own requests.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::envelope::{Envelope, ListEnvelope};
use crate::error::GatewayError;
use crate::gateway::{Gateway, ItemId};
use crate::http::Transport;
use crate::page::PageDetails;
use crate::resolver::order_by_page_ids;

/// A cacheable entity: anything with a server-assigned integer id.
pub trait Record: DeserializeOwned {
    fn id(&self) -> i64;
}

/// Unordered id-to-item cache for one endpoint.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    endpoint: String,
    items: HashMap<i64, T>,
}

impl<T: Record + Clone> Collection<T> {
    /// `endpoint` keeps the API's trailing slash, e.g. `"jobs/"`.
    pub fn new(endpoint: &str) -> Self {
        Collection {
            endpoint: endpoint.to_string(),
            items: HashMap::new(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The page-scoped, server-ordered view of this cache. Ids not yet
    /// cached are skipped, never an error.
    pub fn page_view(&self, ids: &[i64]) -> Vec<&T> {
        order_by_page_ids(&self.items, ids)
    }

    /// Fetch one page and merge its results into the cache (insert new,
    /// replace existing). The envelope carries the pagination metadata;
    /// item data lands in the cache.
    pub fn fetch_page(
        &mut self,
        gateway: &Gateway,
        transport: &impl Transport,
        params: Option<&str>,
    ) -> Result<Envelope<PageDetails>, GatewayError> {
        let result: ListEnvelope<T> = gateway.fetch_items(transport, &self.endpoint, params)?;
        if !result.ok {
            return Ok(Envelope::failure(result.details));
        }
        if let Some(items) = result.data {
            for item in items {
                self.items.insert(item.id(), item);
            }
        }
        Ok(match result.page {
            Some(page) => Envelope::success(page),
            None => Envelope::success_empty(),
        })
    }

    /// POST a new entity and cache the server's version of it.
    pub fn create(
        &mut self,
        gateway: &Gateway,
        transport: &impl Transport,
        details: &Map<String, Value>,
    ) -> Result<Envelope<T>, GatewayError> {
        let result: Envelope<T> = gateway.post_item(transport, &self.endpoint, details)?;
        let Envelope { details, ok, data } = result;
        let Some(item) = data.filter(|_| ok) else {
            return Ok(Envelope::failure(details));
        };
        self.items.insert(item.id(), item.clone());
        Ok(Envelope::success(item))
    }

    /// PATCH an entity and replace the cached copy with the server's.
    pub fn update(
        &mut self,
        gateway: &Gateway,
        transport: &impl Transport,
        id: i64,
        details: &Map<String, Value>,
    ) -> Result<Envelope<T>, GatewayError> {
        let result: Envelope<T> =
            gateway.update_item(transport, &self.endpoint, &ItemId::Num(id), details)?;
        let Envelope { details, ok, data } = result;
        let Some(item) = data.filter(|_| ok) else {
            return Ok(Envelope::failure(details));
        };
        self.items.insert(item.id(), item.clone());
        Ok(Envelope::success(item))
    }

    /// DELETE an entity; the cache entry is dropped only on success.
    pub fn remove(
        &mut self,
        gateway: &Gateway,
        transport: &impl Transport,
        id: i64,
    ) -> Result<Envelope<()>, GatewayError> {
        let result = gateway.delete_item(transport, &self.endpoint, &ItemId::Num(id))?;
        if !result.ok {
            return Ok(Envelope::failure(result.details));
        }
        self.items.remove(&id);
        Ok(Envelope::success_empty())
    }
}
