// ABOUTME: External data store seam and its failure taxonomy
// ABOUTME: One logical query per helper invocation; rejections are caught at the helper boundary

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::spec::{Entity, Filter, QuerySpec};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store rejected query: {0}")]
    Rejected(String),

    #[error("store timed out")]
    Timeout,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Direction for adjacent-post derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    Next,
    Previous,
}

/// The persistent data store, owned externally. The similarity and adjacency
/// algorithms behind `get_related` and `get_adjacent` belong to the store;
/// this crate only builds the normalized query description.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch a collection matching the query.
    async fn find_all(&self, entity: Entity, query: &QuerySpec) -> Result<Vec<Value>>;

    /// Fetch a single entity, or nothing.
    async fn find_one(&self, entity: Entity, filters: &[Filter]) -> Result<Option<Value>>;

    /// Fetch the post adjacent to `post` in publication order.
    async fn get_adjacent(&self, post: &Value, direction: Adjacency) -> Result<Option<Value>>;

    /// Fetch posts related to `post`; ranking is the store's concern.
    async fn get_related(&self, post: &Value, count: u64, offset: u64) -> Result<Vec<Value>>;

    /// Count entities matching the filters.
    async fn get_count(&self, entity: Entity, filters: &[Filter]) -> Result<u64>;
}
