// ABOUTME: Data query adapter module
// ABOUTME: Builds normalized filter/sort/paginate requests and defines the store seam

pub mod spec;
pub mod store;

pub use spec::{Entity, Filter, QuerySpec, SortOrder, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use store::{Adjacency, DataStore, StoreError};
