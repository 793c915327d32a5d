// ABOUTME: Shared test doubles for the external collaborators
// ABOUTME: Mock data store with recorded queries, settings source, and navigation source

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;

use folio::config::EngineConfig;
use folio::helpers::{HelperRegistry, NavItem, NavigationSource, SettingsSource};
use folio::query::{Adjacency, DataStore, Entity, Filter, QuerySpec, StoreError};

pub const TEST_SECRET: &str = "test-signing-secret";

#[derive(Default)]
pub struct MockStore {
    pub posts: Vec<Value>,
    pub authors: Vec<Value>,
    pub tags: Vec<Value>,
    pub related: Vec<Value>,
    pub adjacent: Option<Value>,
    pub count: u64,
    pub fail: bool,
    /// Per-call latencies consumed in invocation order by `find_all`.
    pub delays: Mutex<VecDeque<Duration>>,
    pub recorded_queries: Mutex<Vec<(Entity, QuerySpec)>>,
    pub recorded_counts: Mutex<Vec<Vec<Filter>>>,
}

impl MockStore {
    pub fn with_posts(posts: Vec<Value>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn push_delays(&self, millis: &[u64]) {
        let mut delays = self.delays.lock().unwrap();
        for ms in millis {
            delays.push_back(Duration::from_millis(*ms));
        }
    }

    fn collection(&self, entity: Entity) -> Vec<Value> {
        match entity {
            Entity::Post => self.posts.clone(),
            Entity::Author => self.authors.clone(),
            Entity::Tag => self.tags.clone(),
        }
    }

    async fn maybe_sleep(&self) {
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl DataStore for MockStore {
    async fn find_all(&self, entity: Entity, query: &QuerySpec) -> Result<Vec<Value>, StoreError> {
        self.recorded_queries
            .lock()
            .unwrap()
            .push((entity, query.clone()));
        self.maybe_sleep().await;
        if self.fail {
            return Err(StoreError::Rejected("mock store failure".to_string()));
        }
        Ok(self.collection(entity))
    }

    async fn find_one(
        &self,
        entity: Entity,
        _filters: &[Filter],
    ) -> Result<Option<Value>, StoreError> {
        if self.fail {
            return Err(StoreError::Rejected("mock store failure".to_string()));
        }
        Ok(self.collection(entity).into_iter().next())
    }

    async fn get_adjacent(
        &self,
        _post: &Value,
        _direction: Adjacency,
    ) -> Result<Option<Value>, StoreError> {
        self.maybe_sleep().await;
        if self.fail {
            return Err(StoreError::Rejected("mock store failure".to_string()));
        }
        Ok(self.adjacent.clone())
    }

    async fn get_related(
        &self,
        _post: &Value,
        _count: u64,
        _offset: u64,
    ) -> Result<Vec<Value>, StoreError> {
        self.maybe_sleep().await;
        if self.fail {
            return Err(StoreError::Rejected("mock store failure".to_string()));
        }
        Ok(self.related.clone())
    }

    async fn get_count(&self, _entity: Entity, filters: &[Filter]) -> Result<u64, StoreError> {
        self.recorded_counts.lock().unwrap().push(filters.to_vec());
        if self.fail {
            return Err(StoreError::Rejected("mock store failure".to_string()));
        }
        Ok(self.count)
    }
}

pub struct MockSettings;

impl SettingsSource for MockSettings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            "codeinjection_head" => Some("<style>.injected{}</style>".to_string()),
            "codeinjection_foot" => Some("<script>window.injected=1</script>".to_string()),
            _ => None,
        }
    }
}

pub struct MockNavigation {
    pub items: Vec<NavItem>,
}

impl Default for MockNavigation {
    fn default() -> Self {
        Self {
            items: vec![
                NavItem {
                    label: "Home".to_string(),
                    link: "/".to_string(),
                },
                NavItem {
                    label: "About".to_string(),
                    link: "/about/".to_string(),
                },
            ],
        }
    }
}

impl NavigationSource for MockNavigation {
    fn items(&self) -> Vec<NavItem> {
        self.items.clone()
    }
}

pub fn sample_posts(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i.to_string(),
                "slug": format!("post-{i}"),
                "title": format!("Post {i}"),
                "status": "published",
            })
        })
        .collect()
}

pub fn registry_with(store: MockStore) -> Arc<HelperRegistry> {
    registry_with_store(Arc::new(store))
}

pub fn registry_with_store(store: Arc<MockStore>) -> Arc<HelperRegistry> {
    let registry = HelperRegistry::new(
        EngineConfig::new(TEST_SECRET),
        store,
        Arc::new(MockSettings),
        Arc::new(MockNavigation::default()),
    )
    .expect("valid test config");
    Arc::new(registry)
}
