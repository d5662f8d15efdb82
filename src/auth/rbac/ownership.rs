//! Resource ownership strategies

use async_trait::async_trait;
use dashmap::DashSet;
use std::collections::HashMap;
use std::sync::Arc;

use super::catalog::Resource;
use crate::utils::error::Result;

/// Answers "does this user own this resource instance" for one resource type.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    async fn is_owner(&self, user_id: u64, resource_id: u64) -> Result<bool>;
}

/// Ownership strategies keyed by resource type.
///
/// A resource type without a registered resolver is unsupported.
#[derive(Clone, Default)]
pub struct OwnershipRegistry {
    resolvers: HashMap<Resource, Arc<dyn OwnershipResolver>>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource: Resource, resolver: Arc<dyn OwnershipResolver>) {
        self.resolvers.insert(resource, resolver);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, resource: Resource, resolver: Arc<dyn OwnershipResolver>) -> Self {
        self.register(resource, resolver);
        self
    }

    pub fn resolver(&self, resource: Resource) -> Option<&Arc<dyn OwnershipResolver>> {
        self.resolvers.get(&resource)
    }

    pub fn supports(&self, resource: Resource) -> bool {
        self.resolvers.contains_key(&resource)
    }

    pub fn supported(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self.resolvers.keys().copied().collect();
        resources.sort();
        resources
    }
}

impl std::fmt::Debug for OwnershipRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipRegistry")
            .field("resources", &self.supported())
            .finish()
    }
}

/// Ownership facts held in memory as `(user_id, resource_id)` pairs
#[derive(Debug, Default)]
pub struct InMemoryOwnership {
    owned: DashSet<(u64, u64)>,
}

impl InMemoryOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: u64, resource_id: u64) {
        self.owned.insert((user_id, resource_id));
    }

    pub fn remove(&self, user_id: u64, resource_id: u64) -> bool {
        self.owned.remove(&(user_id, resource_id)).is_some()
    }
}

#[async_trait]
impl OwnershipResolver for InMemoryOwnership {
    async fn is_owner(&self, user_id: u64, resource_id: u64) -> Result<bool> {
        Ok(self.owned.contains(&(user_id, resource_id)))
    }
}
