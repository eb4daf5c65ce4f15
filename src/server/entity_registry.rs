//! Entity registry collecting descriptors and merging their routes

use axum::Router;
use std::collections::BTreeMap;

/// Describes how to build the routes of one entity
///
/// Routes are relative: the REST exposure nests the merged router under the
/// configured API prefix.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g. "order")
    fn entity_type(&self) -> &str;

    /// The plural form used in paths (e.g. "orders")
    fn plural(&self) -> &str;

    fn build_routes(&self) -> Router;
}

/// Registry of all entities exposed by the server
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; a later one with the same entity type replaces it
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        if self.descriptors.contains_key(&entity_type) {
            tracing::warn!(entity_type = %entity_type, "entity descriptor replaced");
        }
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn plural_of(&self, entity_type: &str) -> Option<&str> {
        self.descriptors.get(entity_type).map(|d| d.plural())
    }
}
