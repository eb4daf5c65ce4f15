//! Storage-agnostic CRUD trait for entities

use crate::core::entity::Entity;
use crate::core::error::OmisResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing entities of one type
///
/// Soft-deleted entities are invisible to `get` and the list methods.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    async fn create(&self, entity: T) -> OmisResult<T>;

    async fn get(&self, id: &Uuid) -> OmisResult<Option<T>>;

    /// All live entities, any tenant
    async fn list(&self) -> OmisResult<Vec<T>>;

    /// Live entities owned by one organization
    async fn list_for(&self, organization_id: &Uuid) -> OmisResult<Vec<T>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|e| e.belongs_to(organization_id))
            .collect())
    }

    /// Replace an existing entity; fails with not-found when absent
    async fn update(&self, id: &Uuid, entity: T) -> OmisResult<T>;

    /// Soft delete; fails with not-found when absent
    async fn delete(&self, id: &Uuid) -> OmisResult<()>;
}
