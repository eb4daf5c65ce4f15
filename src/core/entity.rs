//! Entity trait shared by every stored business object

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all stored entities.
///
/// Every entity belongs to exactly one organization (the tenant) and
/// carries creation, update and soft-deletion timestamps. Implementations
/// are normally generated by [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "products", "invoice-groups")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "product", "invoice_group")
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> Uuid;

    /// Tenant that owns this entity
    fn organization_id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Soft deletion timestamp
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Set or clear the soft deletion timestamp, touching `updated_at`
    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>);

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Whether the entity is owned by the given organization
    fn belongs_to(&self, organization_id: &Uuid) -> bool {
        self.organization_id() == *organization_id
    }
}
