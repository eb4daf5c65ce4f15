//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the struct, the [`Entity`](crate::core::entity::Entity)
//! implementation and the lifecycle helpers every stored entity needs.

/// Declare a tenant-owned entity
///
/// Injects the base fields (`id`, `organization_id`, `created_at`,
/// `updated_at`, `deleted_at`) ahead of the entity-specific fields and
/// generates `new()`, `touch()`, `soft_delete()` and `restore()`.
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(Product, "product", "products", {
///     name: String,
///     trade_price: f64,
///     minimum_order_quantity: u32,
/// });
///
/// let product = Product::new(organization_id, "Napa 500mg".to_string(), 1.2, 10);
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// Organization (tenant) that owns this entity
            pub organization_id: ::uuid::Uuid,

            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// Soft deletion timestamp
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,

            $( $(#[$field_meta])* pub $field : $field_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn organization_id(&self) -> ::uuid::Uuid {
                self.organization_id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, deleted_at: Option<::chrono::DateTime<::chrono::Utc>>) {
                self.deleted_at = deleted_at;
                self.updated_at = ::chrono::Utc::now();
            }
        }

        impl $type {
            /// Create a new instance owned by `organization_id`
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                organization_id: ::uuid::Uuid,
                $( $field: $field_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    organization_id,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                    $( $field ),*
                }
            }

            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }

            /// Soft delete this entity
            pub fn soft_delete(&mut self) {
                $crate::core::entity::Entity::set_deleted_at(self, Some(::chrono::Utc::now()));
            }

            /// Clear the soft deletion timestamp
            pub fn restore(&mut self) {
                $crate::core::entity::Entity::set_deleted_at(self, None);
            }
        }
    };
}
