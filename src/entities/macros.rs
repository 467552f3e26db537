//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the struct, the [`Entity`] implementation and a
//! constructor for each persisted document type.
//!
//! [`Entity`]: crate::core::entity::Entity

/// Implement [`Entity`](crate::core::entity::Entity) for a struct holding
/// `id`, `created_at` and `updated_at` fields
///
/// # Example
/// ```rust,ignore
/// impl_entity!(Category, "categories", "category");
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $plural:expr, $singular:expr) => {
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

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}

/// Define a complete entity: struct with base fields, `Entity` impl and `new()`
///
/// Injects: id, created_at, updated_at. `new()` takes the specific fields
/// in declaration order and stamps a fresh v4 id and both timestamps.
///
/// # Example
/// ```rust,ignore
/// define_entity!(
///     Category, "categories", "category",
///     {
///         name: String,
///         description: Option<String>,
///     }
/// );
///
/// let books = Category::new("Books".to_string(), None);
/// assert_eq!(books.created_at, books.updated_at);
/// ```
#[macro_export]
macro_rules! define_entity {
    (
        $(#[$struct_meta:meta])*
        $type:ident,
        $plural:expr,
        $singular:expr,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            $( $(#[$field_meta])* pub $field : $field_type, )*

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
        }

        $crate::impl_entity!($type, $plural, $singular);

        impl $type {
            /// Create a new instance with a fresh id and timestamps
            #[allow(clippy::too_many_arguments)]
            pub fn new($( $field: $field_type ),*) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    $( $field, )*
                    created_at: now,
                    updated_at: now,
                }
            }
        }
    };
}
