use async_trait::async_trait;

use crate::domain::filter::NormalizedFilter;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::subscription::Subscription;

pub mod memory;
pub mod postgres;

pub use memory::InMemorySubscriptionRepository;
pub use postgres::PgSubscriptionRepository;

/// Record store behind the subscription service.
///
/// Filter predicates are exact: `user_id` and `service_name` by equality, the
/// period by overlap with the subscription's active months.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription, StorageError>;

    /// Replaces every field of the record. `None` when `id` does not exist.
    async fn update(
        &self,
        id: i64,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, StorageError>;

    /// Removes the record and hands it back. `None` when `id` does not exist.
    async fn delete(&self, id: i64) -> Result<Option<Subscription>, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, StorageError>;

    /// One page of matching records, ordered by start month, service name (byte
    /// order, not locale collation) and id.
    async fn list_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError>;

    /// Every matching record in no particular order. Pagination is ignored.
    async fn fetch_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError>;
}

#[derive(thiserror::Error)]
pub enum StorageError {
    #[error("Failed to execute a database query.")]
    Database(#[from] sqlx::Error),
    #[error("Subscription store is unavailable: {0}")]
    Unavailable(String),
}

impl std::fmt::Debug for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)?;

        if let StorageError::Database(err) = self {
            write!(f, "\n\t({})", err)?;
        }

        Ok(())
    }
}
