mod in_memory;
mod postgres;

pub use in_memory::InMemorySubscriptionRepository;
pub use postgres::PostgresSubscriptionRepository;

use crate::domain::{Subscription, TotalPriceFilter};
use async_trait::async_trait;
use uuid::Uuid;

/// Durable home of subscriptions.
///
/// Implementations persist whatever they are given; merging and validation
/// happen before a subscription reaches this layer.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError>;

    /// No ordering is guaranteed.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError>;

    async fn update(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Sum of prices over matching rows, `0` when nothing matches.
    async fn total_price(&self, filter: &TotalPriceFilter) -> Result<i64, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Subscription `{0}` does not exist")]
    NotFound(Uuid),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}
