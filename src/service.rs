use crate::{
    domain::{NewSubscription, Subscription, SubscriptionUpdate, TotalPriceFilter, ValidationError},
    repository::{RepositoryError, SubscriptionRepository},
};
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn create(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, SubscriptionError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, SubscriptionError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, SubscriptionError>;

    async fn update(
        &self,
        id: Uuid,
        patch: SubscriptionUpdate,
    ) -> Result<Subscription, SubscriptionError>;

    async fn delete(&self, id: Uuid) -> Result<(), SubscriptionError>;

    async fn total_price(&self, filter: TotalPriceFilter) -> Result<i64, SubscriptionError>;
}

/// Validates and persists subscriptions through a [`SubscriptionRepository`].
///
/// Updates are read, merged and written back without any lock, so two
/// concurrent updates of one subscription resolve as last write wins.
#[derive(Clone)]
pub struct Subscriptions {
    repository: Arc<dyn SubscriptionRepository>,
}

impl Subscriptions {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SubscriptionService for Subscriptions {
    #[tracing::instrument(
        name = "Creating a subscription",
        skip(self, new_subscription),
        fields(user_id = %new_subscription.user_id, service_name = %new_subscription.service_name)
    )]
    async fn create(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<Subscription, SubscriptionError> {
        let subscription =
            Subscription::from_new(new_subscription, Uuid::new_v4(), OffsetDateTime::now_utc());
        subscription.validate()?;

        Ok(self.repository.create(&subscription).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, SubscriptionError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, SubscriptionError> {
        Ok(self.repository.list_by_user(user_id).await?)
    }

    #[tracing::instrument(name = "Updating a subscription", skip(self, patch))]
    async fn update(
        &self,
        id: Uuid,
        patch: SubscriptionUpdate,
    ) -> Result<Subscription, SubscriptionError> {
        let mut subscription = self.repository.get_by_id(id).await?;
        subscription.apply_update(patch);
        subscription.validate()?;
        subscription.updated_at = OffsetDateTime::now_utc();

        Ok(self.repository.update(&subscription).await?)
    }

    #[tracing::instrument(name = "Deleting a subscription", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), SubscriptionError> {
        Ok(self.repository.delete(id).await?)
    }

    async fn total_price(&self, filter: TotalPriceFilter) -> Result<i64, SubscriptionError> {
        Ok(self.repository.total_price(&filter).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("subscription not found")]
    NotFound(Uuid),
    #[error("Something went wrong")]
    UnexpectedError(#[source] anyhow::Error),
}

impl From<RepositoryError> for SubscriptionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            RepositoryError::UnexpectedError(e) => Self::UnexpectedError(e),
        }
    }
}
