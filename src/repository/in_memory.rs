use super::{RepositoryError, SubscriptionRepository};
use crate::domain::{Subscription, TotalPriceFilter};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Process-local repository, for running without a database.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Arc<Mutex<HashMap<Uuid, Subscription>>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscriptions.lock().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.contains_key(&subscription.id) {
            return Err(anyhow::anyhow!("Subscription `{}` already exists", subscription.id).into());
        }

        subscriptions.insert(subscription.id, subscription.clone());
        Ok(subscription.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        self.subscriptions
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self
            .subscriptions
            .lock()
            .await
            .values()
            .filter(|subscription| subscription.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
        match self.subscriptions.lock().await.get_mut(&subscription.id) {
            Some(stored) => {
                stored.service_name = subscription.service_name.clone();
                stored.price = subscription.price;
                stored.start_date = subscription.start_date;
                stored.end_date = subscription.end_date;
                stored.updated_at = subscription.updated_at;
                Ok(stored.clone())
            }
            None => Err(RepositoryError::NotFound(subscription.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.subscriptions
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn total_price(&self, filter: &TotalPriceFilter) -> Result<i64, RepositoryError> {
        Ok(self
            .subscriptions
            .lock()
            .await
            .values()
            .filter(|subscription| filter.matches(subscription))
            .map(|subscription| subscription.price)
            .sum())
    }
}
