use super::{RepositoryError, SubscriptionRepository};
use crate::domain::{Subscription, TotalPriceFilter};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresSubscriptionRepository {
    db_pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    #[tracing::instrument(
        name = "Saving new subscription in the database",
        skip(self, subscription),
        fields(subscription_id = %subscription.id)
    )]
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
        let saved = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions
                (id, service_name, price, user_id, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(subscription.id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(subscription.start_date.to_storage())
        .bind(subscription.end_date.map(|date| date.to_storage()))
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert new subscription")?;

        Ok(saved)
    }

    #[tracing::instrument(name = "Fetching subscription by id", skip(self))]
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Failed to fetch subscription")?
        .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(name = "Fetching subscriptions of a user", skip(self))]
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to fetch subscriptions of a user")?;

        Ok(subscriptions)
    }

    #[tracing::instrument(
        name = "Saving updated subscription in the database",
        skip(self, subscription),
        fields(subscription_id = %subscription.id)
    )]
    async fn update(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions
            SET service_name = $2, price = $3, start_date = $4, end_date = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(subscription.id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.start_date.to_storage())
        .bind(subscription.end_date.map(|date| date.to_storage()))
        .bind(subscription.updated_at)
        .fetch_optional(&self.db_pool)
        .await
        .context("Failed to update subscription")?
        .ok_or(RepositoryError::NotFound(subscription.id))
    }

    #[tracing::instrument(name = "Deleting subscription", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM subscriptions WHERE id = $1"#)
            .bind(id)
            .execute(&self.db_pool)
            .await
            .context("Failed to delete subscription")?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }

    #[tracing::instrument(name = "Summing subscription prices", skip(self))]
    async fn total_price(&self, filter: &TotalPriceFilter) -> Result<i64, RepositoryError> {
        let mut query = total_price_query(filter);

        let total = query
            .build_query_scalar::<Option<i64>>()
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to sum subscription prices")?;

        Ok(total.unwrap_or(0))
    }
}

fn total_price_query(filter: &TotalPriceFilter) -> QueryBuilder<'static, Postgres> {
    let mut query =
        QueryBuilder::new("SELECT SUM(price)::BIGINT FROM subscriptions WHERE user_id = ");
    query.push_bind(filter.user_id);

    if let Some(service_name) = &filter.service_name {
        query
            .push(" AND service_name = ")
            .push_bind(service_name.clone());
    }
    if let Some(from) = filter.from {
        query.push(" AND start_date >= ").push_bind(from.to_storage());
    }
    if let Some(to) = filter.to {
        query.push(" AND start_date <= ").push_bind(to.to_storage());
    }

    query
}
