use super::{MonthYear, NewSubscription, SubscriptionUpdate, ValidationError};
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Subscription {
    pub fn from_new(new_subscription: NewSubscription, id: Uuid, now: OffsetDateTime) -> Self {
        Self {
            id,
            service_name: new_subscription.service_name,
            price: new_subscription.price,
            user_id: new_subscription.user_id,
            start_date: new_subscription.start_date,
            end_date: new_subscription.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.end_date {
            Some(end_date) if end_date < self.start_date => Err(ValidationError::InvalidRange),
            _ if self.price < 0 => Err(ValidationError::InvalidPrice),
            _ if self.service_name.trim().is_empty() => Err(ValidationError::EmptyServiceName),
            _ => Ok(()),
        }
    }

    /// Merges `patch` into this subscription. Identity, owner and timestamps are
    /// never touched here.
    pub fn apply_update(&mut self, patch: SubscriptionUpdate) {
        if let Some(service_name) = patch.service_name {
            self.service_name = service_name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        self.end_date = patch.end_date;
    }
}
