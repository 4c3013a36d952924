use super::MonthYear;
use serde::Deserialize;
use uuid::Uuid;

/// Body of a create request. Identity and timestamps are assigned server-side.
#[derive(Clone, Debug, Deserialize)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    #[serde(default)]
    pub end_date: Option<MonthYear>,
}
