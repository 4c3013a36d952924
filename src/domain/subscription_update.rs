use super::MonthYear;
use serde::Deserialize;

/// Sparse patch for an existing subscription.
///
/// Missing fields leave the stored value alone, except `end_date`: it is always
/// taken from the patch, so omitting it (or sending `null`) clears the end date.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub start_date: Option<MonthYear>,
    #[serde(default)]
    pub end_date: Option<MonthYear>,
}
