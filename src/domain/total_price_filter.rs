use super::{MonthYear, Subscription};
use uuid::Uuid;

/// Predicates for summing a user's subscription prices.
///
/// Every bound is optional; the ones present are combined with AND.
#[derive(Clone, Debug, PartialEq)]
pub struct TotalPriceFilter {
    pub user_id: Uuid,
    pub service_name: Option<String>,
    pub from: Option<MonthYear>,
    pub to: Option<MonthYear>,
}

impl TotalPriceFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            service_name: None,
            from: None,
            to: None,
        }
    }

    /// An empty name means "any service".
    pub fn service_name(mut self, service_name: Option<String>) -> Self {
        self.service_name = service_name.filter(|name| !name.is_empty());
        self
    }

    pub fn starting_from(mut self, from: Option<MonthYear>) -> Self {
        self.from = from;
        self
    }

    pub fn up_to(mut self, to: Option<MonthYear>) -> Self {
        self.to = to;
        self
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        subscription.user_id == self.user_id
            && self
                .service_name
                .as_ref()
                .map_or(true, |name| &subscription.service_name == name)
            && self.from.map_or(true, |from| subscription.start_date >= from)
            && self.to.map_or(true, |to| subscription.start_date <= to)
    }
}
