mod month_year;
mod new_subscription;
mod subscription;
mod subscription_update;
mod total_price_filter;
mod validation_error;

pub use month_year::{MonthYear, MonthYearError, StoredDate};
pub use new_subscription::NewSubscription;
pub use subscription::Subscription;
pub use subscription_update::SubscriptionUpdate;
pub use total_price_filter::TotalPriceFilter;
pub use validation_error::ValidationError;
