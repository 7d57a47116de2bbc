use uuid::Uuid;

use crate::domain::month::Month;
use crate::domain::service_name::ServiceName;
use crate::domain::subscription_cost::SubscriptionCost;

/// A stored subscription. `date_to` of `None` means it is still active.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub cost: SubscriptionCost,
    #[serde(rename = "start_date")]
    pub date_from: Month,
    #[serde(rename = "end_date", skip_serializing_if = "Option::is_none")]
    pub date_to: Option<Month>,
}
