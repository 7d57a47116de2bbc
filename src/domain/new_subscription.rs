use serde::Deserialize;
use uuid::Uuid;

use crate::domain::error::ValidationError;
use crate::domain::month::Month;
use crate::domain::service_name::ServiceName;
use crate::domain::subscription_cost::SubscriptionCost;

/// A validated subscription ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub cost: SubscriptionCost,
    pub date_from: Month,
    pub date_to: Option<Month>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionBody {
    pub service_name: String,
    pub cost: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl NewSubscription {
    pub fn parse(
        user_id: Uuid,
        service_name: String,
        cost: i64,
        date_from: Month,
        date_to: Option<Month>,
    ) -> Result<NewSubscription, ValidationError> {
        let service_name =
            ServiceName::parse(service_name).map_err(ValidationError::InvalidSubscription)?;
        let cost = SubscriptionCost::parse(cost).map_err(ValidationError::InvalidSubscription)?;

        if user_id.is_nil() {
            return Err(ValidationError::InvalidSubscription(String::from(
                "empty user_id",
            )));
        }

        if let Some(date_to) = date_to {
            if date_to < date_from {
                return Err(ValidationError::InvalidPeriod(String::from(
                    "end_date before start_date",
                )));
            }
        }

        Ok(NewSubscription {
            user_id,
            service_name,
            cost,
            date_from,
            date_to,
        })
    }
}

impl TryFrom<SubscriptionBody> for NewSubscription {
    type Error = ValidationError;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(body.user_id.trim()).map_err(|_| {
            ValidationError::InvalidSubscription(format!("{} is not a valid user_id", body.user_id))
        })?;
        let date_from = Month::parse(&body.start_date)
            .map_err(|_| ValidationError::InvalidPeriod(String::from("date from")))?;
        let date_to = match body.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Month::parse(raw)
                    .map_err(|_| ValidationError::InvalidPeriod(String::from("date to")))?,
            ),
        };

        NewSubscription::parse(user_id, body.service_name, body.cost, date_from, date_to)
    }
}
