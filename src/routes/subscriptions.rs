use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::filter::{RawPeriod, SubscriptionFilter};
use crate::domain::month::Month;
use crate::domain::new_subscription::{NewSubscription, SubscriptionBody};
use crate::routes::require_accept_json;
use crate::service::{SubscriptionError, SubscriptionService};

/// Query string shared by the listing and cost endpoints. Empty values count as absent.
#[derive(Deserialize, Debug, Default)]
pub struct SubscriptionQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<SubscriptionQuery> for SubscriptionFilter {
    type Error = SubscriptionError;

    fn try_from(query: SubscriptionQuery) -> Result<Self, Self::Error> {
        let user_id = non_empty(query.user_id)
            .map(|raw| {
                Uuid::parse_str(&raw).map_err(|_| {
                    SubscriptionError::InvalidRequest(format!("{} is not a valid user_id", raw))
                })
            })
            .transpose()?;
        let limit = parse_integer("limit", query.limit)?;
        let offset = parse_integer("offset", query.offset)?;
        let from = parse_month("start_date", query.start_date)?;
        let to = parse_month("end_date", query.end_date)?;
        let period = if from.is_some() || to.is_some() {
            Some(RawPeriod {
                from: from.map(|month| month.as_date()),
                to: to.map(|month| month.as_date()),
            })
        } else {
            None
        };

        Ok(SubscriptionFilter {
            user_id,
            service_name: non_empty(query.service_name),
            period,
            limit,
            offset,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_integer(name: &str, value: Option<String>) -> Result<Option<i64>, SubscriptionError> {
    non_empty(value)
        .map(|raw| {
            raw.parse::<i64>().map_err(|_| {
                SubscriptionError::InvalidRequest(format!("{} must be an integer", name))
            })
        })
        .transpose()
}

fn parse_month(name: &str, value: Option<String>) -> Result<Option<Month>, SubscriptionError> {
    non_empty(value)
        .map(|raw| {
            Month::parse(&raw)
                .map_err(|err| SubscriptionError::InvalidPeriod(format!("{}: {}", name, err)))
        })
        .transpose()
}

#[tracing::instrument(name = "List subscriptions handler", skip(request, service))]
pub async fn handle_list_subscriptions(
    request: HttpRequest,
    query: web::Query<SubscriptionQuery>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let filter: SubscriptionFilter = query.into_inner().try_into()?;
    let subscriptions = service.list_by_filter(&filter).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[tracing::instrument(
    name = "Creating a new subscription handler",
    skip(request, body, service),
    fields(
        user_id = %body.user_id,
        service_name = %body.service_name
    )
)]
pub async fn handle_create_subscription(
    request: HttpRequest,
    body: web::Json<SubscriptionBody>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let new_subscription: NewSubscription = body.into_inner().try_into()?;
    let subscription = service.register(new_subscription).await?;

    Ok(HttpResponse::Created().json(subscription))
}
