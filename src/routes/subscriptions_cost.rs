use actix_web::{web, HttpRequest, HttpResponse};

use crate::domain::filter::SubscriptionFilter;
use crate::routes::{require_accept_json, SubscriptionQuery};
use crate::service::{SubscriptionError, SubscriptionService};

#[derive(serde::Serialize)]
struct CostResponse {
    total: i64,
}

/// Total prorated cost; `start_date` and `end_date` are both required.
#[tracing::instrument(name = "Subscriptions cost handler", skip(request, service))]
pub async fn handle_subscriptions_cost(
    request: HttpRequest,
    query: web::Query<SubscriptionQuery>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let filter: SubscriptionFilter = query.into_inner().try_into()?;
    let total = service.total_cost_by_filter(&filter).await?;

    Ok(HttpResponse::Ok().json(CostResponse { total }))
}
