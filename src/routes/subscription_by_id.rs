use actix_web::{web, HttpRequest, HttpResponse};

use crate::domain::new_subscription::{NewSubscription, SubscriptionBody};
use crate::routes::require_accept_json;
use crate::service::{SubscriptionError, SubscriptionService};

fn parse_id(raw: &str) -> Result<i64, SubscriptionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SubscriptionError::InvalidId)
}

#[tracing::instrument(name = "Get subscription handler", skip(request, service))]
pub async fn handle_get_subscription(
    request: HttpRequest,
    path: web::Path<String>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let id = parse_id(&path)?;
    let subscription = service.get_by_id(id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(
    name = "Replace subscription handler",
    skip(request, body, service),
    fields(
        user_id = %body.user_id,
        service_name = %body.service_name
    )
)]
pub async fn handle_update_subscription(
    request: HttpRequest,
    path: web::Path<String>,
    body: web::Json<SubscriptionBody>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let id = parse_id(&path)?;
    let replacement: NewSubscription = body.into_inner().try_into()?;
    let subscription = service.update(id, replacement).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(name = "Delete subscription handler", skip(request, service))]
pub async fn handle_delete_subscription(
    request: HttpRequest,
    path: web::Path<String>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    require_accept_json(&request)?;

    let id = parse_id(&path)?;
    let subscription = service.delete(id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}
