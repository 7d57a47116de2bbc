use actix_web::http::{header, Method, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Resource, ResponseError};

use crate::service::SubscriptionError;

mod health_check;
mod subscription_by_id;
mod subscriptions;
mod subscriptions_cost;

pub use health_check::health_check;
pub use subscription_by_id::{
    handle_delete_subscription, handle_get_subscription, handle_update_subscription,
};
pub use subscriptions::{handle_create_subscription, handle_list_subscriptions, SubscriptionQuery};
pub use subscriptions_cost::handle_subscriptions_cost;

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::InvalidPeriod(_)
            | SubscriptionError::InvalidPagination(_)
            | SubscriptionError::InvalidSubscription(_)
            | SubscriptionError::InvalidId
            | SubscriptionError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            SubscriptionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store failures are logged, never echoed to the client.
        let error = match self {
            SubscriptionError::Storage(_) => String::from("internal server error"),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

/// A JSON resource answering `OPTIONS` with 204 and any unrouted method with
/// a JSON 405. Both carry `allow` in the `Allow` header.
pub fn json_resource(path: &str, allow: &'static str) -> Resource {
    web::resource(path)
        .route(web::method(Method::OPTIONS).to(move || async move {
            HttpResponse::NoContent()
                .insert_header((header::ALLOW, allow))
                .finish()
        }))
        .default_service(web::to(move || async move {
            HttpResponse::MethodNotAllowed()
                .insert_header((header::ALLOW, allow))
                .json(ErrorBody {
                    error: String::from("method not allowed"),
                })
        }))
}

/// Rejects requests whose `Accept` header rules out a JSON answer.
pub fn require_accept_json(request: &HttpRequest) -> Result<(), SubscriptionError> {
    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if accepts_json(accept) {
        Ok(())
    } else {
        Err(SubscriptionError::NotAcceptable)
    }
}

fn accepts_json(accept: &str) -> bool {
    let accept = accept.trim();

    accept.is_empty()
        || accept.split(',').any(|part| {
            let media_type = part.split(';').next().unwrap_or("").trim();

            media_type == "application/json" || media_type == "*/*"
        })
}
