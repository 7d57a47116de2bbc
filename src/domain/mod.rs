pub mod cost;
pub mod error;
pub mod filter;
pub mod month;
pub mod new_subscription;
pub mod period;
pub mod service_name;
pub mod subscription;
pub mod subscription_cost;
