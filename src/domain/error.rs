/// Validation failures raised while turning caller input into domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
}
