use std::sync::Arc;

use crate::domain::cost::total_cost;
use crate::domain::error::ValidationError;
use crate::domain::filter::SubscriptionFilter;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::period::BillingWindow;
use crate::domain::subscription::Subscription;
use crate::repository::{StorageError, SubscriptionRepository};

/// Subscription use cases on top of a record store.
#[derive(Clone)]
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepository>,
}

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
    #[error("invalid id")]
    InvalidId,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("subscription not found")]
    NotFound,
    #[error("Accept application/json only")]
    NotAcceptable,
    #[error("Failed to access the subscription store.")]
    Storage(#[source] StorageError),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)?;

        if let SubscriptionError::Storage(err) = self {
            write!(f, "\n{:?}", err)?;
        }

        Ok(())
    }
}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!("Rejected request: {}", err);

        match err {
            ValidationError::InvalidPeriod(reason) => SubscriptionError::InvalidPeriod(reason),
            ValidationError::InvalidPagination(reason) => {
                SubscriptionError::InvalidPagination(reason)
            }
            ValidationError::InvalidSubscription(reason) => {
                SubscriptionError::InvalidSubscription(reason)
            }
        }
    }
}

impl From<StorageError> for SubscriptionError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Subscription store failed: {:?}", err);
        SubscriptionError::Storage(err)
    }
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "Register a subscription", skip(self, subscription))]
    pub async fn register(
        &self,
        subscription: NewSubscription,
    ) -> Result<Subscription, SubscriptionError> {
        Ok(self.repository.insert(&subscription).await?)
    }

    #[tracing::instrument(name = "Replace a subscription", skip(self, subscription))]
    pub async fn update(
        &self,
        id: i64,
        subscription: NewSubscription,
    ) -> Result<Subscription, SubscriptionError> {
        ensure_valid_id(id)?;

        self.repository
            .update(id, &subscription)
            .await?
            .ok_or(SubscriptionError::NotFound)
    }

    #[tracing::instrument(name = "Delete a subscription", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Subscription, SubscriptionError> {
        ensure_valid_id(id)?;

        self.repository
            .delete(id)
            .await?
            .ok_or(SubscriptionError::NotFound)
    }

    #[tracing::instrument(name = "Get a subscription", skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Subscription, SubscriptionError> {
        ensure_valid_id(id)?;

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SubscriptionError::NotFound)
    }

    /// One page of subscriptions matching `filter`.
    #[tracing::instrument(name = "List subscriptions by filter", skip(self))]
    pub async fn list_by_filter(
        &self,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let filter = filter.normalize()?;

        Ok(self.repository.list_matching(&filter).await?)
    }

    /// Prorated cost of every subscription matching `filter`.
    ///
    /// The period must have both bounds. Pagination in `filter` is ignored.
    #[tracing::instrument(name = "Total cost by filter", skip(self))]
    pub async fn total_cost_by_filter(
        &self,
        filter: &SubscriptionFilter,
    ) -> Result<i64, SubscriptionError> {
        let filter = filter.normalize()?;
        let window = BillingWindow::from_period(filter.period.as_ref())?;
        let subscriptions = self.repository.fetch_matching(&filter).await?;
        let total = total_cost(&subscriptions, &window);

        tracing::debug!(
            matched = subscriptions.len(),
            months = window.months(),
            total,
            "Computed subscriptions cost"
        );

        Ok(total)
    }
}

fn ensure_valid_id(id: i64) -> Result<(), SubscriptionError> {
    if id <= 0 {
        return Err(SubscriptionError::InvalidId);
    }

    Ok(())
}
