use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::filter::NormalizedFilter;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::subscription::Subscription;
use crate::repository::{StorageError, SubscriptionRepository};

/// Process-local store with the same filtering and ordering rules as Postgres.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    subscriptions: Vec<Subscription>,
    last_id: i64,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let last_id = subscriptions.iter().map(|s| s.id).max().unwrap_or(0);

        Self {
            state: Mutex::new(State {
                subscriptions,
                last_id,
            }),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Unavailable(String::from("state lock is poisoned")))
    }
}

fn build(id: i64, subscription: &NewSubscription) -> Subscription {
    Subscription {
        id,
        user_id: subscription.user_id,
        service_name: subscription.service_name.clone(),
        cost: subscription.cost,
        date_from: subscription.date_from,
        date_to: subscription.date_to,
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription, StorageError> {
        let mut state = self.state()?;

        state.last_id += 1;

        let stored = build(state.last_id, subscription);
        state.subscriptions.push(stored.clone());

        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, StorageError> {
        let mut state = self.state()?;

        Ok(state
            .subscriptions
            .iter_mut()
            .find(|existing| existing.id == id)
            .map(|existing| {
                *existing = build(id, subscription);
                existing.clone()
            }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Subscription>, StorageError> {
        let mut state = self.state()?;
        let position = state.subscriptions.iter().position(|s| s.id == id);

        Ok(position.map(|index| state.subscriptions.remove(index)))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, StorageError> {
        let state = self.state()?;

        Ok(state.subscriptions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError> {
        let mut matching = self.fetch_matching(filter).await?;
        let offset = usize::try_from(filter.pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.pagination.limit).unwrap_or(usize::MAX);

        matching.sort_by(|a, b| {
            (a.date_from, &a.service_name, a.id).cmp(&(b.date_from, &b.service_name, b.id))
        });

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn fetch_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError> {
        let state = self.state()?;

        Ok(state
            .subscriptions
            .iter()
            .filter(|subscription| filter.matches(subscription))
            .cloned()
            .collect())
    }
}
