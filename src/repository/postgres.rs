use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};

use crate::domain::filter::NormalizedFilter;
use crate::domain::month::Month;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::service_name::ServiceName;
use crate::domain::subscription::Subscription;
use crate::domain::subscription_cost::SubscriptionCost;
use crate::repository::{StorageError, SubscriptionRepository};

const SELECT_SUBSCRIPTIONS: &str = r#"
    SELECT id, user_id, service_name, cost, start_date, end_date
    FROM subscriptions
    WHERE true
"#;

pub struct PgSubscriptionRepository {
    db_pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[tracing::instrument(
        name = "Insert a new subscription into the database",
        skip(self, subscription),
        fields(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name.as_ref()
        )
    )]
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, service_name, cost, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, service_name, cost, start_date, end_date
            "#,
        )
        .bind(subscription.user_id)
        .bind(subscription.service_name.as_ref())
        .bind(subscription.cost.value())
        .bind(subscription.date_from.as_date())
        .bind(subscription.date_to.map(|month| month.as_date()))
        .fetch_one(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(subscription_from_row(&row)?)
    }

    #[tracing::instrument(name = "Update a subscription in the database", skip(self, subscription))]
    async fn update(
        &self,
        id: i64,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, StorageError> {
        let row = sqlx::query(
            r#"
            UPDATE subscriptions
            SET user_id = $1, service_name = $2, cost = $3, start_date = $4, end_date = $5
            WHERE id = $6
            RETURNING id, user_id, service_name, cost, start_date, end_date
            "#,
        )
        .bind(subscription.user_id)
        .bind(subscription.service_name.as_ref())
        .bind(subscription.cost.value())
        .bind(subscription.date_from.as_date())
        .bind(subscription.date_to.map(|month| month.as_date()))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.as_ref().map(subscription_from_row).transpose()?)
    }

    #[tracing::instrument(name = "Delete a subscription from the database", skip(self))]
    async fn delete(&self, id: i64) -> Result<Option<Subscription>, StorageError> {
        let row = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE id = $1
            RETURNING id, user_id, service_name, cost, start_date, end_date
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.as_ref().map(subscription_from_row).transpose()?)
    }

    #[tracing::instrument(name = "Get a subscription by id", skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, service_name, cost, start_date, end_date
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.as_ref().map(subscription_from_row).transpose()?)
    }

    #[tracing::instrument(name = "List subscriptions matching a filter", skip(self))]
    async fn list_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_SUBSCRIPTIONS);

        push_predicates(&mut query, filter);

        query.push(" ORDER BY start_date, service_name COLLATE \"C\", id LIMIT ");
        query.push_bind(filter.pagination.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.pagination.offset);

        let rows = query.build().fetch_all(&self.db_pool).await?;

        Ok(rows
            .iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[tracing::instrument(name = "Fetch every subscription matching a filter", skip(self))]
    async fn fetch_matching(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<Vec<Subscription>, StorageError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_SUBSCRIPTIONS);

        push_predicates(&mut query, filter);

        let rows = query.build().fetch_all(&self.db_pool).await?;

        Ok(rows
            .iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, filter: &NormalizedFilter) {
    if let Some(period) = filter.period {
        if let Some(to) = period.to {
            query.push(" AND start_date <= ");
            query.push_bind(to.as_date());
        }

        query.push(" AND (end_date IS NULL OR end_date >= ");
        query.push_bind(period.from.as_date());
        query.push(")");
    }

    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ");
        query.push_bind(user_id);
    }

    if let Some(service_name) = &filter.service_name {
        query.push(" AND service_name = ");
        query.push_bind(service_name.clone());
    }
}

fn subscription_from_row(row: &PgRow) -> Result<Subscription, sqlx::Error> {
    let service_name = ServiceName::parse(row.try_get("service_name")?)
        .map_err(|err| sqlx::Error::Decode(err.into()))?;
    let cost = SubscriptionCost::parse(row.try_get("cost")?)
        .map_err(|err| sqlx::Error::Decode(err.into()))?;
    let date_from: NaiveDate = row.try_get("start_date")?;
    let date_to: Option<NaiveDate> = row.try_get("end_date")?;

    Ok(Subscription {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        service_name,
        cost,
        date_from: Month::from_date(date_from),
        date_to: date_to.map(Month::from_date),
    })
}
