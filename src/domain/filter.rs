use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::error::ValidationError;
use crate::domain::month::Month;
use crate::domain::period::Period;
use crate::domain::subscription::Subscription;

/// Page size used when the caller asks for none (or for a non-positive one).
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Larger page sizes are clamped down to this value.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Period bounds exactly as the caller provided them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPeriod {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// A filter as received from the caller, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub period: Option<RawPeriod>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

/// A filter safe to hand to the record store and to the cost aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub period: Option<Period>,
    pub pagination: Pagination,
}

impl SubscriptionFilter {
    pub fn normalize(&self) -> Result<NormalizedFilter, ValidationError> {
        let period = self.period.as_ref().map(normalize_period).transpose()?;
        let pagination = normalize_pagination(self.limit, self.offset)?;

        Ok(NormalizedFilter {
            user_id: self.user_id,
            service_name: self.service_name.clone(),
            period,
            pagination,
        })
    }
}

impl NormalizedFilter {
    /// Applies the user, service name and period predicates to one record.
    pub fn matches(&self, subscription: &Subscription) -> bool {
        let user_matches = self
            .user_id
            .map_or(true, |user_id| subscription.user_id == user_id);
        let service_matches = self
            .service_name
            .as_deref()
            .map_or(true, |name| subscription.service_name.as_ref() == name);
        let period_matches = self.period.map_or(true, |period| {
            period.overlaps(subscription.date_from, subscription.date_to)
        });

        user_matches && service_matches && period_matches
    }
}

fn normalize_period(raw: &RawPeriod) -> Result<Period, ValidationError> {
    let from = raw
        .from
        .map(Month::from_date)
        .ok_or_else(|| ValidationError::InvalidPeriod(String::from("empty period bound")))?;
    let to = raw.to.map(Month::from_date);

    if let Some(to) = to {
        if to < from {
            return Err(ValidationError::InvalidPeriod(String::from("to < from")));
        }
    }

    Ok(Period { from, to })
}

fn normalize_pagination(
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Pagination, ValidationError> {
    let offset = offset.unwrap_or(0);

    if offset < 0 {
        return Err(ValidationError::InvalidPagination(String::from(
            "offset must be >= 0",
        )));
    }

    let limit = match limit.unwrap_or(0) {
        limit if limit <= 0 => DEFAULT_PAGE_SIZE,
        limit if limit > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        limit => limit,
    };

    Ok(Pagination { limit, offset })
}
