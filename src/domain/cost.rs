//! Prorated cost of subscriptions over a billing window.
//!
//! A subscription is charged its monthly cost once for every calendar month
//! in which it is active inside the window. Both ends of the subscription
//! and of the window are inclusive, and an open-ended subscription is
//! billed through the end of the window.

use std::cmp::{max, min};

use crate::domain::month::Month;
use crate::domain::period::BillingWindow;
use crate::domain::subscription::Subscription;

/// Months of `subscription` that fall inside `window`, as an inclusive range.
///
/// `None` when the two do not overlap.
pub fn billable_months(
    subscription: &Subscription,
    window: &BillingWindow,
) -> Option<(Month, Month)> {
    let overlaps = subscription.date_from <= window.to()
        && subscription
            .date_to
            .map_or(true, |date_to| date_to >= window.from());

    if !overlaps {
        return None;
    }

    let effective_from = max(subscription.date_from, window.from());
    let effective_to = min(subscription.date_to.unwrap_or(window.to()), window.to());

    if effective_from > effective_to {
        return None;
    }

    Some((effective_from, effective_to))
}

/// Cost charged for one subscription inside `window`.
pub fn contribution(subscription: &Subscription, window: &BillingWindow) -> i64 {
    billable_months(subscription, window).map_or(0, |(from, to)| {
        subscription.cost.value() * from.months_through(&to)
    })
}

/// Sum of every subscription's contribution. Order does not matter.
pub fn total_cost<'a, I>(subscriptions: I, window: &BillingWindow) -> i64
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .map(|subscription| contribution(subscription, window))
        .sum()
}
