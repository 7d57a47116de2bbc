use crate::domain::error::ValidationError;
use crate::domain::month::Month;

/// A query window. Both bounds are inclusive; an absent `to` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub from: Month,
    pub to: Option<Month>,
}

/// A period with both bounds present, as required by cost aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingWindow {
    from: Month,
    to: Month,
}

impl Period {
    /// Whether a subscription active over `date_from..=date_to` touches this period.
    pub fn overlaps(&self, date_from: Month, date_to: Option<Month>) -> bool {
        let starts_in_time = self.to.map_or(true, |to| date_from <= to);
        let ends_in_time = date_to.map_or(true, |date_to| date_to >= self.from);

        starts_in_time && ends_in_time
    }
}

impl BillingWindow {
    pub fn new(from: Month, to: Month) -> Result<BillingWindow, ValidationError> {
        if to < from {
            return Err(ValidationError::InvalidPeriod(String::from("to < from")));
        }

        Ok(Self { from, to })
    }

    /// Fails unless the period exists and is bounded on both sides.
    pub fn from_period(period: Option<&Period>) -> Result<BillingWindow, ValidationError> {
        let period = period
            .ok_or_else(|| ValidationError::InvalidPeriod(String::from("missing period")))?;
        let to = period
            .to
            .ok_or_else(|| ValidationError::InvalidPeriod(String::from("missing period end")))?;

        Self::new(period.from, to)
    }

    pub fn from(&self) -> Month {
        self.from
    }

    pub fn to(&self) -> Month {
        self.to
    }

    pub fn months(&self) -> i64 {
        self.from.months_through(&self.to)
    }
}
