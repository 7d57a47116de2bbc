use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DISPLAY_FORMAT: &str = "%m-%Y";

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Truncates any date to the first day of its month.
    pub fn from_date(date: NaiveDate) -> Month {
        // Day 1 exists in every month, so `with_day` cannot fail here.
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Month> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Accepts `MM-YYYY`, `YYYY-MM-DD` and `YYYY-MM`, tried in that order.
    pub fn parse(value: &str) -> Result<Month, String> {
        let value = value.trim();

        if value.is_empty() {
            return Err(String::from("empty date value"));
        }

        if let Some(month) = parse_month_year(value) {
            return Ok(month);
        }

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        if let Some(month) = parse_year_month(value) {
            return Ok(month);
        }

        Err(format!("{} is not a valid month", value))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    pub fn next(&self) -> Option<Month> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Number of calendar months from `self` to `until`, both ends included.
    ///
    /// Returns zero or a negative number when `until` is before `self`.
    pub fn months_through(&self, until: &Month) -> i64 {
        let years = i64::from(until.year()) - i64::from(self.year());
        let months = i64::from(until.month()) - i64::from(self.month());

        years * 12 + months + 1
    }
}

fn parse_month_year(value: &str) -> Option<Month> {
    let (month, year) = value.split_once('-')?;

    if month.len() != 2 || year.len() != 4 {
        return None;
    }

    Month::from_ym(year.parse().ok()?, month.parse().ok()?)
}

fn parse_year_month(value: &str) -> Option<Month> {
    let (year, month) = value.split_once('-')?;

    if year.len() != 4 || month.len() != 2 {
        return None;
    }

    Month::from_ym(year.parse().ok()?, month.parse().ok()?)
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Month::parse(&raw).map_err(serde::de::Error::custom)
    }
}
