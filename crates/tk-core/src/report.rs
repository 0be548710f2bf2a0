//! Monthly report types and hour arithmetic.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{Month, Year};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Selects which closed sessions a report covers.
///
/// Without a year, `month` matches that month in every year on record.
/// Data from different years is then summed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub month: Month,
    pub year: Option<Year>,
}

impl ReportQuery {
    /// A query for `month` across all years.
    pub const fn month(month: Month) -> Self {
        Self { month, year: None }
    }

    /// Restricts the query to a single year.
    #[must_use]
    pub const fn in_year(self, year: Year) -> Self {
        Self {
            month: self.month,
            year: Some(year),
        }
    }
}

/// Total hours recorded under one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelHours {
    pub label: String,
    pub hours: f64,
}

impl LabelHours {
    /// Groups `(label, hours)` pairs by label and sums each group.
    ///
    /// Rows come back ordered by label.
    pub fn sum_by_label<I, S>(intervals: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (label, hours) in intervals {
            *totals.entry(label.into()).or_insert(0.0) += hours;
        }
        totals
            .into_iter()
            .map(|(label, hours)| Self { label, hours })
            .collect()
    }
}

/// Exact elapsed time between two wall-clock timestamps, in fractional hours.
///
/// Microsecond precision; negative if `end` precedes `start`.
#[expect(
    clippy::cast_precision_loss,
    reason = "sub-microsecond error is far below the two decimals we print"
)]
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    let seconds = delta.num_microseconds().map_or_else(
        || delta.num_seconds() as f64,
        |micros| micros as f64 / 1_000_000.0,
    );
    seconds / SECONDS_PER_HOUR
}
