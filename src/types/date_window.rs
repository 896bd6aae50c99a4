//! Defines [`DateWindow`], the inclusive date range one pager run is scoped to.

use chrono::NaiveDate;
use std::fmt;

/// An inclusive `(start, end)` pair of dates.
///
/// Windows are produced by the year-chunker and consumed by the pager, which
/// substitutes them for the `startdate`/`enddate` query parameters.
///
/// # Examples
///
/// ```
/// use noaa_cdo::DateWindow;
/// use chrono::NaiveDate;
///
/// let window = DateWindow::new(
///     NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
/// );
/// assert_eq!(window.span_days(), 151);
/// assert_eq!(window.to_string(), "2010-01-01..2010-06-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days between `start` and `end`.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
