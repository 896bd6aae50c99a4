//! Splits long date ranges into year-long windows aligned to month ends.

use crate::config::DAYS_PER_YEAR_WINDOW;
use crate::types::date_window::DateWindow;
use crate::types::utils::month_end;
use chrono::{Datelike, NaiveDate};

/// Month-end dates every 12 months, starting at the first month end on or after
/// `start` and stopping at the last one not after `end`.
///
/// Each boundary falls on the last day of the same calendar month as `start`.
pub fn month_end_boundaries(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let month = start.month();
    let mut year = start.year();
    let mut boundaries = Vec::new();
    while let Some(boundary) = month_end(year, month) {
        if boundary > end {
            break;
        }
        boundaries.push(boundary);
        year += 1;
    }
    boundaries
}

/// Plans the windows a range is fetched in.
///
/// Ranges shorter than [`DAYS_PER_YEAR_WINDOW`] days come back unchanged as a single
/// window. Longer ranges are cut at [`month_end_boundaries`]; `start` and `end`
/// themselves are added as the outer boundaries when they are not month ends, so
/// the first and last windows may be shorter than a year. Neighbouring windows
/// share their boundary date.
///
/// # Examples
///
/// ```
/// use noaa_cdo::{year_windows, DateWindow};
/// use chrono::NaiveDate;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let windows = year_windows(d(2010, 1, 1), d(2012, 1, 1));
/// assert_eq!(
///     windows,
///     vec![
///         DateWindow::new(d(2010, 1, 1), d(2010, 1, 31)),
///         DateWindow::new(d(2010, 1, 31), d(2011, 1, 31)),
///         DateWindow::new(d(2011, 1, 31), d(2012, 1, 1)),
///     ]
/// );
/// ```
pub fn year_windows(start: NaiveDate, end: NaiveDate) -> Vec<DateWindow> {
    if (end - start).num_days() < DAYS_PER_YEAR_WINDOW {
        return vec![DateWindow::new(start, end)];
    }

    let mut boundaries = month_end_boundaries(start, end);
    if boundaries.first() != Some(&start) {
        boundaries.insert(0, start);
    }
    if boundaries.last() != Some(&end) {
        boundaries.push(end);
    }

    boundaries
        .windows(2)
        .map(|pair| DateWindow::new(pair[0], pair[1]))
        .collect()
}
