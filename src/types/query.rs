//! The query sent to the CDO `data` endpoint.

use crate::config::{ConfigError, DEFAULT_PAGE_SIZE};
use crate::types::date_window::DateWindow;
use bon::bon;
use chrono::NaiveDate;

/// Date format the CDO API expects for `startdate` and `enddate`.
const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a single CDO `data` request.
///
/// The value is never mutated during a traversal. The pager derives a fresh copy
/// per window ([`QueryParameters::for_window`]) and per page
/// ([`QueryParameters::at_page`]), so `offset` is always a multiple of `limit`.
///
/// Construct it with the validating builder:
///
/// ```
/// use noaa_cdo::QueryParameters;
/// use chrono::NaiveDate;
///
/// let query = QueryParameters::builder()
///     .dataset_id("GSOM")
///     .location_id("ZIP:80435")
///     .start_date(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(query.limit(), 1000);
/// assert_eq!(query.offset(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    dataset_id: String,
    location_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    limit: u32,
    offset: u32,
}

#[bon]
impl QueryParameters {
    /// Builds validated query parameters.
    ///
    /// * `.dataset_id(..)`: **Required.** CDO dataset, e.g. `GSOM` or `GHCND`.
    /// * `.location_id(..)`: **Required.** CDO location, e.g. `ZIP:80435` or `FIPS:08`.
    /// * `.start_date(NaiveDate)` / `.end_date(NaiveDate)`: **Required.** Inclusive range.
    /// * `.limit(u32)`: Optional page size. Defaults to 1000.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDateRange`] if `start_date > end_date`, and
    /// [`ConfigError::InvalidPageSize`] if `limit` is zero.
    #[builder]
    pub fn new(
        #[builder(into)] dataset_id: String,
        #[builder(into)] location_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[builder(default = DEFAULT_PAGE_SIZE)] limit: u32,
    ) -> Result<Self, ConfigError> {
        if start_date > end_date {
            return Err(ConfigError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        if limit == 0 {
            return Err(ConfigError::InvalidPageSize(limit));
        }
        Ok(Self {
            dataset_id,
            location_id,
            start_date,
            end_date,
            limit,
            offset: 0,
        })
    }
}

impl QueryParameters {
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The full requested range as a window.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }

    /// Copy scoped to `window`, with the offset reset to zero.
    pub fn for_window(&self, window: DateWindow) -> Self {
        Self {
            start_date: window.start,
            end_date: window.end,
            offset: 0,
            ..self.clone()
        }
    }

    /// Copy positioned at page `index` (zero based): `offset = limit * index`.
    pub fn at_page(&self, index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        Self {
            offset: self.limit.saturating_mul(index),
            ..self.clone()
        }
    }

    /// URL parameters in the names the CDO API uses.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("datasetid", self.dataset_id.clone()),
            ("locationid", self.location_id.clone()),
            ("startdate", self.start_date.format(API_DATE_FORMAT).to_string()),
            ("enddate", self.end_date.format(API_DATE_FORMAT).to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// Monthly summaries for ZIP 80435 between 2013-10-06 and 2016-11-11.
impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            dataset_id: "GSOM".to_string(),
            location_id: "ZIP:80435".to_string(),
            start_date: NaiveDate::from_ymd_opt(2013, 10, 6).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap_or_default(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}
