//! The main entry point: fetches a whole date range from the CDO API into a [`Sink`].

use crate::config::{ApiToken, MAX_PAGES_PER_WINDOW};
use crate::error::NoaaError;
use crate::events::{FetchObserver, LogObserver};
use crate::requests::requester::{HttpRequester, Requester};
use crate::sinks::{Sink, SinkReport};
use crate::traversal::pager::{Pager, WindowEnd, WindowSummary};
use crate::traversal::year_chunker::year_windows;
use crate::types::date_window::DateWindow;
use crate::types::query::QueryParameters;

/// Per-window results of a [`NoaaClient::get_data`] run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchSummary {
    pub windows: Vec<WindowSummary>,
}

impl FetchSummary {
    pub fn requests(&self) -> usize {
        self.windows.iter().map(|w| w.requests).sum()
    }

    pub fn records(&self) -> usize {
        self.windows.iter().map(|w| w.records).sum()
    }

    pub fn report(&self) -> SinkReport {
        let mut total = SinkReport::default();
        for window in &self.windows {
            total += window.report;
        }
        total
    }

    /// Windows that stopped at the page cap instead of running out of records.
    pub fn capped_windows(&self) -> Vec<DateWindow> {
        self.windows
            .iter()
            .filter(|w| w.end == WindowEnd::PageCap)
            .map(|w| w.window)
            .collect()
    }
}

/// Client for the CDO `data` endpoint.
///
/// A range of a year or more is split into year-long windows (see
/// [`year_windows`]); each window is paged through in `limit`-sized steps and
/// every page is handed to the sink as it arrives.
///
/// # Examples
///
/// ```no_run
/// use noaa_cdo::{NoaaClient, NoaaError, QueryParameters, SinkConfig};
/// use chrono::NaiveDate;
///
/// # fn main() -> Result<(), NoaaError> {
/// let client = NoaaClient::from_env()?;
/// let query = QueryParameters::builder()
///     .dataset_id("GSOM")
///     .location_id("ZIP:80435")
///     .start_date(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
///     .build()?;
///
/// let mut sink = SinkConfig::default_document()?.open()?;
/// let summary = client.get_data(&query, sink.as_mut())?;
/// println!("{} records in {} requests", summary.records(), summary.requests());
/// # Ok(())
/// # }
/// ```
pub struct NoaaClient<R = HttpRequester> {
    requester: R,
    observer: Box<dyn FetchObserver>,
    max_pages: usize,
}

impl NoaaClient<HttpRequester> {
    /// A client talking to the public CDO endpoint with `token`.
    pub fn new(token: &ApiToken) -> Result<Self, NoaaError> {
        Ok(Self::with_requester(HttpRequester::new(token)?))
    }

    /// Like [`NoaaClient::new`], with the token read from `NOAA_API_KEY`.
    pub fn from_env() -> Result<Self, NoaaError> {
        Self::new(&ApiToken::from_env()?)
    }
}

impl<R: Requester> NoaaClient<R> {
    pub fn with_requester(requester: R) -> Self {
        Self {
            requester,
            observer: Box::new(LogObserver),
            max_pages: MAX_PAGES_PER_WINDOW,
        }
    }

    /// Replaces the default [`LogObserver`].
    pub fn with_observer(mut self, observer: impl FetchObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// The windows [`NoaaClient::get_data`] would fetch `query` in.
    pub fn plan(&self, query: &QueryParameters) -> Vec<DateWindow> {
        year_windows(query.start_date(), query.end_date())
    }

    /// Fetches every record matching `query` into `sink`, window by window.
    ///
    /// # Errors
    ///
    /// Stops at the first transport failure ([`NoaaError::Fetch`]) or storage
    /// failure ([`NoaaError::Sink`]). Rejected responses, unparsable bodies and
    /// duplicate records are not errors; they show up in the summary.
    pub fn get_data(
        &self,
        query: &QueryParameters,
        sink: &mut dyn Sink,
    ) -> Result<FetchSummary, NoaaError> {
        let pager = Pager::new(&self.requester, self.observer.as_ref()).with_max_pages(self.max_pages);
        let mut summary = FetchSummary::default();
        for window in self.plan(query) {
            summary.windows.push(pager.run(query, window, sink)?);
        }
        Ok(summary)
    }
}
