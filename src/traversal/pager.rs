//! Pages through one date window.

use crate::config::MAX_PAGES_PER_WINDOW;
use crate::error::NoaaError;
use crate::events::{FetchEvent, FetchObserver};
use crate::requests::parser::parse_page;
use crate::requests::requester::Requester;
use crate::requests::validator::{classify, ResponseClass};
use crate::sinks::{Sink, SinkReport};
use crate::types::date_window::DateWindow;
use crate::types::query::QueryParameters;
use crate::types::record::Page;

/// How a window's page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    /// A short page, an empty response, or a record dated on the window's end.
    Exhausted,
    /// The page cap was reached first.
    PageCap,
}

/// What happened while paging through one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSummary {
    pub window: DateWindow,
    pub requests: usize,
    /// Responses handed to the sink.
    pub pages: usize,
    /// Responses skipped because of a bad status or an unexpected body.
    pub skipped: usize,
    pub records: usize,
    pub report: SinkReport,
    pub end: WindowEnd,
}

impl WindowSummary {
    fn new(window: DateWindow) -> Self {
        Self {
            window,
            requests: 0,
            pages: 0,
            skipped: 0,
            records: 0,
            report: SinkReport::default(),
            end: WindowEnd::PageCap,
        }
    }
}

/// Requests consecutive pages of a window until it is exhausted or the cap is hit.
///
/// Page `i` is requested at `offset = limit * i`. A response that is not a
/// success, other than an empty one, is skipped and the next offset requested;
/// failed offsets are never retried. Only transport and sink errors abort.
pub struct Pager<'a, R: ?Sized> {
    requester: &'a R,
    observer: &'a dyn FetchObserver,
    max_pages: usize,
}

impl<'a, R: Requester + ?Sized> Pager<'a, R> {
    pub fn new(requester: &'a R, observer: &'a dyn FetchObserver) -> Self {
        Self {
            requester,
            observer,
            max_pages: MAX_PAGES_PER_WINDOW,
        }
    }

    /// Overrides the page cap (normally [`MAX_PAGES_PER_WINDOW`]).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn run(
        &self,
        query: &QueryParameters,
        window: DateWindow,
        sink: &mut dyn Sink,
    ) -> Result<WindowSummary, NoaaError> {
        let scoped = query.for_window(window);
        let mut summary = WindowSummary::new(window);
        self.observer.on_event(&FetchEvent::WindowStarted { window });

        for index in 0..self.max_pages {
            let params = scoped.at_page(index);
            let offset = params.offset();
            let response = self.requester.get(&params)?;
            summary.requests += 1;

            let page = match classify(&response) {
                ResponseClass::Success => match parse_page(&response.body, offset) {
                    Ok(page) => page,
                    Err(e) => {
                        self.observer.on_event(&FetchEvent::ParseFailed {
                            window,
                            offset,
                            message: e.to_string(),
                        });
                        Page::empty(offset)
                    }
                },
                ResponseClass::Empty => {
                    self.observer.on_event(&FetchEvent::Rejected {
                        window,
                        offset,
                        class: ResponseClass::Empty,
                    });
                    summary.end = WindowEnd::Exhausted;
                    break;
                }
                class => {
                    self.observer.on_event(&FetchEvent::Rejected {
                        window,
                        offset,
                        class,
                    });
                    summary.skipped += 1;
                    continue;
                }
            };

            if !page.is_empty() {
                let report = sink.accept(&window, &page)?;
                summary.pages += 1;
                summary.records += page.len();
                summary.report += report;
                self.observer.on_event(&FetchEvent::PageStored {
                    window,
                    offset,
                    received: page.len(),
                    most_recent: page.most_recent_day(),
                    report,
                });
            }

            if page.completes_window(scoped.limit(), window.end) {
                summary.end = WindowEnd::Exhausted;
                break;
            }
        }

        match summary.end {
            WindowEnd::Exhausted => self.observer.on_event(&FetchEvent::WindowComplete {
                window,
                requests: summary.requests,
            }),
            WindowEnd::PageCap => self.observer.on_event(&FetchEvent::PageCapReached {
                window,
                requests: summary.requests,
            }),
        }
        sink.finish_window(&window)?;
        Ok(summary)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::requests::error::FetchError;
    use crate::requests::requester::RawResponse;
    use crate::sinks::error::SinkError;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned responses keyed by offset and records every query it sees.
    #[derive(Default)]
    pub(crate) struct ScriptedRequester {
        responses: HashMap<u32, RawResponse>,
        fallback: Option<RawResponse>,
        pub(crate) seen: RefCell<Vec<QueryParameters>>,
    }

    impl ScriptedRequester {
        pub(crate) fn respond(mut self, offset: u32, response: RawResponse) -> Self {
            self.responses.insert(offset, response);
            self
        }

        pub(crate) fn otherwise(mut self, response: RawResponse) -> Self {
            self.fallback = Some(response);
            self
        }

        pub(crate) fn offsets(&self) -> Vec<u32> {
            self.seen.borrow().iter().map(QueryParameters::offset).collect()
        }
    }

    impl Requester for ScriptedRequester {
        fn get(&self, params: &QueryParameters) -> Result<RawResponse, FetchError> {
            self.seen.borrow_mut().push(params.clone());
            Ok(self
                .responses
                .get(&params.offset())
                .or(self.fallback.as_ref())
                .cloned()
                .unwrap_or_else(|| RawResponse::new(StatusCode::OK, "{}")))
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) events: RefCell<Vec<FetchEvent>>,
    }

    impl FetchObserver for RecordingObserver {
        fn on_event(&self, event: &FetchEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    /// Keeps accepted pages in memory.
    #[derive(Default)]
    pub(crate) struct MemorySink {
        pub(crate) pages: Vec<Page>,
        pub(crate) finished: Vec<DateWindow>,
    }

    impl MemorySink {
        pub(crate) fn record_count(&self) -> usize {
            self.pages.iter().map(Page::len).sum()
        }
    }

    impl Sink for MemorySink {
        fn accept(&mut self, _window: &DateWindow, page: &Page) -> Result<SinkReport, SinkError> {
            self.pages.push(page.clone());
            Ok(SinkReport {
                inserted: page.len(),
                ..SinkReport::default()
            })
        }

        fn finish_window(&mut self, window: &DateWindow) -> Result<(), SinkError> {
            self.finished.push(*window);
            Ok(())
        }
    }

    /// A 200 response with `count` records dated from `first_day` onward, one per day.
    pub(crate) fn page_body(count: usize, first_day: chrono::NaiveDate) -> RawResponse {
        let results: Vec<_> = (0..count)
            .map(|i| {
                let day = first_day + chrono::Duration::days(i as i64 % 28);
                json!({
                    "date": format!("{}T00:00:00", day),
                    "datatype": format!("T{}", i),
                    "station": "GHCND:USC00051959",
                    "attributes": ",,,",
                    "value": i
                })
            })
            .collect();
        RawResponse::new(
            StatusCode::OK,
            json!({ "metadata": { "resultset": { "count": count } }, "results": results }).to_string(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(limit: u32) -> QueryParameters {
        QueryParameters::builder()
            .dataset_id("GSOM")
            .location_id("ZIP:80435")
            .start_date(date(2010, 1, 1))
            .end_date(date(2010, 6, 1))
            .limit(limit)
            .build()
            .unwrap()
    }

    #[test]
    fn test_stops_after_short_page() {
        // 25 records at 10 per page: ceil(25 / 10) = 3 requests.
        let requester = ScriptedRequester::default()
            .respond(0, page_body(10, date(2010, 1, 1)))
            .respond(10, page_body(10, date(2010, 2, 1)))
            .respond(20, page_body(5, date(2010, 3, 1)));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(requester.offsets(), vec![0, 10, 20]);
        assert_eq!(summary.requests, 3);
        assert_eq!(summary.records, 25);
        assert_eq!(summary.end, WindowEnd::Exhausted);
        assert_eq!(sink.record_count(), 25);
        assert_eq!(sink.finished, vec![q.window()]);
    }

    #[test]
    fn test_stops_when_page_reaches_window_end() {
        let requester = ScriptedRequester::default()
            .respond(0, page_body(2, date(2010, 5, 31)))
            .otherwise(page_body(2, date(2010, 1, 1)));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(2);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(summary.requests, 1);
        assert_eq!(summary.end, WindowEnd::Exhausted);
    }

    #[test]
    fn test_page_cap_stops_silently() {
        let requester = ScriptedRequester::default().otherwise(page_body(5, date(2010, 1, 1)));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(5);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(summary.requests, MAX_PAGES_PER_WINDOW);
        assert_eq!(summary.end, WindowEnd::PageCap);
        assert_eq!(sink.pages.len(), MAX_PAGES_PER_WINDOW);
        assert_eq!(requester.offsets().last(), Some(&(5 * 99)));
        assert!(matches!(
            observer.events.borrow().last(),
            Some(FetchEvent::PageCapReached { requests: 100, .. })
        ));
    }

    #[test]
    fn test_failed_status_skips_to_next_offset() {
        let requester = ScriptedRequester::default()
            .respond(0, page_body(10, date(2010, 1, 1)))
            .respond(10, RawResponse::new(StatusCode::SERVICE_UNAVAILABLE, "down"))
            .respond(20, page_body(3, date(2010, 3, 1)));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        // Offset 10 is not retried.
        assert_eq!(requester.offsets(), vec![0, 10, 20]);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.records, 13);
        assert!(observer.events.borrow().iter().any(|e| matches!(
            e,
            FetchEvent::Rejected {
                offset: 10,
                class: ResponseClass::Failed { status: StatusCode::SERVICE_UNAVAILABLE },
                ..
            }
        )));
    }

    #[test]
    fn test_malformed_body_skips_to_next_offset() {
        let requester = ScriptedRequester::default()
            .respond(0, RawResponse::new(StatusCode::OK, r#"{"message":"oops"}"#))
            .respond(10, page_body(4, date(2010, 1, 1)));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(summary.requests, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(sink.record_count(), 4);
    }

    #[test]
    fn test_empty_results_end_the_window() {
        let requester = ScriptedRequester::default()
            .respond(0, page_body(10, date(2010, 1, 1)))
            .respond(10, RawResponse::new(StatusCode::OK, r#"{"results":[]}"#));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(summary.requests, 2);
        assert_eq!(summary.end, WindowEnd::Exhausted);
        assert_eq!(summary.skipped, 0);
        assert_eq!(sink.pages.len(), 1);
    }

    #[test]
    fn test_unparseable_records_end_the_window_without_storing() {
        let requester = ScriptedRequester::default()
            .respond(0, RawResponse::new(StatusCode::OK, r#"{"results":[1,2,3]}"#));
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);

        let summary = Pager::new(&requester, &observer)
            .run(&q, q.window(), &mut sink)
            .unwrap();

        assert_eq!(summary.requests, 1);
        assert!(sink.pages.is_empty());
        assert!(observer
            .events
            .borrow()
            .iter()
            .any(|e| matches!(e, FetchEvent::ParseFailed { offset: 0, .. })));
    }

    #[test]
    fn test_requests_carry_window_dates() {
        let requester = ScriptedRequester::default();
        let observer = RecordingObserver::default();
        let mut sink = MemorySink::default();
        let q = query(10);
        let window = DateWindow::new(date(2010, 2, 1), date(2010, 3, 1));

        Pager::new(&requester, &observer)
            .run(&q, window, &mut sink)
            .unwrap();

        let seen = requester.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].window(), window);
        assert_eq!(seen[0].dataset_id(), "GSOM");
    }
}
