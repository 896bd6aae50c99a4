//! Structured progress events emitted while traversing a date range.
//!
//! The traversal never prints. Every step it takes is reported as a [`FetchEvent`]
//! to a [`FetchObserver`]; the default [`LogObserver`] forwards them to the `log` facade.

use crate::requests::validator::ResponseClass;
use crate::sinks::SinkReport;
use crate::types::date_window::DateWindow;
use chrono::NaiveDate;
use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    WindowStarted {
        window: DateWindow,
    },
    /// A page was classified as anything other than [`ResponseClass::Success`].
    Rejected {
        window: DateWindow,
        offset: u32,
        class: ResponseClass,
    },
    /// A successful response whose body could not be turned into records.
    ParseFailed {
        window: DateWindow,
        offset: u32,
        message: String,
    },
    PageStored {
        window: DateWindow,
        offset: u32,
        received: usize,
        most_recent: Option<NaiveDate>,
        report: SinkReport,
    },
    WindowComplete {
        window: DateWindow,
        requests: usize,
    },
    /// The page cap was hit before the window was exhausted.
    PageCapReached {
        window: DateWindow,
        requests: usize,
    },
}

pub trait FetchObserver {
    fn on_event(&self, event: &FetchEvent);
}

/// Writes every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl FetchObserver for LogObserver {
    fn on_event(&self, event: &FetchEvent) {
        match event {
            FetchEvent::WindowStarted { window } => info!("Fetching window {}", window),
            FetchEvent::Rejected {
                window,
                offset,
                class,
            } => warn!("{} at offset {} in window {}", class, offset, window),
            FetchEvent::ParseFailed {
                window,
                offset,
                message,
            } => warn!(
                "Could not parse results at offset {} in window {}: {}",
                offset, window, message
            ),
            FetchEvent::PageStored {
                window,
                offset,
                received,
                most_recent,
                report,
            } => {
                info!(
                    "Valid response at offset {} in window {}: {} records received, {} stored, {} duplicates, {} failed",
                    offset, window, received, report.inserted, report.duplicates, report.failed
                );
                if let Some(day) = most_recent {
                    debug!("Most recent record: {}", day);
                }
            }
            FetchEvent::WindowComplete { window, requests } => info!(
                "No more records to retrieve for window {} after {} requests",
                window, requests
            ),
            FetchEvent::PageCapReached { window, requests } => warn!(
                "Stopped window {} after {} requests without reaching its end",
                window, requests
            ),
        }
    }
}
