mod config;
mod error;
mod events;
mod noaa;
mod requests;
mod sinks;
mod traversal;
mod types;
mod utils;

pub use config::{
    ApiToken, ConfigError, API_KEY_ENV, DAYS_PER_YEAR_WINDOW, DEFAULT_PAGE_SIZE, ENDPOINT,
    MAX_PAGES_PER_WINDOW, TOKEN_HEADER,
};
pub use error::NoaaError;
pub use events::{FetchEvent, FetchObserver, LogObserver};
pub use noaa::*;

pub use requests::error::{FetchError, ParseError};
pub use requests::parser::parse_page;
pub use requests::requester::{HttpRequester, RawResponse, Requester};
pub use requests::validator::{classify, ResponseClass};

pub use sinks::error::SinkError;
pub use sinks::table::{column_names, records_to_frame};
pub use sinks::{CsvSink, DocumentSink, Sink, SinkConfig, SinkReport};

pub use traversal::pager::{Pager, WindowEnd, WindowSummary};
pub use traversal::year_chunker::{month_end_boundaries, year_windows};

pub use types::date_window::DateWindow;
pub use types::query::QueryParameters;
pub use types::record::{Page, Record};

pub use utils::get_data_dir;
