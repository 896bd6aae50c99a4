//! Where retrieved pages end up.
//!
//! A [`Sink`] accepts one [`Page`] at a time and reports what happened to each
//! record. Two sinks are provided:
//!
//! * [`DocumentSink`]: one JSON document per record in a SQLite collection, with
//!   re-inserted records rejected by a unique index on the whole document.
//! * [`CsvSink`]: the whole run accumulated into one table that is rewritten to a
//!   CSV file after every window, plus a checkpoint CSV per page. Records it
//!   already holds are skipped.
//!
//! Pick one at configuration time through [`SinkConfig`].

pub mod csv_sink;
pub mod document_sink;
pub mod error;
pub mod table;

pub use csv_sink::CsvSink;
pub use document_sink::DocumentSink;

use crate::sinks::error::SinkError;
use crate::types::date_window::DateWindow;
use crate::types::record::Page;
use crate::utils::get_data_dir;
use std::ops::AddAssign;
use std::path::PathBuf;

/// Per-record outcome counts for one page (or, summed, for a whole run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkReport {
    pub inserted: usize,
    /// Records rejected because an identical one was already stored.
    pub duplicates: usize,
    /// Records that could not be stored for any other reason.
    pub failed: usize,
}

impl AddAssign for SinkReport {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.failed += other.failed;
    }
}

pub trait Sink {
    /// Stores the records of `page`, fetched as part of `window`.
    ///
    /// Individual record failures are counted in the report. An `Err` means the
    /// whole page could not be handled and stops the run.
    fn accept(&mut self, window: &DateWindow, page: &Page) -> Result<SinkReport, SinkError>;

    /// Called once a window has been fully paged through.
    fn finish_window(&mut self, _window: &DateWindow) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn accept(&mut self, window: &DateWindow, page: &Page) -> Result<SinkReport, SinkError> {
        (**self).accept(window, page)
    }

    fn finish_window(&mut self, window: &DateWindow) -> Result<(), SinkError> {
        (**self).finish_window(window)
    }
}

/// Selects and locates the sink for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    Document { path: PathBuf, collection: String },
    Csv { output: PathBuf, checkpoint_dir: PathBuf },
}

impl SinkConfig {
    /// `NOAA.sqlite`, collection `data`, in the user data directory.
    pub fn default_document() -> Result<Self, SinkError> {
        Ok(SinkConfig::Document {
            path: get_data_dir()?.join("NOAA.sqlite"),
            collection: "data".to_string(),
        })
    }

    /// `NOAA_data.csv` and a `checkpoints` folder in the user data directory.
    pub fn default_csv() -> Result<Self, SinkError> {
        let dir = get_data_dir()?;
        Ok(SinkConfig::Csv {
            output: dir.join("NOAA_data.csv"),
            checkpoint_dir: dir.join("checkpoints"),
        })
    }

    pub fn open(&self) -> Result<Box<dyn Sink>, SinkError> {
        Ok(match self {
            SinkConfig::Document { path, collection } => {
                Box::new(DocumentSink::new(path.clone(), collection)?)
            }
            SinkConfig::Csv {
                output,
                checkpoint_dir,
            } => Box::new(
                CsvSink::builder()
                    .output(output.clone())
                    .checkpoint_dir(checkpoint_dir.clone())
                    .build()?,
            ),
        })
    }
}
