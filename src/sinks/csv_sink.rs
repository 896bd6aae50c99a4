//! Writes records to CSV files through polars.

use crate::sinks::error::SinkError;
use crate::sinks::table::records_to_frame;
use crate::sinks::{Sink, SinkReport};
use crate::types::date_window::DateWindow;
use crate::types::record::{Page, Record};
use crate::utils::{ensure_dir_exists, ensure_parent_exists};
use bon::bon;
use log::{debug, info};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Accumulates every record of a run in memory and keeps a CSV copy on disk.
///
/// * After each window the complete table so far overwrites `output`.
/// * A record identical to one already held (neighbouring windows share their
///   boundary day) is counted as a duplicate and not added again.
/// * When a checkpoint directory is set, every page is also written to its own
///   file there as soon as it arrives, so a crash mid-window loses nothing.
///
/// Memory grows with the size of the run; the document sink is the better fit for
/// very long ranges.
#[derive(Debug)]
pub struct CsvSink {
    output: PathBuf,
    checkpoint_dir: Option<PathBuf>,
    records: Vec<Record>,
    seen: HashSet<String>,
}

#[bon]
impl CsvSink {
    /// # Arguments
    ///
    /// * `.output(PathBuf)`: **Required.** File holding the accumulated table.
    /// * `.checkpoint_dir(PathBuf)`: Optional. Directory for per-page checkpoint files.
    ///
    /// Missing parent directories are created.
    #[builder]
    pub fn new(output: PathBuf, checkpoint_dir: Option<PathBuf>) -> Result<Self, SinkError> {
        ensure_parent_exists(&output)?;
        if let Some(dir) = &checkpoint_dir {
            ensure_dir_exists(dir)?;
        }
        Ok(Self {
            output,
            checkpoint_dir,
            records: Vec::new(),
            seen: HashSet::new(),
        })
    }
}

impl CsvSink {
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Everything accepted so far.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Where the checkpoint for `page` of `window` goes, if checkpoints are enabled.
    pub fn checkpoint_path(&self, window: &DateWindow, page: &Page) -> Option<PathBuf> {
        self.checkpoint_dir.as_ref().map(|dir| {
            dir.join(format!(
                "NOAA_{}_{}_offset{}.csv",
                window.start, window.end, page.offset
            ))
        })
    }

    fn write_checkpoint(&self, window: &DateWindow, page: &Page) -> Result<(), SinkError> {
        let Some(path) = self.checkpoint_path(window, page) else {
            return Ok(());
        };
        let mut df = records_to_frame(&page.records).map_err(SinkError::TableBuild)?;
        write_csv(&mut df, &path)?;
        info!("{} records written to checkpoint {}", page.len(), path.display());
        Ok(())
    }
}

impl Sink for CsvSink {
    fn accept(&mut self, window: &DateWindow, page: &Page) -> Result<SinkReport, SinkError> {
        self.write_checkpoint(window, page)?;
        let mut report = SinkReport::default();
        for record in &page.records {
            if self.seen.insert(record.canonical_json()) {
                self.records.push(record.clone());
                report.inserted += 1;
            } else {
                debug!("Duplicate record found, skipping: {:?}", record);
                report.duplicates += 1;
            }
        }
        Ok(report)
    }

    fn finish_window(&mut self, window: &DateWindow) -> Result<(), SinkError> {
        let mut df = records_to_frame(&self.records).map_err(SinkError::TableBuild)?;
        write_csv(&mut df, &self.output)?;
        info!(
            "Wrote {} records to {} after window {}",
            df.height(),
            self.output.display(),
            window
        );
        Ok(())
    }
}

/// Truncates `path` and writes `df` to it with a header row. The file is closed on return.
fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), SinkError> {
    let mut file = File::create(path).map_err(|e| SinkError::Io(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| SinkError::CsvWrite(path.to_path_buf(), e))
}
