//! Stores each record as a JSON document in a SQLite-backed collection.

use crate::sinks::error::SinkError;
use crate::sinks::{Sink, SinkReport};
use crate::types::date_window::DateWindow;
use crate::types::record::{Page, Record};
use crate::utils::ensure_parent_exists;
use log::{debug, info, warn};
use rusqlite::{ffi, params, Connection, ErrorCode};
use std::path::{Path, PathBuf};

/// A named collection of record documents inside a SQLite database file.
///
/// Each record is stored as its canonical JSON text under a unique index, so
/// re-inserting a record that is already stored is rejected and counted as a
/// duplicate, while records differing in any field (value, attributes, a missing
/// `datatype`) are all kept. Records without a `station` or `date` are refused.
/// `station`, `date` and `datatype` are also stored in their own columns for lookups.
///
/// A connection is opened for every page and closed when the page is done.
#[derive(Debug, Clone)]
pub struct DocumentSink {
    path: PathBuf,
    collection: String,
}

impl DocumentSink {
    /// Opens (creating if needed) the database at `path` and the `collection` table in it.
    ///
    /// # Errors
    ///
    /// [`SinkError::InvalidCollectionName`] unless `collection` is a plain identifier,
    /// and [`SinkError::Database`] if the database cannot be opened or prepared.
    pub fn new(path: impl Into<PathBuf>, collection: &str) -> Result<Self, SinkError> {
        if !is_identifier(collection) {
            return Err(SinkError::InvalidCollectionName(collection.to_string()));
        }
        let sink = Self {
            path: path.into(),
            collection: collection.to_string(),
        };
        ensure_parent_exists(&sink.path)?;
        sink.connect()?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of documents stored in the collection.
    pub fn count(&self) -> Result<usize, SinkError> {
        let conn = self.connect()?;
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", self.collection);
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| self.db_error(e))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// All stored documents of `station`, ordered by date.
    pub fn find_by_station(&self, station: &str) -> Result<Vec<Record>, SinkError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT document FROM \"{}\" WHERE station = ?1 ORDER BY date, datatype",
            self.collection
        );
        let mut statement = conn.prepare(&sql).map_err(|e| self.db_error(e))?;
        let documents = statement
            .query_map([station], |row| row.get::<_, String>(0))
            .map_err(|e| self.db_error(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.db_error(e))?;

        documents
            .iter()
            .map(|document| serde_json::from_str(document).map_err(SinkError::from))
            .collect()
    }

    fn connect(&self) -> Result<Connection, SinkError> {
        let conn = Connection::open(&self.path).map_err(|e| self.db_error(e))?;
        let schema = format!(
            "CREATE TABLE IF NOT EXISTS \"{c}\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                station TEXT NOT NULL,
                date TEXT NOT NULL,
                datatype TEXT,
                document TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS \"{c}_document\" ON \"{c}\" (document);
            CREATE INDEX IF NOT EXISTS \"{c}_station_date\" ON \"{c}\" (station, date);",
            c = self.collection
        );
        conn.execute_batch(&schema).map_err(|e| self.db_error(e))?;
        Ok(conn)
    }

    fn insert(
        &self,
        conn: &Connection,
        station: &str,
        date: &str,
        record: &Record,
    ) -> rusqlite::Result<usize> {
        let sql = format!(
            "INSERT INTO \"{}\" (station, date, datatype, document) VALUES (?1, ?2, ?3, ?4)",
            self.collection
        );
        conn.execute(
            &sql,
            params![station, date, record.datatype(), record.canonical_json()],
        )
    }

    fn db_error(&self, e: rusqlite::Error) -> SinkError {
        SinkError::Database(self.path.clone(), e)
    }
}

impl Sink for DocumentSink {
    fn accept(&mut self, window: &DateWindow, page: &Page) -> Result<SinkReport, SinkError> {
        info!("{} documents received for window {}", page.len(), window);
        let conn = self.connect()?;
        let mut report = SinkReport::default();

        for record in &page.records {
            let (Some(station), Some(date)) = (record.station(), record.date()) else {
                warn!("Record without station or date, not stored: {:?}", record);
                report.failed += 1;
                continue;
            };
            match self.insert(&conn, station, date, record) {
                Ok(_) => report.inserted += 1,
                Err(e) if is_duplicate_key(&e) => {
                    debug!("Duplicate record found, skipping: {} {}", station, date);
                    report.duplicates += 1;
                }
                Err(e) => {
                    warn!("Failed to insert record into '{}': {}", self.collection, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "{} documents inserted into '{}' ({} duplicates skipped)",
            report.inserted, self.collection, report.duplicates
        );
        Ok(report)
    }
}

fn is_duplicate_key(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}
