//! Records returned by the CDO API and the pages they arrive in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of a response's `results` array.
///
/// The record is kept as the raw JSON object. Only `station` and `date` are ever
/// interpreted; sinks compare whole records through [`Record::canonical_json`].
///
/// # Examples
///
/// ```
/// use noaa_cdo::Record;
/// use serde_json::json;
///
/// let record: Record = serde_json::from_value(json!({
///     "date": "2010-05-01T00:00:00",
///     "datatype": "TAVG",
///     "station": "GHCND:USC00051959",
///     "value": 7.4
/// })).unwrap();
///
/// assert_eq!(record.station(), Some("GHCND:USC00051959"));
/// assert_eq!(record.day().unwrap().to_string(), "2010-05-01");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn station(&self) -> Option<&str> {
        self.str_field("station")
    }

    /// The raw timestamp, e.g. `2010-05-01T00:00:00`.
    pub fn date(&self) -> Option<&str> {
        self.str_field("date")
    }

    pub fn datatype(&self) -> Option<&str> {
        self.str_field("datatype")
    }

    /// The calendar day of [`Record::date`], with any time-of-day stripped.
    pub fn day(&self) -> Option<NaiveDate> {
        let date = self.date()?;
        let day = date.split('T').next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The record as JSON with object keys sorted at every level.
    ///
    /// Two records have the same canonical text exactly when they hold the same
    /// fields and values, whatever order the API sent the keys in.
    pub fn canonical_json(&self) -> String {
        let mut out = String::new();
        write_canonical_object(&self.0, &mut out);
        out
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

fn write_canonical_object(fields: &Map<String, Value>, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(fields) => write_canonical_object(fields, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// The records of one successful response, in the order the API sent them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub offset: u32,
    pub records: Vec<Record>,
}

impl Page {
    pub fn new(offset: u32, records: Vec<Record>) -> Self {
        Self { offset, records }
    }

    /// A page with no records, used when a body could not be parsed.
    pub fn empty(offset: u32) -> Self {
        Self::new(offset, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when fewer records came back than were asked for.
    pub fn is_short(&self, page_size: u32) -> bool {
        self.records.len() < page_size as usize
    }

    /// The day of the latest record, ordering records by their `date` string.
    pub fn most_recent_day(&self) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|record| record.date().is_some())
            .max_by(|a, b| a.date().cmp(&b.date()))
            .and_then(Record::day)
    }

    /// Whether this page ends its window: it is short, or it reaches `end`.
    pub fn completes_window(&self, page_size: u32, end: NaiveDate) -> bool {
        self.is_short(page_size) || self.most_recent_day() == Some(end)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn record(station: &str, date: &str) -> Record {
        match json!({
            "date": date,
            "datatype": "TAVG",
            "station": station,
            "attributes": ",,,",
            "value": 3.2
        }) {
            Value::Object(map) => Record::new(map),
            _ => unreachable!(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_most_recent_day_ignores_response_order() {
        let page = Page::new(
            0,
            vec![
                record("GHCND:A", "2010-03-01T00:00:00"),
                record("GHCND:A", "2010-05-30T00:00:00"),
                record("GHCND:B", "2010-01-01T00:00:00"),
            ],
        );
        assert_eq!(page.most_recent_day(), Some(date(2010, 5, 30)));
    }

    #[test]
    fn test_short_page_completes_window() {
        let page = Page::new(0, vec![record("GHCND:A", "2010-03-01T00:00:00")]);
        assert!(page.completes_window(2, date(2010, 6, 1)));
        assert!(!page.completes_window(1, date(2010, 6, 1)));
    }

    #[test]
    fn test_full_page_reaching_end_date_completes_window() {
        let page = Page::new(
            0,
            vec![
                record("GHCND:A", "2010-05-31T00:00:00"),
                record("GHCND:A", "2010-06-01T00:00:00"),
            ],
        );
        assert!(page.completes_window(2, date(2010, 6, 1)));
        assert!(!page.completes_window(2, date(2010, 7, 1)));
    }

    #[test]
    fn test_canonical_json_ignores_key_order() {
        let mut forward = Map::new();
        forward.insert("station".to_string(), json!("GHCND:A"));
        forward.insert("date".to_string(), json!("2010-01-01T00:00:00"));
        forward.insert("value".to_string(), json!({"b": 1, "a": [2, 3]}));
        let mut backward = Map::new();
        backward.insert("value".to_string(), json!({"a": [2, 3], "b": 1}));
        backward.insert("date".to_string(), json!("2010-01-01T00:00:00"));
        backward.insert("station".to_string(), json!("GHCND:A"));

        let canonical = Record::new(forward).canonical_json();
        assert_eq!(canonical, Record::new(backward).canonical_json());
        assert_eq!(
            canonical,
            r#"{"date":"2010-01-01T00:00:00","station":"GHCND:A","value":{"a":[2,3],"b":1}}"#
        );
    }

    #[test]
    fn test_canonical_json_differs_by_value() {
        let mut colder = record("GHCND:A", "2010-01-01T00:00:00");
        colder.0.insert("value".to_string(), json!(-11.7));
        assert_ne!(
            colder.canonical_json(),
            record("GHCND:A", "2010-01-01T00:00:00").canonical_json()
        );
    }

    #[test]
    fn test_empty_page_is_short() {
        assert!(Page::empty(0).completes_window(1000, date(2010, 6, 1)));
    }
}
