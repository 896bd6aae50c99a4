use crate::requests::error::ParseError;
use crate::types::record::{Page, Record};
use serde_json::Value;

/// Extracts the `results` list of a response body into a [`Page`].
pub fn parse_page(body: &str, offset: u32) -> Result<Page, ParseError> {
    let mut body: Value = serde_json::from_str(body)?;
    let results = body
        .get_mut("results")
        .map(Value::take)
        .ok_or(ParseError::MissingResults)?;

    let Value::Array(results) = results else {
        return Err(ParseError::ResultsNotAList);
    };

    let records = results
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(fields) => Ok(Record::new(fields)),
            _ => Err(ParseError::RecordNotObject { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(offset, records))
}
