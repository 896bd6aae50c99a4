//! Classifies a raw response before anything tries to parse it.

use crate::requests::requester::RawResponse;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Outcome of looking at a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClass {
    /// Status 200 and a non-empty `results` list.
    Success,
    /// Status 200, but there is nothing in it: `{}` or an empty `results` list.
    Empty,
    /// Status 200 with a body of an unexpected shape.
    Malformed { reason: String },
    /// Any status other than 200.
    Failed { status: StatusCode },
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseClass::Success => write!(f, "valid response"),
            ResponseClass::Empty => write!(f, "empty response"),
            ResponseClass::Malformed { reason } => write!(f, "unexpected response: {}", reason),
            ResponseClass::Failed { status } => {
                write!(f, "request failed with status code {}", status.as_u16())
            }
        }
    }
}

pub fn classify(response: &RawResponse) -> ResponseClass {
    if response.status != StatusCode::OK {
        return ResponseClass::Failed {
            status: response.status,
        };
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            return ResponseClass::Malformed {
                reason: format!("body is not JSON ({})", e),
            }
        }
    };

    let Value::Object(object) = body else {
        return ResponseClass::Malformed {
            reason: "body is not a JSON object".to_string(),
        };
    };

    match object.get("results") {
        Some(Value::Array(results)) if results.is_empty() => ResponseClass::Empty,
        Some(Value::Array(_)) => ResponseClass::Success,
        Some(_) => ResponseClass::Malformed {
            reason: "'results' is not a list".to_string(),
        },
        None if object.is_empty() => ResponseClass::Empty,
        None => ResponseClass::Malformed {
            reason: "no 'results' key".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> RawResponse {
        RawResponse::new(StatusCode::OK, body)
    }

    #[test]
    fn test_results_list_is_success() {
        let body = r#"{"metadata":{"resultset":{"offset":1,"count":1,"limit":1000}},
            "results":[{"station":"GHCND:A","date":"2010-01-01T00:00:00"}]}"#;
        assert_eq!(classify(&ok(body)), ResponseClass::Success);
    }

    #[test]
    fn test_empty_results_and_empty_object_are_empty() {
        assert_eq!(classify(&ok(r#"{"results":[]}"#)), ResponseClass::Empty);
        assert_eq!(classify(&ok("{}")), ResponseClass::Empty);
    }

    #[test]
    fn test_unexpected_shapes_are_malformed() {
        for body in ["not json", "[1,2]", r#"{"status":"400"}"#, r#"{"results":{}}"#] {
            assert!(
                matches!(classify(&ok(body)), ResponseClass::Malformed { .. }),
                "expected malformed for {body}"
            );
        }
    }

    #[test]
    fn test_non_200_is_failed_even_with_results() {
        let response = RawResponse::new(StatusCode::TOO_MANY_REQUESTS, r#"{"results":[{}]}"#);
        assert_eq!(
            classify(&response),
            ResponseClass::Failed {
                status: StatusCode::TOO_MANY_REQUESTS
            }
        );
        assert_eq!(
            classify(&response).to_string(),
            "request failed with status code 429"
        );
    }
}
