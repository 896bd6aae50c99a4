use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("API token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response body is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("Response body has no 'results' key")]
    MissingResults,

    #[error("'results' is not a list")]
    ResultsNotAList,

    #[error("Result {index} is not an object")]
    RecordNotObject { index: usize },
}
