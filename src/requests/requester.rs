//! Issues the actual `GET` against the CDO API.

use crate::config::{ApiToken, ENDPOINT, TOKEN_HEADER};
use crate::requests::error::FetchError;
use crate::types::query::QueryParameters;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

/// Status code and undecoded body of one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one query and hands back whatever the server answered.
///
/// Non-200 statuses are *not* errors at this level; only a failed transport is.
pub trait Requester {
    fn get(&self, params: &QueryParameters) -> Result<RawResponse, FetchError>;
}

impl<R: Requester + ?Sized> Requester for &R {
    fn get(&self, params: &QueryParameters) -> Result<RawResponse, FetchError> {
        (**self).get(params)
    }
}

/// Blocking `reqwest` client that sends the token header with every request.
#[derive(Debug, Clone)]
pub struct HttpRequester {
    client: Client,
    endpoint: String,
}

impl HttpRequester {
    pub fn new(token: &ApiToken) -> Result<Self, FetchError> {
        Self::with_endpoint(token, ENDPOINT)
    }

    /// Like [`HttpRequester::new`] but against a different base URL.
    pub fn with_endpoint(token: &ApiToken, endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let mut token_value =
            HeaderValue::from_str(token.expose()).map_err(FetchError::InvalidToken)?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Requester for HttpRequester {
    fn get(&self, params: &QueryParameters) -> Result<RawResponse, FetchError> {
        debug!(
            "GET {} offset={} window={}",
            self.endpoint,
            params.offset(),
            params.window()
        );
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params.to_query_pairs())
            .send()
            .map_err(|e| FetchError::NetworkRequest(self.endpoint.clone(), e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FetchError::ResponseBody(self.endpoint.clone(), e))?;
        Ok(RawResponse { status, body })
    }
}
