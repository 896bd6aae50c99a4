//! Static configuration for talking to the NOAA Climate Data Online (CDO) v2 API:
//! endpoint, header name, paging constants and the API token.

use std::env;
use std::fmt;
use thiserror::Error;

/// Data endpoint of the CDO v2 web service. Query parameters are appended by the requester.
pub const ENDPOINT: &str = "https://www.ncdc.noaa.gov/cdo-web/api/v2/data";

/// Header the CDO API reads the access token from.
pub const TOKEN_HEADER: &str = "token";

/// Environment variable holding the API token.
pub const API_KEY_ENV: &str = "NOAA_API_KEY";

/// Records requested per page when no `limit` is given. This is also the API maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Hard cap on the number of pages requested for a single date window.
pub const MAX_PAGES_PER_WINDOW: usize = 100;

/// Ranges spanning at least this many days are split into year-long windows.
pub const DAYS_PER_YEAR_WINDOW: i64 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is not set or not valid unicode")]
    MissingApiKey(&'static str, #[source] env::VarError),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Page size must be greater than zero, got {0}")]
    InvalidPageSize(u32),
}

/// A CDO access token.
///
/// Request one at <https://www.ncdc.noaa.gov/cdo-web/token> and export it as
/// `NOAA_API_KEY`, or pass it in directly with [`ApiToken::new`].
///
/// The `Debug` implementation never prints the token itself.
///
/// # Examples
///
/// ```
/// use noaa_cdo::ApiToken;
///
/// let token = ApiToken::new("abc123");
/// assert_eq!(token.expose(), "abc123");
/// assert_eq!(format!("{:?}", token), "ApiToken(***)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token from the `NOAA_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the variable is unset or not unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(API_KEY_ENV)
    }

    pub(crate) fn from_env_var(var: &'static str) -> Result<Self, ConfigError> {
        env::var(var)
            .map(Self)
            .map_err(|e| ConfigError::MissingApiKey(var, e))
    }

    /// The raw token, as sent in the request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken(***)")
    }
}
