use crate::config::ConfigError;
use crate::requests::error::FetchError;
use crate::sinks::error::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoaaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
