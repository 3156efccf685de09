//! Errors returned by comparator settings, logging and metrics.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging error: {0}")]
    Logging(#[from] TryInitError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("verification was aborted before the primary verifier completed")]
    Aborted,
}
