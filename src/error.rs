use thiserror::Error;

/// Why one upstream call produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Timeout or connection failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status, a non-"success" status marker, or a request that could not be made.
    #[error("upstream rejected request: {0}")]
    UpstreamRejection(String),

    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// A single scraped element that could not be parsed; the page loop drops it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped element: {0}")]
pub struct ParseSkip(pub &'static str);
