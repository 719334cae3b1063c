use thiserror::Error;

/// Failure of a single fetch-and-parse attempt.
///
/// Both kinds are recoverable: the display loop keeps its previous state and
/// tries again on the next tick.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Unreachable host, timeout, non-success status or an empty body.
    #[error("{0}")]
    Network(String),

    /// The body is not a JSON object carrying the three numeric fields.
    #[error("{0}")]
    Parse(String),
}

impl MonitorError {
    pub fn is_network(&self) -> bool {
        matches!(self, MonitorError::Network(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, MonitorError::Parse(_))
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MonitorError::Network(format!("request timed out: {err}"))
        } else {
            MonitorError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Parse(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MonitorError>;
