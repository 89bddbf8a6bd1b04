/// Error types for vocabulary source adapters
///
/// These never leave the adapter layer: [`super::VocabSource::fetch`]
/// logs them and contributes an empty result instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Connection or transport failure
    Network(String),
    /// The request did not finish within the configured timeout
    Timeout(String),
    /// The provider answered with a non-success HTTP status
    Status { code: u16, url: String },
    /// The body could not be parsed in the provider's format
    Parse(String),
    /// Adapter or HTTP client misconfiguration
    Config(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Network(msg) => write!(f, "Network error: {}", msg),
            SourceError::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            SourceError::Status { code, url } => write!(f, "HTTP {} from {}", code, url),
            SourceError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SourceError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(err.to_string())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("invalid JSON: {}", err))
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Parse(format!("invalid CSV: {}", err))
    }
}

/// Result type for source adapter operations
pub type SourceResult<T> = Result<T, SourceError>;
