use open5e_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the Open5e client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] CoreError),

    #[error("{kind} not found: {slug}")]
    NotFound { kind: String, slug: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Source store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a new NotFound error
    pub fn not_found(kind: impl Into<String>, slug: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            slug: slug.into(),
        }
    }

    /// Create a new Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for domain lookups that found nothing and for HTTP 404s.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Status { status: 404, .. }
        )
    }

    /// True for failures of the transport or the remote service.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

/// Convenience result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
