use thiserror::Error;

/// Core error types for decoding and inspecting Open5e records
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid {kind} record: {message}")]
    InvalidRecord { kind: &'static str, message: String },

    #[error("Missing `results` array in list response for {endpoint}")]
    MissingResults { endpoint: String },
}

impl CoreError {
    /// Create a new InvalidRecord error
    pub fn invalid_record(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            message: message.into(),
        }
    }

    /// Create a new MissingResults error
    pub fn missing_results(endpoint: impl Into<String>) -> Self {
        Self::MissingResults {
            endpoint: endpoint.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::JsonError(_) | Self::MissingResults { .. } => ErrorCategory::Serialization,
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_error() {
        let err = CoreError::invalid_record("monster", "cr is not a number");
        assert_eq!(err.to_string(), "Invalid monster record: cr is not a number");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_missing_results_error() {
        let err = CoreError::missing_results("spells");
        assert_eq!(
            err.to_string(),
            "Missing `results` array in list response for spells"
        );
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::JsonError(_)));
        assert_eq!(err.category().to_string(), "serialization");
    }
}
