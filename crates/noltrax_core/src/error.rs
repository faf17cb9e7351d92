use thiserror::Error;

/// Failures that can escape the analysis core.
///
/// Malformed session *content* never produces one of these: the normalizer
/// replaces it with defaults. Only text that is not JSON at all, an unusable
/// configuration, or file I/O performed by a caller ends up here.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            AnalysisError::Io(_) => true,
            AnalysisError::Config(_) => true, // Defaults are always available
            AnalysisError::InvalidJson(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: AnalysisError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AnalysisError::InvalidJson(_)));
        assert!(!err.is_recoverable());
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_config_error_is_recoverable() {
        let err = AnalysisError::Config("bad bucket width".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Configuration error: bad bucket width");
    }
}
