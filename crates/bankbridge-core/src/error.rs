use std::time::Duration;

use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents every failure the bank bridge can surface, from fatal
/// startup problems to per-endpoint call failures. It uses the `thiserror`
/// crate for ergonomic error handling and automatic conversion from
/// underlying library errors.
///
/// # Error Classes
///
/// - Startup: [`AppError::StoreInit`], [`AppError::Config`],
///   [`AppError::InvalidUrl`], [`AppError::DuplicateLabel`]
/// - Per call: [`AppError::ClientError`], [`AppError::NetworkError`],
///   [`AppError::Timeout`], [`AppError::InvalidRecord`]
/// - Aggregate: [`AppError::NoEndpointsConfigured`],
///   [`AppError::NoDataAvailable`]
///
/// # Examples
///
/// ```
/// use bankbridge_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::NoEndpointsConfigured)
/// }
///
/// assert_eq!(example().unwrap_err().code(), 107);
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The record store could not be populated from its seed data.
    ///
    /// Fatal to startup: the seed file is missing, unreadable, or malformed.
    #[error("Failed to initialize bank store from {path}: {reason}")]
    StoreInit { path: String, reason: String },

    /// Configuration is missing, unreadable, or semantically invalid.
    #[error("Failed to load configuration: {0}")]
    Config(String),

    /// An endpoint URL in the directory could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Two endpoints in one directory share a label.
    #[error("Duplicate endpoint label: {0}")]
    DuplicateLabel(String),

    /// A record failed validation (missing or blank institution code).
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// HTTP request to a remote provider failed or returned a non-success status.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Network or connection error.
    ///
    /// This error occurs when a network request fails due to connectivity issues,
    /// DNS resolution failures, or the remote server being unreachable.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A remote call exceeded its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint directory is empty; no remote calls were attempted.
    #[error("No remote api configuration available to retrieve data.")]
    NoEndpointsConfigured,

    /// Every remote call failed or produced an invalid record.
    ///
    /// Carries the labels of all failed endpoints so callers can report them.
    #[error("Failed to retrieve data from requested source - Banks Remote ({} endpoint(s) failed)", failed_labels.len())]
    NoDataAvailable { failed_labels: Vec<String> },

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns the stable numeric code reported at the HTTP boundary.
    ///
    /// System errors are numbered from 101; client-facing data retrieval
    /// failures from 10001.
    pub fn code(&self) -> u32 {
        match self {
            AppError::Config(_) => 101,
            AppError::StoreInit { .. } => 103,
            AppError::InvalidUrl(_) | AppError::DuplicateLabel(_) => 105,
            AppError::ClientError(_) | AppError::NetworkError(_) | AppError::Timeout(_) => 106,
            AppError::NoEndpointsConfigured => 107,
            AppError::InvalidRecord(_) | AppError::SerializationError(_) => 108,
            AppError::Generic(_) => 109,
            AppError::NoDataAvailable { .. } => 10001,
        }
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::StoreInit { path, .. } => {
                format!(
                    "Cannot load bank seed data from {}.\n   Check the [seed] path in your configuration.",
                    path
                )
            }
            AppError::Config(msg) => {
                format!(
                    "Configuration error: {}\n   Pass --config or set BANKBRIDGE_CONFIG.",
                    msg
                )
            }
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check that the remote provider is reachable.", msg)
            }
            AppError::Timeout(after) => {
                format!(
                    "Request timed out after {:?}.\n   The provider may be overloaded. Try again later.",
                    after
                )
            }
            AppError::NoEndpointsConfigured => {
                "No remote providers are configured.\n   Add entries to the [endpoints] table."
                    .to_string()
            }
            AppError::NoDataAvailable { failed_labels } => {
                format!(
                    "No remote provider returned usable data.\n   Failed: {}",
                    failed_labels.join(", ")
                )
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::InvalidRecord("missing institution code".to_string());
        assert_eq!(err.to_string(), "Invalid record: missing institution code");
    }

    #[test]
    fn test_no_endpoints_display() {
        let err = AppError::NoEndpointsConfigured;
        assert_eq!(
            err.to_string(),
            "No remote api configuration available to retrieve data."
        );
    }

    #[test]
    fn test_no_data_available_counts_failures() {
        let err = AppError::NoDataAvailable {
            failed_labels: vec!["a".into(), "b".into()],
        };
        assert!(err.to_string().contains("Banks Remote"));
        assert!(err.to_string().contains("2 endpoint(s) failed"));
    }

    #[test]
    fn test_store_init_display() {
        let err = AppError::StoreInit {
            path: "banks-v1.json".to_string(),
            reason: "No such file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to initialize bank store from banks-v1.json: No such file"
        );
    }

    #[test]
    fn test_timeout_error() {
        let err = AppError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Request timed out after 250ms");
    }

    #[test]
    fn test_error_from_serde() {
        let json = "{ invalid json }";
        let result: Result<serde_json::Value, _> = serde_json::from_str(json);
        let serde_err = result.unwrap_err();
        let app_err: AppError = serde_err.into();
        assert!(matches!(app_err, AppError::SerializationError(_)));
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::Config("x".into()).code(), 101);
        assert_eq!(AppError::NoEndpointsConfigured.code(), 107);
        assert_eq!(
            AppError::NoDataAvailable {
                failed_labels: vec![]
            }
            .code(),
            10001
        );
        assert_eq!(AppError::Timeout(Duration::from_secs(1)).code(), 106);
    }

    #[test]
    fn test_user_message_lists_failed_labels() {
        let err = AppError::NoDataAvailable {
            failed_labels: vec!["Credit Sweets".into(), "Royal Bank of Boredom".into()],
        };
        let msg = err.user_message();
        assert!(msg.contains("Credit Sweets, Royal Bank of Boredom"));
    }
}
