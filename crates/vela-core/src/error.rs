//! Unified error types for all layers of Vela.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Vela service discovery.
///
/// Variants are grouped by the layer that raises them. Every variant is
/// cloneable, so one failure can be fanned out verbatim to each subscriber
/// of a shared lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VelaError {
    // ============ Configuration Errors ============
    /// Missing mandatory dependency or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Cache Errors ============
    /// Cache store unreachable or failed
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Discovery Errors ============
    /// The delegate supplier failed while producing instances
    #[error("Discovery error for service '{service_id}': {message}")]
    Discovery { service_id: String, message: String },

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VelaError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Discovery { .. } => "DISCOVERY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a discovery error for a service.
    #[must_use]
    pub fn discovery<S: ToString, T: Into<String>>(service_id: S, message: T) -> Self {
        Self::Discovery {
            service_id: service_id.to_string(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is recovered locally by the caching layer
    /// rather than surfaced to callers.
    #[must_use]
    pub const fn is_cache_failure(&self) -> bool {
        matches!(self, Self::Cache(_))
    }
}

impl From<serde_json::Error> for VelaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            VelaError::configuration("missing delegate").error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(VelaError::cache("store offline").error_code(), "CACHE_ERROR");
        assert_eq!(
            VelaError::discovery("orders", "registry down").error_code(),
            "DISCOVERY_ERROR"
        );
        assert_eq!(VelaError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_constructors() {
        let configuration = VelaError::configuration("cache store is required");
        assert!(configuration.to_string().contains("cache store is required"));

        let cache = VelaError::cache("connection refused");
        assert!(cache.to_string().contains("connection refused"));

        let discovery = VelaError::discovery("orders", "registry down");
        assert!(discovery.to_string().contains("orders"));
        assert!(discovery.to_string().contains("registry down"));

        let internal = VelaError::internal("panic");
        assert!(internal.to_string().contains("panic"));
    }

    #[test]
    fn test_cache_failure_classification() {
        assert!(VelaError::cache("store offline").is_cache_failure());
        assert!(!VelaError::discovery("orders", "down").is_cache_failure());
        assert!(!VelaError::configuration("bad").is_cache_failure());
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = VelaError::discovery("orders", "registry down");
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted = VelaError::from(err);
        assert_eq!(converted.error_code(), "INTERNAL_ERROR");
    }
}
