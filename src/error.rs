//! Configuration error types for the LBaaS client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured client fails before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use lbaas_client::{ConfigError, ServiceUrl};
//!
//! let result = ServiceUrl::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A URL setting was empty.
    #[error("{name} cannot be empty. Please provide a full URL (e.g., 'http://keystone:5000/v2.0').")]
    EmptyUrl {
        /// The setting that was empty.
        name: &'static str,
    },

    /// A URL setting could not be parsed or has an unsupported scheme.
    #[error("Invalid URL '{url}'. Expected an absolute http:// or https:// URL.")]
    InvalidUrl {
        /// The URL that was provided.
        url: String,
    },

    /// A credential value was empty.
    #[error("{field} cannot be empty.")]
    EmptyCredential {
        /// The credential field that was empty.
        field: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An `--extra` property was not in `key=value` form.
    #[error("Invalid extra property '{pair}'. Expected format: 'key=value'.")]
    InvalidExtraProperty {
        /// The malformed pair.
        pair: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_error_names_setting() {
        let error = ConfigError::EmptyUrl { name: "auth_url" };
        let message = error.to_string();
        assert!(message.contains("auth_url"));
        assert!(message.contains("cannot be empty"));
    }

    #[test]
    fn test_invalid_extra_property_message() {
        let error = ConfigError::InvalidExtraProperty {
            pair: "novalue".to_string(),
        };
        assert!(error.to_string().contains("novalue"));
        assert!(error.to_string().contains("key=value"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "auth" };
        let message = error.to_string();
        assert!(message.contains("auth"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyCredential { field: "username" };
        let _: &dyn std::error::Error = &error;
    }
}
