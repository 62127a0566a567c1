//! Error types for transport, manager and resource operations.
//!
//! Every fallible operation in the crate returns [`ClientError`]:
//!
//! - [`ClientError::Unauthorized`]: HTTP 401
//! - [`ClientError::AuthorizationFailure`]: identity response unusable
//! - [`ClientError::Request`]: any other status in `[400, 600)`
//! - [`ClientError::AttributeNotFound`]: local lookup on a loaded resource
//! - [`ClientError::MissingIdentifier`]: entity reference without an `id`
//! - [`ClientError::MissingEnvelope`]: 2xx body without the expected key
//! - [`ClientError::InvalidRedirect`] / [`ClientError::TooManyRedirects`]
//! - [`ClientError::Serialization`]: request body not representable as JSON
//! - [`ClientError::Network`]: connection or timeout failure
//!
//! # Example
//!
//! ```rust,ignore
//! match client.loadbalancers().get("fakeid").await {
//!     Ok(lb) => println!("{lb}"),
//!     Err(e) if e.is_not_found() => println!("no such load balancer"),
//!     Err(ClientError::Unauthorized { .. }) => println!("check your credentials"),
//!     Err(e) => println!("error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::error::ConfigError;

/// Unified error type of the LBaaS client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API or identity service answered 401.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, if any.
        body: Option<Value>,
    },

    /// The identity service answered without the fields needed for a session.
    #[error("Authorization failure: {reason}")]
    AuthorizationFailure {
        /// What was missing.
        reason: String,
    },

    /// A client or server error status other than 401.
    #[error("HTTP {status}: {message}")]
    Request {
        /// The HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, if any.
        body: Option<Value>,
    },

    /// A field lookup on a resource that has already been loaded.
    #[error("{kind} has no attribute '{attribute}'")]
    AttributeNotFound {
        /// Resource kind (e.g. "LoadBalancer").
        kind: &'static str,
        /// The requested field name.
        attribute: String,
    },

    /// An entity reference carried no usable `id` field.
    #[error("{kind} has no identifier")]
    MissingIdentifier {
        /// Resource kind of the reference.
        kind: &'static str,
    },

    /// A successful response did not contain the expected envelope key.
    #[error("Response body has no '{key}' entry")]
    MissingEnvelope {
        /// The envelope key that was looked up.
        key: String,
    },

    /// A redirect response without a usable `Location` header.
    #[error("Redirect ({status}) without a valid Location header")]
    InvalidRedirect {
        /// The redirect status code.
        status: u16,
    },

    /// The server kept redirecting.
    #[error("Gave up after {hops} redirects")]
    TooManyRedirects {
        /// Number of redirects followed.
        hops: usize,
    },

    /// A request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Maps an error status to its typed error.
    ///
    /// `401` becomes [`ClientError::Unauthorized`]; every other status becomes
    /// [`ClientError::Request`].
    #[must_use]
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let message = extract_message(status, body.as_ref());
        if status == 401 {
            Self::Unauthorized { message, body }
        } else {
            Self::Request {
                status,
                message,
                body,
            }
        }
    }

    pub(crate) fn authorization_failure(reason: impl Into<String>) -> Self {
        Self::AuthorizationFailure {
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status behind this error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Request { status, .. } | Self::InvalidRedirect { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for HTTP 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` for HTTP 404 and for local attribute misses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Request { status: 404, .. } | Self::AttributeNotFound { .. }
        )
    }
}

/// Extracts a human-readable message from an error body.
///
/// OpenStack faults look like `{"itemNotFound": {"message": "...", "code": 404}}`;
/// flat `message`, `error` and `faultstring` keys are accepted as well.
fn extract_message(status: u16, body: Option<&Value>) -> String {
    let from_object = |value: &Value| {
        ["message", "error", "faultstring"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(ToString::to_string)
    };

    let extracted = match body {
        Some(value @ Value::Object(map)) => from_object(value).or_else(|| {
            if map.len() == 1 {
                map.values().next().and_then(from_object)
            } else {
                None
            }
        }),
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    };

    extracted.unwrap_or_else(|| {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string()
    })
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_401_keeps_decoded_body() {
        let body = json!({"unauthorized": {"message": "Invalid token", "code": 401}});
        match ClientError::from_response(401, Some(body.clone())) {
            ClientError::Unauthorized { message, body: kept } => {
                assert_eq!(message, "Invalid token");
                assert_eq!(kept, Some(body));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_401_maps_to_unauthorized() {
        let error = ClientError::from_response(401, None);
        assert!(error.is_unauthorized());
        assert_eq!(error.status(), Some(401));
        assert!(error.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_other_statuses_map_to_request_error() {
        let body = json!({"itemNotFound": {"message": "LoadBalancer not found", "code": 404}});
        let error = ClientError::from_response(404, Some(body.clone()));

        match &error {
            ClientError::Request {
                status,
                message,
                body: Some(returned),
            } => {
                assert_eq!(*status, 404);
                assert_eq!(message, "LoadBalancer not found");
                assert_eq!(returned, &body);
            }
            other => panic!("Expected Request error, got {other:?}"),
        }
        assert!(error.is_not_found());
    }

    #[test]
    fn test_message_falls_back_to_raw_text_and_reason() {
        let error = ClientError::from_response(500, Some(Value::String("boom".to_string())));
        assert_eq!(error.to_string(), "HTTP 500: boom");

        let error = ClientError::from_response(503, None);
        assert_eq!(error.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_flat_message_keys() {
        let error = ClientError::from_response(400, Some(json!({"faultstring": "bad algorithm"})));
        assert!(error.to_string().contains("bad algorithm"));
    }

    #[test]
    fn test_attribute_not_found_is_not_found() {
        let error = ClientError::AttributeNotFound {
            kind: "Node",
            attribute: "weight".to_string(),
        };
        assert!(error.is_not_found());
        assert_eq!(error.status(), None);
        assert_eq!(error.to_string(), "Node has no attribute 'weight'");
    }
}
