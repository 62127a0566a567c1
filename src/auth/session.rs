//! Authenticated session state held by the transport.

use crate::auth::{ServiceCatalog, TokenInfo};

/// The state established by a successful authentication.
///
/// The transport replaces the whole value on re-authentication, so a request
/// in flight always sees a consistent token/endpoint pair.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    /// Base URL every API path is appended to.
    pub endpoint: String,
    /// Token attached as `X-Auth-Token`, if any.
    pub token: Option<TokenInfo>,
    /// The catalog the endpoint was selected from (password authentication only).
    pub catalog: Option<ServiceCatalog>,
}

impl AuthSession {
    /// Creates a session for a caller-provided endpoint and token.
    #[must_use]
    pub fn pre_provisioned(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.map(TokenInfo::bare),
            catalog: None,
        }
    }

    /// Returns the raw token identifier, if a token is known.
    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.id.as_str())
    }
}
