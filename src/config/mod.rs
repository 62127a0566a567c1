//! Configuration types for the LBaaS client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: everything the transport needs to reach the API
//! - [`ClientConfigBuilder`]: fluent construction of [`ClientConfig`]
//! - [`AuthMode`]: pre-provisioned token + endpoint, or password credentials
//! - [`PasswordCredentials`]: identity-service login details
//! - [`ServiceUrl`] and [`Password`]: validated newtypes
//!
//! # Example
//!
//! ```rust
//! use lbaas_client::{AuthMode, ClientConfig, Password, PasswordCredentials, ServiceUrl};
//!
//! let config = ClientConfig::builder()
//!     .auth(AuthMode::PasswordCredentials(PasswordCredentials {
//!         auth_url: ServiceUrl::new("http://keystone:5000/v2.0").unwrap(),
//!         username: "admin".to_string(),
//!         password: Password::new("secret").unwrap(),
//!         tenant_name: "admin".to_string(),
//!         region_name: Some("RegionOne".to_string()),
//!     }))
//!     .build()
//!     .unwrap();
//!
//! assert!(config.auth().can_reauthenticate());
//! ```

mod newtypes;

pub use newtypes::{Password, ServiceUrl};

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CatalogEndpointResolver, EndpointResolver};
use crate::error::ConfigError;

/// Client identifier sent as `User-Agent` on every request.
pub const USER_AGENT: &str = concat!("lbaas-client/", env!("CARGO_PKG_VERSION"));

/// Credentials used to obtain a token from a Keystone-style identity service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordCredentials {
    /// Identity endpoint; tokens are requested from `<auth_url>/tokens`.
    pub auth_url: ServiceUrl,
    /// User name.
    pub username: String,
    /// User password (masked in `Debug`).
    pub password: Password,
    /// Tenant (project) to scope the token to.
    pub tenant_name: String,
    /// Region used to pick the LBaaS endpoint from the service catalog.
    pub region_name: Option<String>,
}

/// How the transport authenticates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// The caller already knows the endpoint and (optionally) a token.
    ///
    /// No authentication step ever runs; a 401 surfaces to the caller.
    PreProvisionedToken {
        /// LBaaS API endpoint.
        endpoint: ServiceUrl,
        /// Token attached as `X-Auth-Token`, if any.
        token: Option<String>,
    },
    /// Authenticate against an identity service, re-authenticating once on 401.
    PasswordCredentials(PasswordCredentials),
}

impl AuthMode {
    /// Returns `true` when a stale token can be replaced by authenticating again.
    #[must_use]
    pub const fn can_reauthenticate(&self) -> bool {
        matches!(self, Self::PasswordCredentials(_))
    }
}

/// Configuration for [`HttpClient`](crate::clients::HttpClient).
///
/// `ClientConfig` is `Clone`, `Send` and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    auth: AuthMode,
    timeout: Option<Duration>,
    insecure: bool,
    follow_redirects: bool,
    user_agent: String,
    endpoint_resolver: Arc<dyn EndpointResolver>,
    span: tracing::Span,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the authentication mode.
    #[must_use]
    pub const fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// Returns the socket-level timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns whether TLS certificate validation is disabled.
    #[must_use]
    pub const fn insecure(&self) -> bool {
        self.insecure
    }

    /// Returns whether API requests follow 301/302/305 redirects.
    ///
    /// Authentication requests always follow redirects.
    #[must_use]
    pub const fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the strategy used to pick an endpoint from the service catalog.
    #[must_use]
    pub fn endpoint_resolver(&self) -> &Arc<dyn EndpointResolver> {
        &self.endpoint_resolver
    }

    /// Returns the span every transport call is recorded under.
    #[must_use]
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for [`ClientConfig`].
///
/// Only `auth` is required.
///
/// # Defaults
///
/// - `timeout`: none (reqwest default)
/// - `insecure`: `false`
/// - `follow_redirects`: `true`
/// - `user_agent`: [`USER_AGENT`]
/// - `endpoint_resolver`: [`CatalogEndpointResolver`] for service type
///   `loadbalancer`, `adminURL`, in the credentials' region
/// - `span`: `info_span!("lbaas_client")`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    auth: Option<AuthMode>,
    timeout: Option<Duration>,
    insecure: Option<bool>,
    follow_redirects: Option<bool>,
    user_agent: Option<String>,
    endpoint_resolver: Option<Arc<dyn EndpointResolver>>,
    span: Option<tracing::Span>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authentication mode (required).
    #[must_use]
    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the connect/read timeout passed to the HTTP transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables TLS certificate validation.
    #[must_use]
    pub const fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Controls redirect following for API requests.
    #[must_use]
    pub const fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Injects the strategy used to select the API endpoint after authentication.
    #[must_use]
    pub fn endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.endpoint_resolver = Some(resolver);
        self
    }

    /// Sets the span that transport logging is recorded under.
    #[must_use]
    pub fn span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `auth` is not set, and
    /// [`ConfigError::EmptyCredential`] if password credentials lack a user name.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let auth = self
            .auth
            .ok_or(ConfigError::MissingRequiredField { field: "auth" })?;

        let region = match &auth {
            AuthMode::PasswordCredentials(credentials) => {
                if credentials.username.is_empty() {
                    return Err(ConfigError::EmptyCredential { field: "username" });
                }
                credentials.region_name.clone()
            }
            AuthMode::PreProvisionedToken { .. } => None,
        };

        let endpoint_resolver = self
            .endpoint_resolver
            .unwrap_or_else(|| Arc::new(CatalogEndpointResolver::new(region)));

        Ok(ClientConfig {
            auth,
            timeout: self.timeout,
            insecure: self.insecure.unwrap_or(false),
            follow_redirects: self.follow_redirects.unwrap_or(true),
            user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
            endpoint_resolver,
            span: self
                .span
                .unwrap_or_else(|| tracing::info_span!("lbaas_client")),
        })
    }
}
