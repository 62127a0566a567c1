//! Authentication against a Keystone-style identity service.
//!
//! # Overview
//!
//! - [`ServiceCatalog`]: the `access` document returned by `POST /tokens`
//! - [`TokenInfo`]: the token record (`id`, `tenant_id`, `user_id`, `expires`)
//! - [`AuthSession`]: token + selected endpoint, as held by the transport
//! - [`EndpointResolver`]: strategy that picks the API endpoint from a catalog
//! - [`CatalogEndpointResolver`]: the default strategy (service type + region + endpoint type)
//!
//! The request itself is issued by
//! [`HttpClient::authenticate`](crate::clients::HttpClient::authenticate).
//!
//! # Example
//!
//! ```rust
//! use lbaas_client::auth::{CatalogEndpointResolver, EndpointResolver, EndpointType, ServiceCatalog};
//! use serde_json::json;
//!
//! let body = json!({"access": {
//!     "token": {"id": "tok"},
//!     "serviceCatalog": [{"type": "loadbalancer",
//!                         "endpoints": [{"region": "RegionOne", "adminURL": "http://lb:8181"}]}]
//! }});
//! let catalog = ServiceCatalog::from_response(&body).unwrap();
//!
//! let resolver = CatalogEndpointResolver::new(Some("RegionOne".to_string()));
//! assert_eq!(resolver.resolve(&catalog).unwrap(), "http://lb:8181");
//! ```

mod catalog;
mod session;

pub use catalog::{EndpointType, ServiceCatalog, TokenInfo};
pub use session::AuthSession;

use std::fmt;

use crate::clients::ClientError;

/// Default catalog service type of the LBaaS API.
pub const DEFAULT_SERVICE_TYPE: &str = "loadbalancer";

/// Picks the API endpoint out of a freshly obtained service catalog.
///
/// Injected into the transport through
/// [`ClientConfigBuilder::endpoint_resolver`](crate::ClientConfigBuilder::endpoint_resolver).
pub trait EndpointResolver: fmt::Debug + Send + Sync {
    /// Returns the base URL API paths are appended to.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthorizationFailure`] when the catalog has no
    /// suitable endpoint.
    fn resolve(&self, catalog: &ServiceCatalog) -> Result<String, ClientError>;
}

/// Selects an endpoint by service type, region and endpoint type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEndpointResolver {
    service_type: String,
    region: Option<String>,
    endpoint_type: EndpointType,
}

impl CatalogEndpointResolver {
    /// Creates a resolver for the `loadbalancer` admin endpoint in `region`.
    #[must_use]
    pub fn new(region: Option<String>) -> Self {
        Self {
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            region,
            endpoint_type: EndpointType::Admin,
        }
    }

    /// Overrides the catalog service type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Overrides the endpoint type.
    #[must_use]
    pub const fn with_endpoint_type(mut self, endpoint_type: EndpointType) -> Self {
        self.endpoint_type = endpoint_type;
        self
    }
}

impl EndpointResolver for CatalogEndpointResolver {
    fn resolve(&self, catalog: &ServiceCatalog) -> Result<String, ClientError> {
        catalog.url_for(
            "region",
            self.region.as_deref(),
            &self.service_type,
            self.endpoint_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::from_response(&json!({"access": {
            "token": {"id": "tok"},
            "serviceCatalog": [
                {"type": "loadbalancer", "endpoints": [
                    {"region": "RegionOne", "adminURL": "http://admin:8181", "internalURL": "http://internal:8181"}
                ]},
                {"type": "balancer-v2", "endpoints": [
                    {"region": "RegionOne", "adminURL": "http://v2:8181"}
                ]}
            ]
        }}))
        .unwrap()
    }

    #[test]
    fn test_default_resolver_uses_admin_url() {
        let resolver = CatalogEndpointResolver::new(Some("RegionOne".to_string()));
        assert_eq!(resolver.resolve(&catalog()).unwrap(), "http://admin:8181");
    }

    #[test]
    fn test_resolver_overrides() {
        let resolver = CatalogEndpointResolver::new(None).with_endpoint_type(EndpointType::Internal);
        assert_eq!(resolver.resolve(&catalog()).unwrap(), "http://internal:8181");

        let resolver = CatalogEndpointResolver::new(None).with_service_type("balancer-v2");
        assert_eq!(resolver.resolve(&catalog()).unwrap(), "http://v2:8181");
    }

    #[test]
    fn test_resolver_for_unknown_region_fails() {
        let resolver = CatalogEndpointResolver::new(Some("RegionNine".to_string()));
        assert!(matches!(
            resolver.resolve(&catalog()),
            Err(ClientError::AuthorizationFailure { .. })
        ));
    }
}
