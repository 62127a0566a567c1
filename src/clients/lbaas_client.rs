//! The entry point of the library: one manager per resource kind.

use std::sync::Arc;

use crate::auth::AuthSession;
use crate::clients::{ClientError, HttpClient};
use crate::config::ClientConfig;
use crate::rest::resources::v1::{
    DeviceManager, LoadBalancerManager, NodeManager, ProbeManager, StickyManager, VipManager,
};
use crate::rest::{resolve_id, EntityRef};

/// Client for the LBaaS v1 API.
///
/// Cheap to clone; all clones and all managers share one transport.
///
/// # Example
///
/// ```rust,ignore
/// use lbaas_client::{AuthMode, ClientConfig, LbaasClient, ServiceUrl};
///
/// let config = ClientConfig::builder()
///     .auth(AuthMode::PreProvisionedToken {
///         endpoint: ServiceUrl::new("http://localhost:8181")?,
///         token: Some("token".to_string()),
///     })
///     .build()?;
/// let client = LbaasClient::new(config)?;
///
/// let lbs = client.loadbalancers().list().await?;
/// let nodes = client.nodes(&lbs[0])?.list().await?;
/// ```
#[derive(Clone, Debug)]
pub struct LbaasClient {
    http_client: Arc<HttpClient>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LbaasClient>();
};

impl LbaasClient {
    /// Creates a client and its transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::from_http_client(Arc::new(HttpClient::new(config)?)))
    }

    /// Wraps an existing transport.
    #[must_use]
    pub const fn from_http_client(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    /// Returns the shared transport.
    #[must_use]
    pub const fn http_client(&self) -> &Arc<HttpClient> {
        &self.http_client
    }

    /// Returns a snapshot of the current authentication state.
    pub async fn auth_session(&self) -> Option<AuthSession> {
        self.http_client.auth_session().await
    }

    /// Devices, algorithms and protocols.
    #[must_use]
    pub fn devices(&self) -> DeviceManager {
        DeviceManager::new(Arc::clone(&self.http_client))
    }

    /// Load balancers.
    #[must_use]
    pub fn loadbalancers(&self) -> LoadBalancerManager {
        LoadBalancerManager::new(Arc::clone(&self.http_client))
    }

    /// Nodes of the load balancer `lb`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] if `lb` has no id.
    pub fn nodes<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<NodeManager, ClientError> {
        Ok(NodeManager::new(Arc::clone(&self.http_client), resolve_id(lb)?))
    }

    /// Health probes of the load balancer `lb`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] if `lb` has no id.
    pub fn probes<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<ProbeManager, ClientError> {
        Ok(ProbeManager::new(Arc::clone(&self.http_client), resolve_id(lb)?))
    }

    /// Session persistence policies of the load balancer `lb`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] if `lb` has no id.
    pub fn stickies<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<StickyManager, ClientError> {
        Ok(StickyManager::new(Arc::clone(&self.http_client), resolve_id(lb)?))
    }

    /// Virtual IPs of the load balancer `lb`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] if `lb` has no id.
    pub fn vips<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<VipManager, ClientError> {
        Ok(VipManager::new(Arc::clone(&self.http_client), resolve_id(lb)?))
    }
}
