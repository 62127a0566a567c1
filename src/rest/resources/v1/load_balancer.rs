//! Load balancers.
//!
//! # Example
//!
//! ```rust,ignore
//! use lbaas_client::rest::resources::v1::{LoadBalancerSpec, LoadBalancerUpdate};
//!
//! let lb = client
//!     .loadbalancers()
//!     .create(&LoadBalancerSpec::new("fake", "ROUNDROBIN", "HTTP"), Map::new())
//!     .await?;
//!
//! let update = LoadBalancerUpdate { algorithm: Some("LEASTCONNECTION".into()), ..Default::default() };
//! client.loadbalancers().update(&lb, &update, Map::new()).await?;
//! client.loadbalancers().delete(&lb).await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::resources::v1::{body_with_extra, VipSpec};
use crate::rest::{build_path, resolve_id, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/loadbalancers";
const ITEM_PATH: &str = "/loadbalancers/{id}";
const FIND_FOR_VM_PATH: &str = "/loadbalancers/find_for_VM/{id}";
const COLLECTION_KEY: &str = "loadbalancers";
const ITEM_KEY: &str = "loadbalancer";

/// A load balancer resource.
pub type LoadBalancer = Resource<LoadBalancerManager>;

/// Fields required to create a load balancer.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LoadBalancerSpec {
    /// Load balancer name.
    pub name: String,
    /// Balancing algorithm, e.g. `"ROUNDROBIN"`.
    pub algorithm: String,
    /// Balanced protocol, e.g. `"HTTP"`.
    pub protocol: String,
    /// Virtual IPs to create together with the load balancer.
    #[serde(rename = "virtualIps", skip_serializing_if = "Vec::is_empty")]
    pub virtual_ips: Vec<VipSpec>,
}

impl LoadBalancerSpec {
    /// Creates a spec without virtual IPs.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        algorithm: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            algorithm: algorithm.into(),
            protocol: protocol.into(),
            virtual_ips: Vec::new(),
        }
    }

    /// Adds a virtual IP to create with the load balancer.
    #[must_use]
    pub fn with_virtual_ip(mut self, vip: VipSpec) -> Self {
        self.virtual_ips.push(vip);
        self
    }
}

/// Fields to change on a load balancer; unset fields are not sent.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct LoadBalancerUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// New protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl LoadBalancerUpdate {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.algorithm.is_none() && self.protocol.is_none()
    }
}

/// Manager for `/loadbalancers`.
#[derive(Clone, Debug)]
pub struct LoadBalancerManager {
    client: Arc<HttpClient>,
}

impl LoadBalancerManager {
    pub(crate) const fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Lists all load balancers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<LoadBalancer>, ClientError> {
        self.list_at(COLLECTION_PATH, COLLECTION_KEY).await
    }

    /// Fetches one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] for a reference without id,
    /// or any request error.
    pub async fn get<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<LoadBalancer, ClientError> {
        let id = resolve_id(lb)?;
        self.get_at(&build_path(ITEM_PATH, &[("id", id.as_str())]), ITEM_KEY)
            .await
    }

    /// Lists the load balancers serving a virtual machine.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn get_for_vm<'a>(
        &self,
        server: impl Into<EntityRef<'a>>,
    ) -> Result<Vec<LoadBalancer>, ClientError> {
        let id = resolve_id(server)?;
        self.list_at(
            &build_path(FIND_FOR_VM_PATH, &[("id", id.as_str())]),
            COLLECTION_KEY,
        )
        .await
    }

    /// Creates a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn create(&self, spec: &LoadBalancerSpec, extra: Map) -> Result<LoadBalancer, ClientError> {
        let body = body_with_extra(spec, extra)?;
        self.create_at(COLLECTION_PATH, Value::Object(body), ITEM_KEY)
            .await
    }

    /// Updates a load balancer.
    ///
    /// Returns `Ok(None)` when the server answers without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn update<'a>(
        &self,
        lb: impl Into<EntityRef<'a>>,
        update: &LoadBalancerUpdate,
        extra: Map,
    ) -> Result<Option<LoadBalancer>, ClientError> {
        let id = resolve_id(lb)?;
        let body = body_with_extra(update, extra)?;
        self.update_at(
            &build_path(ITEM_PATH, &[("id", id.as_str())]),
            Some(Value::Object(body)),
            ITEM_KEY,
        )
        .await
    }

    /// Deletes a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, lb: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let id = resolve_id(lb)?;
        self.delete_at(&build_path(ITEM_PATH, &[("id", id.as_str())])).await
    }
}

impl Manager for LoadBalancerManager {
    const KIND: &'static str = "LoadBalancer";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<LoadBalancer>, ClientError> {
        self.get(id).await.map(Some)
    }
}
