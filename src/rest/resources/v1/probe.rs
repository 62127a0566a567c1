//! Health probes of a load balancer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::resources::v1::body_with_extra;
use crate::rest::{build_path, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/loadbalancers/{lb_id}/healthMonitoring";
const ITEM_PATH: &str = "/loadbalancers/{lb_id}/healthMonitoring/{id}";
const KEY: &str = "healthMonitoring";

/// A health probe resource.
pub type Probe = Resource<ProbeManager>;

/// Fields of a new probe.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Probe name.
    pub name: String,
    /// Probe type, e.g. `"HTTP"` or `"ICMP"`.
    #[serde(rename = "type")]
    pub probe_type: String,
}

impl ProbeSpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(name: impl Into<String>, probe_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            probe_type: probe_type.into(),
        }
    }
}

/// Manager for the health probes of one load balancer.
#[derive(Clone, Debug)]
pub struct ProbeManager {
    client: Arc<HttpClient>,
    lb_id: String,
}

impl ProbeManager {
    pub(crate) const fn new(client: Arc<HttpClient>, lb_id: String) -> Self {
        Self { client, lb_id }
    }

    fn collection_path(&self) -> String {
        build_path(COLLECTION_PATH, &[("lb_id", self.lb_id.as_str())])
    }

    fn item_path(&self, probe: EntityRef<'_>) -> Result<String, ClientError> {
        let id = probe.resolve_id()?;
        Ok(build_path(
            ITEM_PATH,
            &[("lb_id", self.lb_id.as_str()), ("id", id.as_str())],
        ))
    }

    /// Lists the probes of the load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<Probe>, ClientError> {
        self.list_at(&self.collection_path(), KEY).await
    }

    /// Fetches one probe.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn get<'a>(&self, probe: impl Into<EntityRef<'a>>) -> Result<Probe, ClientError> {
        let path = self.item_path(probe.into())?;
        self.get_at(&path, KEY).await
    }

    /// Adds a probe.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn create(&self, spec: &ProbeSpec, extra: Map) -> Result<Probe, ClientError> {
        let probe = body_with_extra(spec, extra)?;
        let mut body = Map::new();
        body.insert(KEY.to_string(), Value::Object(probe));
        self.create_at(&self.collection_path(), Value::Object(body), KEY)
            .await
    }

    /// Removes a probe.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, probe: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let path = self.item_path(probe.into())?;
        self.delete_at(&path).await
    }
}

impl Manager for ProbeManager {
    const KIND: &'static str = "Probe";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<Probe>, ClientError> {
        self.get(id).await.map(Some)
    }
}
