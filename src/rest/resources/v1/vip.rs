//! Virtual IPs of a load balancer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::resources::v1::body_with_extra;
use crate::rest::{build_path, resolve_id, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/loadbalancers/{lb_id}/virtualIps";
const ITEM_PATH: &str = "/loadbalancers/{lb_id}/virtualIps/{id}";
const COLLECTION_KEY: &str = "virtualIps";
const ITEM_KEY: &str = "virtualIp";

/// A virtual IP resource.
pub type Vip = Resource<VipManager>;

/// Fields of a new virtual IP.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VipSpec {
    /// VIP name.
    pub name: String,
    /// IP address.
    pub address: String,
    /// Network mask.
    pub mask: String,
    /// Listening port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// VIP type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vip_type: Option<String>,
    /// VLAN tag.
    #[serde(rename = "VLAN", skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

impl VipSpec {
    /// Creates a spec with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            mask: mask.into(),
            port: None,
            vip_type: None,
            vlan: None,
        }
    }

    /// Sets the listening port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the VIP type.
    #[must_use]
    pub fn vip_type(mut self, vip_type: impl Into<String>) -> Self {
        self.vip_type = Some(vip_type.into());
        self
    }

    /// Sets the VLAN tag.
    #[must_use]
    pub const fn vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }
}

/// Fields to change on a virtual IP; unset fields are not sent.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct VipUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New mask.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// New port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// New type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vip_type: Option<String>,
    /// New VLAN tag.
    #[serde(rename = "VLAN", skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

impl VipUpdate {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.mask.is_none()
            && self.port.is_none()
            && self.vip_type.is_none()
            && self.vlan.is_none()
    }
}

/// Manager for the virtual IPs of one load balancer.
#[derive(Clone, Debug)]
pub struct VipManager {
    client: Arc<HttpClient>,
    lb_id: String,
}

impl VipManager {
    pub(crate) const fn new(client: Arc<HttpClient>, lb_id: String) -> Self {
        Self { client, lb_id }
    }

    /// Returns the id of the load balancer this manager is scoped to.
    #[must_use]
    pub fn lb_id(&self) -> &str {
        &self.lb_id
    }

    fn item_path(&self, vip: EntityRef<'_>) -> Result<String, ClientError> {
        let id = vip.resolve_id()?;
        Ok(build_path(
            ITEM_PATH,
            &[("lb_id", self.lb_id.as_str()), ("id", id.as_str())],
        ))
    }

    fn collection_path(&self) -> String {
        build_path(COLLECTION_PATH, &[("lb_id", self.lb_id.as_str())])
    }

    /// Lists the virtual IPs of the load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<Vip>, ClientError> {
        self.list_at(&self.collection_path(), COLLECTION_KEY).await
    }

    /// Fetches one virtual IP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn get<'a>(&self, vip: impl Into<EntityRef<'a>>) -> Result<Vip, ClientError> {
        let path = self.item_path(vip.into())?;
        self.get_at(&path, ITEM_KEY).await
    }

    /// Adds a virtual IP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn create(&self, spec: &VipSpec, extra: Map) -> Result<Vip, ClientError> {
        let vip = body_with_extra(spec, extra)?;
        let mut body = Map::new();
        body.insert(ITEM_KEY.to_string(), Value::Object(vip));
        self.create_at(&self.collection_path(), Value::Object(body), ITEM_KEY)
            .await
    }

    /// Updates a virtual IP.
    ///
    /// Returns `Ok(None)` when the server answers without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn update<'a>(
        &self,
        vip: impl Into<EntityRef<'a>>,
        update: &VipUpdate,
        extra: Map,
    ) -> Result<Option<Vip>, ClientError> {
        let path = self.item_path(vip.into())?;
        let body = body_with_extra(update, extra)?;
        self.update_at(&path, Some(Value::Object(body)), ITEM_KEY)
            .await
    }

    /// Removes a virtual IP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, vip: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let path = self.item_path(vip.into())?;
        self.delete_at(&path).await
    }
}

impl Manager for VipManager {
    const KIND: &'static str = "VirtualIp";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<Vip>, ClientError> {
        self.get(id).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vlan_is_serialized_uppercase() {
        let spec = VipSpec::new("vip1", "10.0.0.10", "255.255.255.0")
            .port(80)
            .vip_type("public")
            .vlan(200);
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            json!({"name": "vip1", "address": "10.0.0.10", "mask": "255.255.255.0",
                   "port": 80, "type": "public", "VLAN": 200})
        );
    }

    #[test]
    fn test_update_drops_unset_fields() {
        let update = VipUpdate {
            port: Some(8080),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"port": 8080}));
        assert!(VipUpdate::default().is_empty());
    }
}
