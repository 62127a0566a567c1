//! Nodes (real servers) behind a load balancer.
//!
//! The name of the field that carries a node's state differs between server
//! revisions (`condition` or `status`). [`NodeSpec::state_field`] and
//! [`NodeUpdate::state_field`] hold it, defaulting to [`DEFAULT_STATE_FIELD`].
//!
//! # Example
//!
//! ```rust,ignore
//! let nodes = client.nodes("fakeid")?;
//! let node = nodes
//!     .create(&NodeSpec::new("web1", "HW", "10.0.0.5", 80, 10, "enabled"), Map::new())
//!     .await?;
//! nodes.update_status(&node, "disabled").await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::manager::into_map;
use crate::rest::resources::v1::body_with_extra;
use crate::rest::{build_path, resolve_id, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/loadbalancers/{lb_id}/nodes";
const ITEM_PATH: &str = "/loadbalancers/{lb_id}/nodes/{id}";
const STATUS_PATH: &str = "/loadbalancers/{lb_id}/nodes/{id}/{status}";
const COLLECTION_KEY: &str = "nodes";
const ITEM_KEY: &str = "node";

/// Field name used for the node state unless overridden.
pub const DEFAULT_STATE_FIELD: &str = "condition";

/// A node resource.
pub type Node = Resource<NodeManager>;

/// Fields of a new node.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NodeSpec {
    /// Node name.
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Address traffic is sent to.
    pub address: String,
    /// Port traffic is sent to.
    pub port: u16,
    /// Balancing weight.
    pub weight: u32,
    /// Initial state (e.g. `"enabled"`).
    #[serde(skip)]
    pub state: String,
    /// Body field the state is sent under.
    #[serde(skip)]
    pub state_field: String,
}

impl NodeSpec {
    /// Creates a spec whose state is sent as [`DEFAULT_STATE_FIELD`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        node_type: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        weight: u32,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            address: address.into(),
            port,
            weight,
            state: state.into(),
            state_field: DEFAULT_STATE_FIELD.to_string(),
        }
    }

    /// Sends the state under a different field name.
    #[must_use]
    pub fn with_state_field(mut self, field: impl Into<String>) -> Self {
        self.state_field = field.into();
        self
    }

    fn to_body(&self, extra: Map) -> Result<Map, ClientError> {
        let mut state = Map::new();
        state.insert(self.state_field.clone(), Value::String(self.state.clone()));
        state.extend(extra);
        body_with_extra(self, state)
    }
}

/// Fields to change on a node; unset fields are not sent.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct NodeUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// New address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// New weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// New state, sent under [`NodeUpdate::state_field`].
    #[serde(skip)]
    pub state: Option<String>,
    /// Body field the state is sent under; [`DEFAULT_STATE_FIELD`] when unset.
    #[serde(skip)]
    pub state_field: Option<String>,
}

impl NodeUpdate {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.node_type.is_none()
            && self.address.is_none()
            && self.port.is_none()
            && self.weight.is_none()
            && self.state.is_none()
    }

    fn to_body(&self, extra: Map) -> Result<Map, ClientError> {
        let mut state = Map::new();
        if let Some(value) = &self.state {
            let field = self.state_field.as_deref().unwrap_or(DEFAULT_STATE_FIELD);
            state.insert(field.to_string(), Value::String(value.clone()));
        }
        state.extend(extra);
        body_with_extra(self, state)
    }
}

/// Manager for the nodes of one load balancer.
#[derive(Clone, Debug)]
pub struct NodeManager {
    client: Arc<HttpClient>,
    lb_id: String,
}

impl NodeManager {
    pub(crate) const fn new(client: Arc<HttpClient>, lb_id: String) -> Self {
        Self { client, lb_id }
    }

    /// Returns the id of the load balancer this manager is scoped to.
    #[must_use]
    pub fn lb_id(&self) -> &str {
        &self.lb_id
    }

    fn collection_path(&self) -> String {
        build_path(COLLECTION_PATH, &[("lb_id", self.lb_id.as_str())])
    }

    fn item_path(&self, node: EntityRef<'_>) -> Result<String, ClientError> {
        let id = node.resolve_id()?;
        Ok(build_path(
            ITEM_PATH,
            &[("lb_id", self.lb_id.as_str()), ("id", id.as_str())],
        ))
    }

    /// Lists the nodes of the load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<Node>, ClientError> {
        self.list_at(&self.collection_path(), COLLECTION_KEY).await
    }

    /// Fetches one node.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn get<'a>(&self, node: impl Into<EntityRef<'a>>) -> Result<Node, ClientError> {
        let path = self.item_path(node.into())?;
        self.get_at(&path, ITEM_KEY).await
    }

    /// Adds one node.
    ///
    /// The server takes a list; exactly one node is sent and the first
    /// element of the returned list is wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] if the response holds no node,
    /// or any request error.
    pub async fn create(&self, spec: &NodeSpec, extra: Map) -> Result<Node, ClientError> {
        let node = spec.to_body(extra)?;
        let mut body = Map::new();
        body.insert(
            COLLECTION_KEY.to_string(),
            Value::Array(vec![Value::Object(node)]),
        );

        let created = self
            .create_raw(&self.collection_path(), Value::Object(body), COLLECTION_KEY)
            .await?;
        let first = match created {
            Value::Array(items) => items.into_iter().next(),
            _ => None,
        }
        .ok_or_else(|| ClientError::MissingEnvelope {
            key: COLLECTION_KEY.to_string(),
        })?;

        Ok(Resource::new(self.clone(), into_map(first, COLLECTION_KEY)?, false))
    }

    /// Updates a node.
    ///
    /// Returns `Ok(None)` when the server answers without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn update<'a>(
        &self,
        node: impl Into<EntityRef<'a>>,
        update: &NodeUpdate,
        extra: Map,
    ) -> Result<Option<Node>, ClientError> {
        let path = self.item_path(node.into())?;
        let body = update.to_body(extra)?;
        self.update_at(&path, Some(Value::Object(body)), ITEM_KEY)
            .await
    }

    /// Moves a node to `status` (e.g. `"enabled"`, `"disabled"`).
    ///
    /// The request has no body; a bodiless answer yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn update_status<'a>(
        &self,
        node: impl Into<EntityRef<'a>>,
        status: &str,
    ) -> Result<Option<Node>, ClientError> {
        let id = resolve_id(node)?;
        let path = build_path(
            STATUS_PATH,
            &[
                ("lb_id", self.lb_id.as_str()),
                ("id", id.as_str()),
                ("status", status),
            ],
        );
        self.update_at(&path, None, ITEM_KEY).await
    }

    /// Removes a node.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, node: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let path = self.item_path(node.into())?;
        self.delete_at(&path).await
    }
}

impl Manager for NodeManager {
    const KIND: &'static str = "Node";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<Node>, ClientError> {
        self.get(id).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_state_uses_condition_by_default() {
        let spec = NodeSpec::new("web1", "HW", "10.0.0.5", 80, 10, "enabled");
        let body = spec.to_body(Map::new()).unwrap();
        assert_eq!(
            Value::Object(body),
            json!({"name": "web1", "type": "HW", "address": "10.0.0.5",
                   "port": 80, "weight": 10, "condition": "enabled"})
        );
    }

    #[test]
    fn test_node_state_field_is_configurable() {
        let spec = NodeSpec::new("web1", "HW", "10.0.0.5", 80, 10, "enabled").with_state_field("status");
        let body = spec.to_body(Map::new()).unwrap();
        assert_eq!(body.get("status"), Some(&json!("enabled")));
        assert!(body.get("condition").is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(NodeUpdate::default().is_empty());
        let update = NodeUpdate {
            weight: Some(5),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(Value::Object(update.to_body(Map::new()).unwrap()), json!({"weight": 5}));
    }

    #[test]
    fn test_update_state_follows_state_field() {
        let update = NodeUpdate {
            state: Some("disabled".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Value::Object(update.to_body(Map::new()).unwrap()),
            json!({"condition": "disabled"})
        );

        let update = NodeUpdate {
            state_field: Some("status".to_string()),
            ..update
        };
        assert_eq!(
            Value::Object(update.to_body(Map::new()).unwrap()),
            json!({"status": "disabled"})
        );
    }
}
