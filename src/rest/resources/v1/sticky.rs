//! Session persistence ("sticky") policies of a load balancer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::resources::v1::body_with_extra;
use crate::rest::{build_path, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/loadbalancers/{lb_id}/sessionPersistence";
const ITEM_PATH: &str = "/loadbalancers/{lb_id}/sessionPersistence/{id}";
const KEY: &str = "sessionPersistence";

/// A session persistence resource.
pub type Sticky = Resource<StickyManager>;

/// Fields of a new persistence policy.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StickySpec {
    /// Policy name.
    pub name: String,
    /// Persistence type, e.g. `"HTTP_COOKIE"`.
    #[serde(rename = "type")]
    pub sticky_type: String,
}

impl StickySpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(name: impl Into<String>, sticky_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sticky_type: sticky_type.into(),
        }
    }
}

/// Manager for the persistence policies of one load balancer.
#[derive(Clone, Debug)]
pub struct StickyManager {
    client: Arc<HttpClient>,
    lb_id: String,
}

impl StickyManager {
    pub(crate) const fn new(client: Arc<HttpClient>, lb_id: String) -> Self {
        Self { client, lb_id }
    }

    fn collection_path(&self) -> String {
        build_path(COLLECTION_PATH, &[("lb_id", self.lb_id.as_str())])
    }

    fn item_path(&self, sticky: EntityRef<'_>) -> Result<String, ClientError> {
        let id = sticky.resolve_id()?;
        Ok(build_path(
            ITEM_PATH,
            &[("lb_id", self.lb_id.as_str()), ("id", id.as_str())],
        ))
    }

    /// Lists the persistence policies of the load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<Sticky>, ClientError> {
        self.list_at(&self.collection_path(), KEY).await
    }

    /// Fetches one policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn get<'a>(&self, sticky: impl Into<EntityRef<'a>>) -> Result<Sticky, ClientError> {
        let path = self.item_path(sticky.into())?;
        self.get_at(&path, KEY).await
    }

    /// Adds a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn create(&self, spec: &StickySpec, extra: Map) -> Result<Sticky, ClientError> {
        let sticky = body_with_extra(spec, extra)?;
        let mut body = Map::new();
        body.insert(KEY.to_string(), Value::Object(sticky));
        self.create_at(&self.collection_path(), Value::Object(body), KEY)
            .await
    }

    /// Removes a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, sticky: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let path = self.item_path(sticky.into())?;
        self.delete_at(&path).await
    }
}

impl Manager for StickyManager {
    const KIND: &'static str = "Sticky";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<Sticky>, ClientError> {
        self.get(id).await.map(Some)
    }
}
