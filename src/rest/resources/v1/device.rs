//! Load balancer devices.
//!
//! Devices are the appliances that actually carry the traffic. They live
//! on the admin endpoint, together with the lists of supported algorithms
//! and protocols.
//!
//! # Example
//!
//! ```rust,ignore
//! let devices = client.devices().list().await?;
//! let algorithms = client.devices().list_algorithms().await?;
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ClientError, HttpClient};
use crate::rest::resources::v1::body_with_extra;
use crate::rest::{build_path, resolve_id, EntityRef, Manager, Map, Resource};

const COLLECTION_PATH: &str = "/devices";
const ITEM_PATH: &str = "/devices/{id}";
const COLLECTION_KEY: &str = "devices";
const ITEM_KEY: &str = "device";

/// A device resource.
pub type Device = Resource<DeviceManager>;

/// Fields required to register a device.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct DeviceSpec {
    /// Device name.
    pub name: String,
    /// Device type (driver), e.g. `"HAPROXY"`.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Device software version.
    pub version: String,
    /// Management address.
    pub ip: String,
    /// Management port.
    pub port: u16,
    /// Account name on the device.
    pub user: String,
    /// Account password on the device.
    pub password: String,
}

impl fmt::Debug for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSpec")
            .field("name", &self.name)
            .field("device_type", &self.device_type)
            .field("version", &self.version)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"*****")
            .finish()
    }
}

/// Manager for `/devices`.
#[derive(Clone, Debug)]
pub struct DeviceManager {
    client: Arc<HttpClient>,
}

impl DeviceManager {
    pub(crate) const fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Lists all devices.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a malformed envelope.
    pub async fn list(&self) -> Result<Vec<Device>, ClientError> {
        self.list_at(COLLECTION_PATH, COLLECTION_KEY).await
    }

    /// Fetches one device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] for a reference without id,
    /// or any request error.
    pub async fn get<'a>(&self, device: impl Into<EntityRef<'a>>) -> Result<Device, ClientError> {
        let id = resolve_id(device)?;
        self.get_at(&build_path(ITEM_PATH, &[("id", id.as_str())]), ITEM_KEY)
            .await
    }

    /// Registers a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn create(&self, spec: &DeviceSpec, extra: Map) -> Result<Device, ClientError> {
        let body = body_with_extra(spec, extra)?;
        self.create_at(COLLECTION_PATH, Value::Object(body), ITEM_KEY)
            .await
    }

    /// Removes a device.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn delete<'a>(&self, device: impl Into<EntityRef<'a>>) -> Result<(), ClientError> {
        let id = resolve_id(device)?;
        self.delete_at(&build_path(ITEM_PATH, &[("id", id.as_str())])).await
    }

    /// Returns the balancing algorithms the service supports.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn list_algorithms(&self) -> Result<Value, ClientError> {
        self.get_raw("/algorithms", "algorithms").await
    }

    /// Returns the protocols the service supports.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn list_protocols(&self) -> Result<Value, ClientError> {
        self.get_raw("/protocols", "protocols").await
    }

    /// Returns every virtual IP known to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on request failure.
    pub async fn list_vips(&self) -> Result<Value, ClientError> {
        self.get_raw("/vips", "vips").await
    }
}

impl Manager for DeviceManager {
    const KIND: &'static str = "Device";

    fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn fetch(&self, id: &str) -> Result<Option<Device>, ClientError> {
        self.get(id).await.map(Some)
    }
}
