//! Resource managers of the LBaaS v1 API.
//!
//! Field and envelope names follow the v1 server exactly and are kept as
//! per-kind constants rather than unified across kinds.
//!
//! | Manager | Collection | Item key |
//! |---------|------------|----------|
//! | [`DeviceManager`] | `/devices` | `device` |
//! | [`LoadBalancerManager`] | `/loadbalancers` | `loadbalancer` |
//! | [`NodeManager`] | `/loadbalancers/{lb_id}/nodes` | `node` |
//! | [`ProbeManager`] | `/loadbalancers/{lb_id}/healthMonitoring` | `healthMonitoring` |
//! | [`StickyManager`] | `/loadbalancers/{lb_id}/sessionPersistence` | `sessionPersistence` |
//! | [`VipManager`] | `/loadbalancers/{lb_id}/virtualIps` | `virtualIp` |
//!
//! Managers under a load balancer are scoped to it: the load balancer id is
//! resolved once when the manager is created, so resources they return can
//! re-fetch themselves.

mod device;
mod load_balancer;
mod node;
mod probe;
mod sticky;
mod vip;

pub use device::{Device, DeviceManager, DeviceSpec};
pub use load_balancer::{LoadBalancer, LoadBalancerManager, LoadBalancerSpec, LoadBalancerUpdate};
pub use node::{Node, NodeManager, NodeSpec, NodeUpdate, DEFAULT_STATE_FIELD};
pub use probe::{Probe, ProbeManager, ProbeSpec};
pub use sticky::{Sticky, StickyManager, StickySpec};
pub use vip::{Vip, VipManager, VipSpec, VipUpdate};

use serde::Serialize;
use serde_json::Value;

use crate::clients::ClientError;
use crate::rest::Map;

/// Serializes a typed body and merges caller-supplied extra properties.
///
/// Extra properties win over typed fields of the same name.
pub(crate) fn body_with_extra<T: Serialize>(spec: &T, extra: Map) -> Result<Map, ClientError> {
    let mut body = match serde_json::to_value(spec)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    body.extend(extra);
    Ok(body)
}
