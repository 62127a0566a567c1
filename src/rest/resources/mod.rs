//! Resource-specific managers, organized by API version.
//!
//! ```text
//! resources/
//!   mod.rs     <- This file (re-exports the current version)
//!   v1/
//!     mod.rs   <- LBaaS v1 managers
//! ```
//!
//! The current version is re-exported here:
//!
//! ```rust,ignore
//! use lbaas_client::rest::resources::{LoadBalancerSpec, NodeSpec};
//! // or explicitly:
//! use lbaas_client::rest::resources::v1::LoadBalancerSpec;
//! ```

pub mod v1;

pub use v1::*;
