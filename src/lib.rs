//! # LBaaS client
//!
//! A client library for an OpenStack-style Load-Balancer-as-a-Service API,
//! plus the `lbaas` command-line tool built on it.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Two authentication modes ([`AuthMode`]): a pre-provisioned token and
//!   endpoint, or password credentials against a Keystone v2 identity service
//! - An async transport ([`HttpClient`]) that follows redirects, maps error
//!   statuses to [`ClientError`] and re-authenticates once on 401
//! - Generic CRUD managers ([`rest::Manager`]) and lazily-loaded resources
//!   ([`rest::Resource`])
//! - Managers for devices, load balancers, nodes, health probes, session
//!   persistence policies and virtual IPs, reached through [`LbaasClient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use lbaas_client::{AuthMode, ClientConfig, Password, PasswordCredentials, ServiceUrl};
//!
//! let config = ClientConfig::builder()
//!     .auth(AuthMode::PasswordCredentials(PasswordCredentials {
//!         auth_url: ServiceUrl::new("http://keystone:5000/v2.0").unwrap(),
//!         username: "admin".to_string(),
//!         password: Password::new("secret").unwrap(),
//!         tenant_name: "admin".to_string(),
//!         region_name: Some("RegionOne".to_string()),
//!     }))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Working with resources
//!
//! ```rust,ignore
//! use lbaas_client::{LbaasClient, rest::Map};
//! use lbaas_client::rest::resources::{LoadBalancerSpec, NodeSpec};
//!
//! let client = LbaasClient::new(config)?;
//!
//! let mut lb = client
//!     .loadbalancers()
//!     .create(&LoadBalancerSpec::new("fake", "ROUNDROBIN", "HTTP"), Map::new())
//!     .await?;
//!
//! // Fields missing from the create response are fetched once, on demand.
//! println!("status: {}", lb.get("status").await?);
//!
//! let nodes = client.nodes(&lb)?;
//! nodes.create(&NodeSpec::new("web1", "HW", "10.0.0.5", 80, 10, "enabled"), Map::new()).await?;
//!
//! client.loadbalancers().delete(&lb).await?;
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing`. Every transport call is recorded under
//! the span given to [`ClientConfigBuilder::span`]; tokens are masked.

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{
    AuthMode, ClientConfig, ClientConfigBuilder, Password, PasswordCredentials, ServiceUrl,
    USER_AGENT,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ClientError, DataType, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    LbaasClient,
};
pub use rest::{resolve_id, EntityRef, Manager, Resource};
