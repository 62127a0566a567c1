//! The resource/manager object model.
//!
//! - [`Manager`]: generic CRUD operations parameterized by path and envelope key
//! - [`Resource`]: a lazily-loaded bag of fields owned by a manager
//! - [`EntityRef`] and [`resolve_id`]: accept a resource or a bare id interchangeably
//! - [`build_path`]: fills `{name}` placeholders of path templates
//! - [`resources`]: the resource-specific managers
//!
//! # Example
//!
//! ```rust,ignore
//! use lbaas_client::LbaasClient;
//!
//! let client = LbaasClient::new(config)?;
//! for mut lb in client.loadbalancers().list().await? {
//!     println!("{} {}", lb.id().unwrap_or_default(), lb.get("name").await?);
//! }
//! ```

mod manager;
mod path;
mod resource;
pub mod resources;

pub use manager::Manager;
pub use path::build_path;
pub use resource::{resolve_id, EntityRef, Map, Resource};
