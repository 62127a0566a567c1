//! The lazily-loaded resource object model.
//!
//! A [`Resource`] is a bag of JSON fields describing one remote entity. It
//! remembers the [`Manager`] that produced it, so a lookup of a field that
//! has not been materialized yet can fetch the canonical representation once.
//!
//! # Loading rules
//!
//! - a field that is present is returned without any network call
//! - a missing field on a resource that was never loaded triggers exactly one
//!   [`Resource::refresh`], then the lookup is retried once
//! - a missing field on a loaded resource is [`ClientError::AttributeNotFound`]
//!
//! `refresh` marks the resource as loaded before touching the network, so a
//! failed fetch is never attempted again.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut lb = client.loadbalancers().get("fakeid").await?;
//! let algorithm = lb.get("algorithm").await?;   // GET /loadbalancers/fakeid at most once
//! ```

use std::fmt;

use serde_json::Value;

use crate::clients::ClientError;
use crate::rest::Manager;

/// Field name to value mapping of a resource.
pub type Map = serde_json::Map<String, Value>;

/// One remote entity of the kind managed by `M`.
///
/// Two resources are equal when both carry an `id` and the ids match;
/// otherwise when their last fetched field mappings are identical. Resources
/// of different kinds have different types and cannot be compared.
#[derive(Clone)]
pub struct Resource<M: Manager> {
    manager: M,
    info: Map,
    fields: Map,
    loaded: bool,
}

impl<M: Manager> Resource<M> {
    /// Wraps a decoded JSON object.
    ///
    /// Pass `loaded = true` when the object is known to be complete; such a
    /// resource never fetches itself.
    #[must_use]
    pub fn new(manager: M, info: Map, loaded: bool) -> Self {
        Self {
            manager,
            fields: info.clone(),
            info,
            loaded,
        }
    }

    /// Returns the manager this resource belongs to.
    #[must_use]
    pub const fn manager(&self) -> &M {
        &self.manager
    }

    /// Returns the resource kind, e.g. `"LoadBalancer"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        M::KIND
    }

    /// Returns the mapping as last fetched from the API.
    #[must_use]
    pub const fn info(&self) -> &Map {
        &self.info
    }

    /// Returns the current fields, including local assignments.
    #[must_use]
    pub const fn fields(&self) -> &Map {
        &self.fields
    }

    /// Returns whether a fetch has already been attempted.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Overrides the loaded flag.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Returns the identifier as a string, if the resource has one.
    ///
    /// String ids are returned as-is and numeric ids are formatted.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.fields.get("id").and_then(id_to_string)
    }

    /// Returns a field without ever loading.
    #[must_use]
    pub fn peek(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Assigns a field locally. Nothing is sent to the API.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Looks up a field, loading the resource once if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AttributeNotFound`] if the field is absent after
    /// loading, or any error of the fetch itself.
    pub async fn get(&mut self, field: &str) -> Result<&Value, ClientError> {
        if !self.fields.contains_key(field) && !self.loaded {
            self.refresh().await?;
        }

        self.fields
            .get(field)
            .ok_or_else(|| ClientError::AttributeNotFound {
                kind: M::KIND,
                attribute: field.to_string(),
            })
    }

    /// Loads the resource if needed and returns a copy of the fetched mapping.
    ///
    /// # Errors
    ///
    /// Returns any error of the fetch.
    pub async fn get_info(&mut self) -> Result<Map, ClientError> {
        if !self.loaded {
            self.refresh().await?;
        }
        Ok(self.info.clone())
    }

    /// Fetches the canonical representation and merges it in.
    ///
    /// The resource is marked loaded first. Nothing is fetched when the
    /// manager has no fetch capability or the resource has no identifier.
    ///
    /// # Errors
    ///
    /// Returns any error of the manager's fetch.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loaded = true;

        let Some(id) = self.id() else {
            tracing::debug!(kind = M::KIND, "Resource has no id, nothing to refresh");
            return Ok(());
        };

        if let Some(fresh) = self.manager.fetch(&id).await? {
            for (key, value) in &fresh.info {
                self.fields.insert(key.clone(), value.clone());
            }
            self.info = fresh.info;
        }
        Ok(())
    }

    /// Consumes the resource, returning its current fields.
    #[must_use]
    pub fn into_fields(self) -> Map {
        self.fields
    }
}

impl<M: Manager> PartialEq for Resource<M> {
    fn eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => self.info == other.info,
        }
    }
}

impl<M: Manager> fmt::Debug for Resource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(M::KIND)
            .field("info", &self.info)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl<M: Manager> fmt::Display for Resource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}({})>", M::KIND, Value::Object(self.info.clone()))
    }
}

/// A reference to an entity: either a bare identifier or a resource.
///
/// Manager operations accept anything convertible into an `EntityRef`, so a
/// [`Resource`], a `&str` and a `&String` are interchangeable wherever an
/// entity is expected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityRef<'a> {
    /// A raw identifier.
    Id(&'a str),
    /// A typed entity and its `id` field, if any.
    Entity {
        /// Resource kind, used in error messages.
        kind: &'static str,
        /// The `id` field.
        id: Option<&'a Value>,
    },
}

impl EntityRef<'_> {
    /// Returns the identifier this reference points at.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingIdentifier`] if an entity has no usable
    /// `id` field.
    pub fn resolve_id(&self) -> Result<String, ClientError> {
        match *self {
            Self::Id(id) => Ok(id.to_string()),
            Self::Entity { kind, id } => id
                .and_then(id_to_string)
                .ok_or(ClientError::MissingIdentifier { kind }),
        }
    }
}

impl<'a> From<&'a str> for EntityRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a String> for EntityRef<'a> {
    fn from(id: &'a String) -> Self {
        Self::Id(id.as_str())
    }
}

impl<'a, M: Manager> From<&'a Resource<M>> for EntityRef<'a> {
    fn from(resource: &'a Resource<M>) -> Self {
        Self::Entity {
            kind: M::KIND,
            id: resource.fields.get("id"),
        }
    }
}

/// Resolves an entity reference to its identifier.
///
/// # Errors
///
/// Returns [`ClientError::MissingIdentifier`] for an entity without `id`.
pub fn resolve_id<'a>(entity: impl Into<EntityRef<'a>>) -> Result<String, ClientError> {
    entity.into().resolve_id()
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
