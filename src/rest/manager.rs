//! The generic CRUD manager.
//!
//! A [`Manager`] is a stateless dispatcher bound to one transport and one
//! resource kind. Implementors only provide [`Manager::KIND`] and
//! [`Manager::client`]; the trait supplies the envelope-aware CRUD calls
//! that the resource-specific managers build on, each parameterized by a
//! path and the response envelope key.
//!
//! # Example
//!
//! ```rust,ignore
//! use lbaas_client::rest::{Manager, Resource};
//!
//! #[derive(Clone, Debug)]
//! struct Fakes { client: Arc<HttpClient> }
//!
//! impl Manager for Fakes {
//!     const KIND: &'static str = "Fake";
//!     fn client(&self) -> &HttpClient { &self.client }
//! }
//!
//! let all: Vec<Resource<Fakes>> = fakes.list_at("/fakes", "data").await?;
//! ```

use serde_json::Value;

use crate::clients::{ClientError, HttpClient, HttpMethod};
use crate::rest::{Map, Resource};

/// CRUD operations for one resource kind.
///
/// # Envelopes
///
/// Responses nest their payload under a key, e.g. `{"loadbalancers": [...]}`.
/// The key is an argument of every call. A 2xx body without it fails with
/// [`ClientError::MissingEnvelope`].
#[allow(async_fn_in_trait)]
pub trait Manager: Clone + Send + Sync + Sized {
    /// Resource kind name (e.g. `"LoadBalancer"`), used in errors and `Display`.
    const KIND: &'static str;

    /// Returns the transport requests are issued through.
    fn client(&self) -> &HttpClient;

    /// Fetches the canonical representation of the resource with `id`.
    ///
    /// Managers without a fetch capability keep the default, which returns
    /// `Ok(None)`; a lazy [`Resource::refresh`] is then a no-op.
    ///
    /// # Errors
    ///
    /// Returns any transport error of the fetch.
    async fn fetch(&self, id: &str) -> Result<Option<Resource<Self>>, ClientError> {
        let _ = id;
        Ok(None)
    }

    /// Issues a GET and wraps every non-null element under `key`.
    ///
    /// The resulting resources are marked loaded and keep the array order.
    /// An empty array is an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] if `key` is absent or is not
    /// an array of objects, or any transport error.
    async fn list_at(&self, path: &str, key: &str) -> Result<Vec<Resource<Self>>, ClientError> {
        let response = self.client().json_request(HttpMethod::Get, path, None).await?;

        let Value::Array(items) = take_envelope(response.body, key)? else {
            return Err(missing_envelope(key));
        };

        items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| into_map(item, key).map(|info| Resource::new(self.clone(), info, true)))
            .collect()
    }

    /// Issues a GET and wraps the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] or any transport error.
    async fn get_at(&self, path: &str, key: &str) -> Result<Resource<Self>, ClientError> {
        let value = self.get_raw(path, key).await?;
        Ok(Resource::new(self.clone(), into_map(value, key)?, false))
    }

    /// Issues a GET and returns the value under `key` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] or any transport error.
    async fn get_raw(&self, path: &str, key: &str) -> Result<Value, ClientError> {
        let response = self.client().json_request(HttpMethod::Get, path, None).await?;
        take_envelope(response.body, key)
    }

    /// Issues a POST with a JSON body and wraps the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] or any transport error.
    async fn create_at(&self, path: &str, body: Value, key: &str) -> Result<Resource<Self>, ClientError> {
        let value = self.create_raw(path, body, key).await?;
        Ok(Resource::new(self.clone(), into_map(value, key)?, false))
    }

    /// Issues a POST with a JSON body and returns the value under `key` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] or any transport error.
    async fn create_raw(&self, path: &str, body: Value, key: &str) -> Result<Value, ClientError> {
        let response = self
            .client()
            .json_request(HttpMethod::Post, path, Some(body))
            .await?;
        take_envelope(response.body, key)
    }

    /// Issues a PUT and wraps the object under `key`, if the server sent one.
    ///
    /// Status transitions legitimately answer with an empty body; that yields
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnvelope`] for a non-empty body without
    /// `key`, or any transport error.
    async fn update_at(
        &self,
        path: &str,
        body: Option<Value>,
        key: &str,
    ) -> Result<Option<Resource<Self>>, ClientError> {
        let response = self.client().json_request(HttpMethod::Put, path, body).await?;

        if is_empty_body(response.body.as_ref()) {
            tracing::debug!(kind = Self::KIND, path, "Update returned no body");
            return Ok(None);
        }

        let value = take_envelope(response.body, key)?;
        Ok(Some(Resource::new(self.clone(), into_map(value, key)?, false)))
    }

    /// Issues a DELETE without body; success is any non-error status.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    async fn delete_at(&self, path: &str) -> Result<(), ClientError> {
        self.client().raw_request(HttpMethod::Delete, path, None).await?;
        Ok(())
    }
}

/// Removes `key` from a response body.
pub(crate) fn take_envelope(body: Option<Value>, key: &str) -> Result<Value, ClientError> {
    match body {
        Some(Value::Object(mut map)) => map
            .remove(key)
            .filter(|value| !value.is_null())
            .ok_or_else(|| missing_envelope(key)),
        _ => Err(missing_envelope(key)),
    }
}

pub(crate) fn into_map(value: Value, key: &str) -> Result<Map, ClientError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(missing_envelope(key)),
    }
}

fn missing_envelope(key: &str) -> ClientError {
    ClientError::MissingEnvelope {
        key: key.to_string(),
    }
}

fn is_empty_body(body: Option<&Value>) -> bool {
    match body {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_take_envelope_unwraps_key() {
        let body = Some(json!({"data": {"id": "fakeid"}, "other": 1}));
        assert_eq!(take_envelope(body, "data").unwrap(), json!({"id": "fakeid"}));
    }

    #[test]
    fn test_take_envelope_missing_key() {
        for body in [None, Some(json!({"other": 1})), Some(json!("text")), Some(json!({"data": null}))] {
            assert!(matches!(
                take_envelope(body, "data"),
                Err(ClientError::MissingEnvelope { key }) if key == "data"
            ));
        }
    }

    #[test]
    fn test_into_map_requires_object() {
        assert!(into_map(json!({"id": 1}), "data").is_ok());
        assert!(into_map(json!(["ROUNDROBIN"]), "data").is_err());
    }

    #[test]
    fn test_empty_bodies() {
        assert!(is_empty_body(None));
        assert!(is_empty_body(Some(&json!({}))));
        assert!(is_empty_body(Some(&json!(""))));
        assert!(!is_empty_body(Some(&json!({"node": {"id": "1"}}))));
    }
}
