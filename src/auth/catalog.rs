//! Keystone v2 service catalog parsing.
//!
//! The identity service answers `POST /tokens` with an `access` document:
//!
//! ```json
//! {
//!   "access": {
//!     "token": {"id": "abc", "tenant": {"id": "t1"}, "expires": "2012-10-03T16:53:36Z"},
//!     "user": {"id": "u1"},
//!     "serviceCatalog": [
//!       {"type": "loadbalancer", "name": "balancer",
//!        "endpoints": [{"region": "RegionOne", "adminURL": "http://lb:8181"}]}
//!     ]
//!   }
//! }
//! ```
//!
//! [`ServiceCatalog`] exposes the token record and endpoint lookup.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::clients::ClientError;

/// Which URL of a catalog endpoint to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EndpointType {
    /// `publicURL`
    Public,
    /// `internalURL`
    Internal,
    /// `adminURL`
    #[default]
    Admin,
}

impl EndpointType {
    /// Returns the catalog key for this endpoint type.
    #[must_use]
    pub const fn as_key(&self) -> &'static str {
        match self {
            Self::Public => "publicURL",
            Self::Internal => "internalURL",
            Self::Admin => "adminURL",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// The current token record of an authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token sent as `X-Auth-Token`.
    pub id: String,
    /// Tenant the token is scoped to.
    pub tenant_id: Option<String>,
    /// User the token was issued to.
    pub user_id: Option<String>,
    /// Expiry reported by the identity service.
    pub expires: Option<DateTime<Utc>>,
}

impl TokenInfo {
    /// Creates a token record that carries only an identifier.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tenant_id: None,
            user_id: None,
            expires: None,
        }
    }
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("id", &"*****")
            .field("tenant_id", &self.tenant_id)
            .field("user_id", &self.user_id)
            .field("expires", &self.expires)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct AccessDocument {
    token: TokenRecord,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Vec<CatalogService>,
    #[serde(default)]
    user: Option<IdRecord>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct TokenRecord {
    id: String,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    tenant: Option<IdRecord>,
    #[serde(default)]
    expires: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct IdRecord {
    id: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct CatalogService {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<Map<String, Value>>,
}

/// A parsed Keystone v2 `access` document.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCatalog {
    access: AccessDocument,
}

impl ServiceCatalog {
    /// Parses the decoded body of a token response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthorizationFailure`] if the body has no
    /// `access` object or the `access` object has no token identifier.
    pub fn from_response(body: &Value) -> Result<Self, ClientError> {
        let access = body
            .get("access")
            .ok_or_else(|| ClientError::authorization_failure("response has no 'access' section"))?;
        Self::from_access(access)
    }

    /// Parses an `access` object.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthorizationFailure`] if the token record is missing.
    pub fn from_access(access: &Value) -> Result<Self, ClientError> {
        let access = AccessDocument::deserialize(access).map_err(|e| {
            ClientError::authorization_failure(format!("malformed 'access' section: {e}"))
        })?;
        Ok(Self { access })
    }

    /// Returns the current token record.
    #[must_use]
    pub fn get_token(&self) -> TokenInfo {
        let token = &self.access.token;
        TokenInfo {
            id: token.id.clone(),
            tenant_id: token
                .tenant_id
                .clone()
                .or_else(|| token.tenant.as_ref().map(|t| t.id.clone())),
            user_id: token
                .user_id
                .clone()
                .or_else(|| self.access.user.as_ref().map(|u| u.id.clone())),
            expires: token.expires.as_deref().and_then(parse_expiry),
        }
    }

    /// Looks up an endpoint URL.
    ///
    /// Returns the `endpoint_type` URL of the first endpoint of the first
    /// `service_type` service whose `attr` field equals `filter_value`. With no
    /// filter value, the first endpoint of that service type wins.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthorizationFailure`] if nothing matches.
    pub fn url_for(
        &self,
        attr: &str,
        filter_value: Option<&str>,
        service_type: &str,
        endpoint_type: EndpointType,
    ) -> Result<String, ClientError> {
        self.access
            .service_catalog
            .iter()
            .filter(|service| service.service_type == service_type)
            .flat_map(|service| service.endpoints.iter())
            .filter(|endpoint| {
                filter_value.map_or(true, |wanted| {
                    endpoint.get(attr).and_then(Value::as_str) == Some(wanted)
                })
            })
            .find_map(|endpoint| endpoint.get(endpoint_type.as_key()).and_then(Value::as_str))
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                ClientError::authorization_failure(format!(
                    "no {endpoint_type} endpoint for service type '{service_type}'{}",
                    filter_value.map_or_else(String::new, |v| format!(" with {attr} '{v}'"))
                ))
            })
    }
}

/// Parses Keystone expiry timestamps, with or without a zone suffix.
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
