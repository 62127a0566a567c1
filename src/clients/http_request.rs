//! HTTP request types for the LBaaS transport.
//!
//! This module provides the [`HttpRequest`] type and its builder.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// HTTP methods used by the LBaaS API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Content negotiated for a request (`Content-Type` and `Accept`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataType {
    /// `application/json`
    #[default]
    Json,
    /// `application/octet-stream`
    OctetStream,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// A request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// Serialized with `serde_json` before transmission.
    Json(Value),
    /// Sent verbatim.
    Raw(Vec<u8>),
}

impl RequestBody {
    /// Serializes the body into bytes for the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Raw(bytes) => bytes.clone(),
        }
    }
}

/// A request relative to the API endpoint.
///
/// # Example
///
/// ```rust
/// use lbaas_client::clients::{DataType, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/loadbalancers")
///     .json(json!({"name": "fake"}))
///     .build();
///
/// assert_eq!(request.data_type, DataType::Json);
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Path appended to the endpoint (e.g. `/loadbalancers/fakeid`).
    pub path: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Content negotiation for this request.
    pub data_type: DataType,
    /// Caller headers; these win over the defaults.
    pub extra_headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                path: path.into(),
                body: None,
                data_type: DataType::Json,
                extra_headers: HashMap::new(),
            },
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.request.body = Some(RequestBody::Json(body));
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn raw(mut self, body: Vec<u8>) -> Self {
        self.request.body = Some(RequestBody::Raw(body));
        self
    }

    /// Sets the negotiated content type.
    #[must_use]
    pub const fn data_type(mut self, data_type: DataType) -> Self {
        self.request.data_type = data_type;
        self
    }

    /// Adds a header, overriding any default of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> HttpRequest {
        self.request
    }
}
