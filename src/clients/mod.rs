//! HTTP transport and client types.
//!
//! # Overview
//!
//! - [`LbaasClient`]: the entry point, handing out one manager per resource kind
//! - [`HttpClient`]: the transport (authentication, redirects, error mapping)
//! - [`HttpRequest`] / [`HttpRequestBuilder`]: a request relative to the API endpoint
//! - [`HttpResponse`]: status, headers and decoded body
//! - [`HttpMethod`], [`DataType`], [`RequestBody`]
//! - [`ClientError`]: the error type of every operation
//!
//! # Redirects and re-authentication
//!
//! - **301 / 302 / 305**: re-issued to `Location` with the same method, headers
//!   and body, at most [`MAX_REDIRECTS`] times
//! - **401**: with password credentials, the client authenticates again and
//!   retries the request once; otherwise the error is returned
//! - **Other 4xx / 5xx**: returned immediately, never retried

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod lbaas_client;

pub use errors::ClientError;
pub use http_client::{HttpClient, AUTH_TOKEN_HEADER, MAX_REDIRECTS};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::HttpResponse;
pub use lbaas_client::LbaasClient;
