//! HTTP response types for the LBaaS transport.

use std::collections::HashMap;

use serde_json::Value;

/// A decoded response from the API.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded body; `None` when the body was empty.
    pub body: Option<Value>,
}

impl HttpResponse {
    /// Creates a response from already-decoded parts.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Option<Value>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Decodes a response body.
    ///
    /// An empty body decodes to `None`. A body that is not valid JSON is passed
    /// through as a JSON string holding the raw text.
    #[must_use]
    pub fn decode_body(text: &str) -> Option<Value> {
        if text.is_empty() {
            return None;
        }
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for the redirect statuses the transport re-issues (301, 302, 305).
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self.code, 301 | 302 | 305)
    }

    /// Returns `true` for statuses in `[400, 600)`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code >= 400 && self.code < 600
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header value, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns the `X-Openstack-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-openstack-request-id")
    }

    /// Parses reqwest response headers into a `HashMap`.
    pub(crate) fn parse_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), None);
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_status_classes() {
        let redirect = HttpResponse::new(302, HashMap::new(), None);
        assert!(redirect.is_redirect());
        assert!(!redirect.is_error());

        let not_modified = HttpResponse::new(304, HashMap::new(), None);
        assert!(!not_modified.is_redirect());

        assert!(HttpResponse::new(404, HashMap::new(), None).is_error());
        assert!(HttpResponse::new(599, HashMap::new(), None).is_error());
        assert!(!HttpResponse::new(600, HashMap::new(), None).is_error());
    }

    #[test]
    fn test_decode_body_variants() {
        assert_eq!(HttpResponse::decode_body(""), None);
        assert_eq!(
            HttpResponse::decode_body(r#"{"id": "fake2"}"#),
            Some(json!({"id": "fake2"}))
        );
        assert_eq!(
            HttpResponse::decode_body("fakebody"),
            Some(Value::String("fakebody".to_string()))
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("location".to_string(), vec!["/location".to_string()]);
        headers.insert("x-openstack-request-id".to_string(), vec!["req-1".to_string()]);

        let response = HttpResponse::new(302, headers, None);
        assert_eq!(response.header("Location"), Some("/location"));
        assert_eq!(response.location(), Some("/location"));
        assert_eq!(response.request_id(), Some("req-1"));
    }
}
