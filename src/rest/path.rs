//! Path templates for LBaaS resources.
//!
//! Every manager keeps its URL templates as constants with `{name}`
//! placeholders, e.g. `/loadbalancers/{lb_id}/nodes/{id}`, and fills them
//! with [`build_path`]. Values are percent-encoded so that an identifier can
//! never introduce extra path segments.
//!
//! # Example
//!
//! ```rust
//! use lbaas_client::rest::build_path;
//!
//! let url = build_path("/loadbalancers/{lb_id}/nodes/{id}", &[("lb_id", "lb 1"), ("id", "n/2")]);
//! assert_eq!(url, "/loadbalancers/lb%201/nodes/n%2F2");
//! ```

/// Builds a path from a template by interpolating identifiers.
///
/// Each `{name}` placeholder is replaced with the percent-encoded value
/// paired with `name`. Placeholders without a value are left untouched.
#[must_use]
pub fn build_path(template: &str, ids: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }

    result
}
