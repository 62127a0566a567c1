//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that the
//! transport can rely on them without re-checking.

use crate::error::ConfigError;
use std::fmt;

/// A validated absolute service URL (identity endpoint or LBaaS endpoint).
///
/// Trailing slashes are trimmed, so relative API paths such as `/devices`
/// can be appended directly.
///
/// # Example
///
/// ```rust
/// use lbaas_client::ServiceUrl;
///
/// let url = ServiceUrl::new("http://keystone:5000/v2.0/").unwrap();
/// assert_eq!(url.as_ref(), "http://keystone:5000/v2.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceUrl(String);

impl ServiceUrl {
    /// Creates a new validated service URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUrl`] if the URL is empty and
    /// [`ConfigError::InvalidUrl`] if it is not an absolute http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::named("url", url)
    }

    /// Same as [`ServiceUrl::new`], naming the setting in the error.
    ///
    /// # Errors
    ///
    /// See [`ServiceUrl::new`].
    pub fn named(name: &'static str, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyUrl { name });
        }

        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|_| ConfigError::InvalidUrl { url: url.clone() })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl { url });
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An identity-service password.
///
/// The `Debug` implementation masks the value so credentials never end up
/// in logs.
///
/// ```rust
/// use lbaas_client::Password;
///
/// let password = Password::new("s3cret").unwrap();
/// assert_eq!(format!("{password:?}"), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyCredential { field: "password" });
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}
