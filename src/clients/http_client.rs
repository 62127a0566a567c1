//! The HTTP transport of the LBaaS client.
//!
//! [`HttpClient`] owns the connection pool, the authentication state and the
//! request pipeline:
//!
//! 1. authenticate if no endpoint is known yet (password credentials only)
//! 2. merge default headers with caller headers (caller wins) and attach `X-Auth-Token`
//! 3. send, re-issuing the request on 301/302/305 (at most [`MAX_REDIRECTS`] hops)
//! 4. map statuses in `[400, 600)` to [`ClientError`]
//! 5. on 401 with password credentials, authenticate again and retry the request once
//!
//! # Example
//!
//! ```rust,ignore
//! use lbaas_client::{AuthMode, ClientConfig, ServiceUrl};
//! use lbaas_client::clients::{HttpClient, HttpMethod};
//!
//! let config = ClientConfig::builder()
//!     .auth(AuthMode::PreProvisionedToken {
//!         endpoint: ServiceUrl::new("http://localhost:8181")?,
//!         token: Some("token".to_string()),
//!     })
//!     .build()?;
//!
//! let client = HttpClient::new(config)?;
//! let response = client.json_request(HttpMethod::Get, "/loadbalancers", None).await?;
//! ```

use std::collections::HashMap;

use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::auth::{AuthSession, ServiceCatalog};
use crate::clients::{
    ClientError, DataType, HttpMethod, HttpRequest, HttpResponse, RequestBody,
};
use crate::config::{AuthMode, ClientConfig, PasswordCredentials};

/// Maximum number of redirects followed for one request.
pub const MAX_REDIRECTS: usize = 5;

/// Header carrying the identity token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// HTTP transport with Keystone authentication.
///
/// `HttpClient` is `Send + Sync`; the authentication state sits behind an
/// async `RwLock` and is replaced as a whole on re-authentication.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    session: RwLock<Option<AuthSession>>,
    default_headers: HashMap<String, String>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a transport from a configuration.
    ///
    /// With [`AuthMode::PreProvisionedToken`] the session is established
    /// immediately; with password credentials the first request authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the underlying reqwest client
    /// cannot be created (e.g. TLS initialization failure).
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }
        if config.insecure() {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        let session = match config.auth() {
            AuthMode::PreProvisionedToken { endpoint, token } => Some(
                AuthSession::pre_provisioned(endpoint.as_ref(), token.clone()),
            ),
            AuthMode::PasswordCredentials(_) => None,
        };

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), config.user_agent().to_string());

        Ok(Self {
            client,
            config,
            session: RwLock::new(session),
            default_headers,
        })
    }

    /// Returns the configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns a snapshot of the current authentication state.
    pub async fn auth_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    /// Sends a JSON request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn json_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, ClientError> {
        let mut builder = HttpRequest::builder(method, path).data_type(DataType::Json);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.request(builder.build()).await
    }

    /// Sends an `application/octet-stream` request.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ClientError> {
        let mut builder = HttpRequest::builder(method, path).data_type(DataType::OctetStream);
        if let Some(body) = body {
            builder = builder.raw(body);
        }
        self.request(builder.build()).await
    }

    /// Performs one logical request against the API endpoint.
    ///
    /// Authenticates first when no endpoint is known. A 401 answer triggers
    /// one re-authentication and one retry of the identical request when the
    /// client holds password credentials; otherwise, or when the retry is
    /// also refused, the 401 is returned to the caller.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unauthorized`] for a 401 that could not be recovered
    /// - [`ClientError::Request`] for any other status in `[400, 600)`
    /// - [`ClientError::AuthorizationFailure`] when authentication yields no usable session
    /// - [`ClientError::InvalidRedirect`] / [`ClientError::TooManyRedirects`]
    /// - [`ClientError::Network`] on connection failures
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let span = self.config.span().clone();
        async move {
            let session = self.current_session().await?;

            match self.send(&session, &request).await {
                Err(e) if e.is_unauthorized() && self.config.auth().can_reauthenticate() => {
                    tracing::info!(path = %request.path, "Token rejected, re-authenticating once");
                    let session = self.authenticate_inner().await?;
                    self.send(&session, &request).await
                }
                other => other,
            }
        }
        .instrument(span)
        .await
    }

    /// Obtains a token and endpoint from the identity service.
    ///
    /// Posts the password credentials to `<auth_url>/tokens`, always following
    /// redirects, and replaces the session with the token and the endpoint
    /// picked by the configured [`EndpointResolver`](crate::auth::EndpointResolver).
    ///
    /// # Errors
    ///
    /// - [`ClientError::AuthorizationFailure`] if the client has no credentials,
    ///   or the response lacks the token or a matching catalog endpoint
    /// - [`ClientError::Unauthorized`] if the identity service answers 401
    /// - [`ClientError::Request`] / [`ClientError::Network`] for other failures
    pub async fn authenticate(&self) -> Result<AuthSession, ClientError> {
        let span = self.config.span().clone();
        self.authenticate_inner().instrument(span).await
    }

    async fn authenticate_inner(&self) -> Result<AuthSession, ClientError> {
        let AuthMode::PasswordCredentials(credentials) = self.config.auth() else {
            return Err(ClientError::authorization_failure(
                "client uses a pre-provisioned token and has no credentials to authenticate with",
            ));
        };

        let token_url = format!("{}/tokens", credentials.auth_url);
        let headers = self.request_headers(DataType::Json, None, &HashMap::new());
        let body = RequestBody::Json(Self::credentials_body(credentials));

        tracing::debug!(url = %token_url, user = %credentials.username, "Authenticating");
        let response = self
            .execute(HttpMethod::Post, &token_url, &headers, Some(&body), true)
            .await?;

        let body = response
            .body
            .ok_or_else(|| ClientError::authorization_failure("token response has no body"))?;
        let session = match Self::session_from_body(&body, &self.config) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Identity service response is unusable");
                return Err(e);
            }
        };

        tracing::debug!(endpoint = %session.endpoint, "Authenticated");
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    fn credentials_body(credentials: &PasswordCredentials) -> Value {
        let password: &str = credentials.password.as_ref();
        json!({
            "auth": {
                "passwordCredentials": {
                    "username": credentials.username,
                    "password": password,
                },
                "tenantName": credentials.tenant_name,
            }
        })
    }

    fn session_from_body(body: &Value, config: &ClientConfig) -> Result<AuthSession, ClientError> {
        let catalog = ServiceCatalog::from_response(body)?;
        let token = catalog.get_token();
        let endpoint = config.endpoint_resolver().resolve(&catalog)?;
        Ok(AuthSession {
            endpoint,
            token: Some(token),
            catalog: Some(catalog),
        })
    }

    async fn current_session(&self) -> Result<AuthSession, ClientError> {
        if let Some(session) = self.session.read().await.clone() {
            return Ok(session);
        }
        self.authenticate_inner().await
    }

    async fn send(
        &self,
        session: &AuthSession,
        request: &HttpRequest,
    ) -> Result<HttpResponse, ClientError> {
        let url = join_url(&session.endpoint, &request.path);
        let headers = self.request_headers(
            request.data_type,
            session.token_id(),
            &request.extra_headers,
        );
        self.execute(
            request.http_method,
            &url,
            &headers,
            request.body.as_ref(),
            self.config.follow_redirects(),
        )
        .await
    }

    /// Builds the header set: defaults, content negotiation, token, then caller headers.
    fn request_headers(
        &self,
        data_type: DataType,
        token: Option<&str>,
        extra: &HashMap<String, String>,
    ) -> HashMap<String, String> {
        let mut headers = self.default_headers.clone();
        merge_header(&mut headers, "Content-Type", data_type.as_content_type());
        merge_header(&mut headers, "Accept", data_type.as_content_type());
        if let Some(token) = token {
            merge_header(&mut headers, AUTH_TOKEN_HEADER, token);
        }
        for (name, value) in extra {
            merge_header(&mut headers, name, value);
        }
        headers
    }

    /// Sends a request, following redirects if asked to, and maps error statuses.
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&RequestBody>,
        follow_redirects: bool,
    ) -> Result<HttpResponse, ClientError> {
        let payload = body.map(RequestBody::to_bytes);
        let mut url = url.to_string();
        let mut hops = 0;

        loop {
            log_request(method, &url, headers, payload.as_deref());

            let mut req_builder = self.client.request(method.as_reqwest(), &url);
            for (name, value) in headers {
                req_builder = req_builder.header(name.as_str(), value.as_str());
            }
            if let Some(payload) = &payload {
                req_builder = req_builder.body(payload.clone());
            }

            let res = req_builder.send().await?;
            let code = res.status().as_u16();
            let res_headers = HttpResponse::parse_headers(res.headers());
            let text = res.text().await?;
            tracing::debug!(status = code, url = %url, body_len = text.len(), "Response");

            let response = HttpResponse::new(code, res_headers, HttpResponse::decode_body(&text));

            if follow_redirects && response.is_redirect() {
                if hops >= MAX_REDIRECTS {
                    return Err(ClientError::TooManyRedirects { hops });
                }
                url = resolve_location(&url, response.location())
                    .ok_or(ClientError::InvalidRedirect { status: code })?;
                hops += 1;
                tracing::debug!(status = code, location = %url, hop = hops, "Following redirect");
                continue;
            }

            if response.is_error() {
                return Err(ClientError::from_response(code, response.body));
            }

            return Ok(response);
        }
    }
}

/// Inserts a header, replacing any existing header with the same name (case-insensitive).
fn merge_header(headers: &mut HashMap<String, String>, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn join_url(endpoint: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        format!("{endpoint}{path}")
    } else {
        format!("{endpoint}/{path}")
    }
}

fn resolve_location(current: &str, location: Option<&str>) -> Option<String> {
    let location = location?.trim();
    if location.is_empty() {
        return None;
    }
    let base = reqwest::Url::parse(current).ok()?;
    base.join(location).ok().map(String::from)
}

fn log_request(
    method: HttpMethod,
    url: &str,
    headers: &HashMap<String, String>,
    body: Option<&[u8]>,
) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let mut shown: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case(AUTH_TOKEN_HEADER) {
                format!("{name}: *****")
            } else {
                format!("{name}: {value}")
            }
        })
        .collect();
    shown.sort();
    tracing::debug!(
        method = %method,
        url = %url,
        headers = ?shown,
        body_len = body.map_or(0, <[u8]>::len),
        "Request"
    );
}
