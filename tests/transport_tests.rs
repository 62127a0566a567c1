//! Integration tests for the HTTP transport.
//!
//! These tests run the client against a local mock server and verify the
//! request headers, redirect handling, re-authentication and error mapping.

use std::time::Duration;

use lbaas_client::clients::HttpMethod;
use lbaas_client::{
    AuthMode, ClientConfig, ClientError, HttpClient, LbaasClient, Password, PasswordCredentials,
    ServiceUrl, USER_AGENT,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pre_provisioned(server: &MockServer, token: Option<&str>) -> HttpClient {
    let config = ClientConfig::builder()
        .auth(AuthMode::PreProvisionedToken {
            endpoint: ServiceUrl::new(server.uri()).unwrap(),
            token: token.map(ToString::to_string),
        })
        .build()
        .unwrap();
    HttpClient::new(config).unwrap()
}

fn password_client(server: &MockServer) -> LbaasClient {
    let config = ClientConfig::builder()
        .auth(AuthMode::PasswordCredentials(PasswordCredentials {
            auth_url: ServiceUrl::new(format!("{}/v2.0", server.uri())).unwrap(),
            username: "admin".to_string(),
            password: Password::new("secret").unwrap(),
            tenant_name: "demo".to_string(),
            region_name: Some("RegionOne".to_string()),
        }))
        .build()
        .unwrap();
    LbaasClient::new(config).unwrap()
}

fn token_response(server: &MockServer, token: &str) -> Value {
    json!({
        "access": {
            "token": {"id": token, "expires": "2030-01-01T00:00:00Z"},
            "serviceCatalog": [{
                "type": "loadbalancer",
                "endpoints": [{"region": "RegionOne", "adminURL": format!("{}/api", server.uri())}]
            }]
        }
    })
}

async fn mount_tokens(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v2.0/tokens"))
        .and(body_json(json!({
            "auth": {
                "passwordCredentials": {"username": "admin", "password": "secret"},
                "tenantName": "demo"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(server, token)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ============================================================================
// Headers and bodies
// ============================================================================

#[tokio::test]
async fn test_requests_carry_token_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers"))
        .and(header("X-Auth-Token", "tok"))
        .and(header("User-Agent", USER_AGENT))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"loadbalancers": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let response = client
        .json_request(HttpMethod::Get, "/loadbalancers", None)
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body, Some(json!({"loadbalancers": []})));
}

#[tokio::test]
async fn test_non_json_body_is_passed_through_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("Content-Type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("all good"))
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let response = client
        .raw_request(HttpMethod::Get, "/status", None)
        .await
        .unwrap();

    assert_eq!(response.body, Some(Value::String("all good".to_string())));
}

#[tokio::test]
async fn test_empty_body_decodes_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/loadbalancers/lb1"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, None);
    let response = client
        .raw_request(HttpMethod::Delete, "/loadbalancers/lb1", None)
        .await
        .unwrap();

    assert_eq!(response.code, 202);
    assert!(response.body.is_none());
}

// ============================================================================
// Redirects
// ============================================================================

#[tokio::test]
async fn test_redirect_is_followed_with_same_method() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moved": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let response = client.json_request(HttpMethod::Get, "/old", None).await.unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body, Some(json!({"moved": true})));
}

#[tokio::test]
async fn test_redirected_post_keeps_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/loadbalancers"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v1/loadbalancers"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/loadbalancers"))
        .and(header("X-Auth-Token", "tok"))
        .and(header("User-Agent", USER_AGENT))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "fake", "algorithm": "ROUNDROBIN"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"loadbalancer": {"id": "lb1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let response = client
        .json_request(
            HttpMethod::Post,
            "/loadbalancers",
            Some(json!({"name": "fake", "algorithm": "ROUNDROBIN"})),
        )
        .await
        .unwrap();

    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_redirect_loop_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/loop"))
        .expect(6)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let result = client.json_request(HttpMethod::Get, "/loop", None).await;

    assert!(matches!(result, Err(ClientError::TooManyRedirects { hops: 5 })));
}

#[tokio::test]
async fn test_redirect_without_location_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nowhere"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let result = client.json_request(HttpMethod::Get, "/nowhere", None).await;

    assert!(matches!(result, Err(ClientError::InvalidRedirect { status: 302 })));
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_fault_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"message": "LoadBalancer missing not found", "code": 404}
        })))
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let err = client
        .json_request(HttpMethod::Get, "/loadbalancers/missing", None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    match err {
        ClientError::Request { message, .. } => {
            assert_eq!(message, "LoadBalancer missing not found");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("tok"));
    let err = client
        .json_request(HttpMethod::Get, "/devices", None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_pre_provisioned_401_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = pre_provisioned(&server, Some("stale"));
    let err = client
        .json_request(HttpMethod::Get, "/loadbalancers", None)
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
}

// ============================================================================
// Password authentication
// ============================================================================

#[tokio::test]
async fn test_first_request_authenticates_and_uses_catalog_endpoint() {
    let server = MockServer::start().await;
    mount_tokens(&server, "fresh", 1).await;
    Mock::given(method("GET"))
        .and(path("/api/loadbalancers"))
        .and(header("X-Auth-Token", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"loadbalancers": []})))
        .expect(2)
        .mount(&server)
        .await;

    let client = password_client(&server);
    assert!(client.loadbalancers().list().await.unwrap().is_empty());
    assert!(client.loadbalancers().list().await.unwrap().is_empty());

    let session = client.auth_session().await.unwrap();
    assert_eq!(session.endpoint, format!("{}/api", server.uri()));
    assert_eq!(session.token_id(), Some("fresh"));
}

#[tokio::test]
async fn test_401_reauthenticates_and_retries_once() {
    let server = MockServer::start().await;
    mount_tokens(&server, "fresh", 2).await;
    Mock::given(method("GET"))
        .and(path("/api/loadbalancers"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/loadbalancers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"loadbalancers": [{"id": "lb1", "name": "fake"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let lbs = client.loadbalancers().list().await.unwrap();

    assert_eq!(lbs.len(), 1);
    assert_eq!(lbs[0].id().as_deref(), Some("lb1"));
}

#[tokio::test]
async fn test_second_401_is_returned() {
    let server = MockServer::start().await;
    mount_tokens(&server, "fresh", 2).await;
    Mock::given(method("GET"))
        .and(path("/api/loadbalancers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "go away"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let err = client.loadbalancers().list().await.unwrap_err();

    match err {
        ClientError::Unauthorized { message, body } => {
            assert_eq!(message, "go away");
            assert_eq!(body, Some(json!({"message": "go away"})));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_authentication_follows_redirects_even_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/tokens"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v3/tokens"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(&server, "fresh")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/loadbalancers"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .auth(AuthMode::PasswordCredentials(PasswordCredentials {
            auth_url: ServiceUrl::new(format!("{}/v2.0", server.uri())).unwrap(),
            username: "admin".to_string(),
            password: Password::new("secret").unwrap(),
            tenant_name: "demo".to_string(),
            region_name: Some("RegionOne".to_string()),
        }))
        .follow_redirects(false)
        .build()
        .unwrap();
    let client = HttpClient::new(config).unwrap();

    let response = client
        .json_request(HttpMethod::Get, "/loadbalancers", None)
        .await
        .unwrap();

    assert_eq!(response.code, 302);
    assert_eq!(client.auth_session().await.unwrap().token_id(), Some("fresh"));
}

#[tokio::test]
async fn test_timeout_bounds_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .auth(AuthMode::PreProvisionedToken {
            endpoint: ServiceUrl::new(server.uri()).unwrap(),
            token: None,
        })
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = HttpClient::new(config).unwrap();

    match client.json_request(HttpMethod::Get, "/slow", None).await {
        Err(ClientError::Network(err)) => assert!(err.is_timeout()),
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_token_response_without_access_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": {}})))
        .mount(&server)
        .await;

    let client = password_client(&server);
    let err = client.http_client().authenticate().await.unwrap_err();

    assert!(matches!(err, ClientError::AuthorizationFailure { .. }));
    assert!(client.auth_session().await.is_none());
}

#[tokio::test]
async fn test_catalog_without_region_match_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": {
                "token": {"id": "tok"},
                "serviceCatalog": [{
                    "type": "loadbalancer",
                    "endpoints": [{"region": "RegionTwo", "adminURL": "http://elsewhere:8181"}]
                }]
            }
        })))
        .mount(&server)
        .await;

    let client = password_client(&server);
    let err = client.http_client().authenticate().await.unwrap_err();

    assert!(matches!(err, ClientError::AuthorizationFailure { .. }));
}

#[tokio::test]
async fn test_identity_401_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let err = client.http_client().authenticate().await.unwrap_err();

    assert!(err.is_unauthorized());
}
