//! Integration tests for lazy resource loading.

use lbaas_client::rest::Map;
use lbaas_client::{AuthMode, ClientConfig, ClientError, LbaasClient, Resource, ServiceUrl};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LbaasClient {
    let config = ClientConfig::builder()
        .auth(AuthMode::PreProvisionedToken {
            endpoint: ServiceUrl::new(server.uri()).unwrap(),
            token: Some("tok".to_string()),
        })
        .build()
        .unwrap();
    LbaasClient::new(config).unwrap()
}

#[tokio::test]
async fn test_missing_field_triggers_exactly_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loadbalancer": {"id": "lb1", "name": "fake", "status": "ACTIVE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut info = Map::new();
    info.insert("id".to_string(), json!("lb1"));
    let mut lb = Resource::new(client_for(&server).loadbalancers(), info, false);

    assert_eq!(lb.get("status").await.unwrap(), &json!("ACTIVE"));
    assert!(lb.is_loaded());
    assert_eq!(lb.get("name").await.unwrap(), &json!("fake"));

    let err = lb.get("nothing").await.unwrap_err();
    assert!(matches!(err, ClientError::AttributeNotFound { kind: "LoadBalancer", .. }));
}

#[tokio::test]
async fn test_absent_after_fetch_does_not_fetch_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loadbalancer": {"id": "lb1", "name": "fake"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut lb = client.loadbalancers().get("lb1").await.unwrap();
    assert!(!lb.is_loaded());

    assert!(lb.get("status").await.unwrap_err().is_not_found());
    assert!(lb.get("status").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_listed_resources_never_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loadbalancers": [{"id": "lb1", "name": "fake"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut lbs = client_for(&server).loadbalancers().list().await.unwrap();

    let err = lbs[0].get("algorithm").await.unwrap_err();
    assert!(matches!(err, ClientError::AttributeNotFound { .. }));
}

#[tokio::test]
async fn test_resource_without_id_is_not_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut info = Map::new();
    info.insert("name".to_string(), json!("orphan"));
    let mut lb = Resource::new(client_for(&server).loadbalancers(), info, false);

    assert!(lb.get("status").await.unwrap_err().is_not_found());
    assert!(lb.is_loaded());
    assert_eq!(lb.get("name").await.unwrap(), &json!("orphan"));
}

#[tokio::test]
async fn test_refresh_merges_fetched_fields_over_local_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loadbalancer": {"id": "lb1", "name": "server-side"}
        })))
        .mount(&server)
        .await;

    let mut info = Map::new();
    info.insert("id".to_string(), json!("lb1"));
    let mut lb = Resource::new(client_for(&server).loadbalancers(), info, false);
    lb.set("name", json!("local"));
    lb.set("note", json!("kept"));

    lb.refresh().await.unwrap();

    assert_eq!(lb.peek("name"), Some(&json!("server-side")));
    assert_eq!(lb.peek("note"), Some(&json!("kept")));
    assert_eq!(lb.info().get("name"), Some(&json!("server-side")));
}

#[tokio::test]
async fn test_nested_resource_refreshes_under_its_load_balancer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": [{"id": "n1"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loadbalancers/lb1/nodes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "node": {"id": "n1", "weight": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let nodes = client_for(&server).nodes("lb1").unwrap();
    let mut node = nodes.list().await.unwrap().remove(0);
    node.set_loaded(false);

    assert_eq!(node.get("weight").await.unwrap(), &json!(3));
}
