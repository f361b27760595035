#![allow(clippy::unwrap_used)]
// Integration tests for `HostClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oc_api::{Error, HostClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HostClient) {
    let server = MockServer::start().await;
    let client = HostClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        "admin@example.com",
        &SecretString::from("s3cret".to_owned()),
    )
    .unwrap();
    (server, client)
}

fn service_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "description": "Does things",
        "owner": { "_id": "u1", "name": "Ada", "email": "ada@example.com" },
        "pubsub": { "protocol": "MQTT", "endpoint": format!("openchirp/service/{id}") },
        "properties": {}
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let (server, client) = setup().await;

    // base64("admin@example.com:s3cret")
    Mock::given(method("GET"))
        .and(path("/apiv1/group/all"))
        .and(header(
            "authorization",
            "Basic YWRtaW5AZXhhbXBsZS5jb206czNjcmV0",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client.list_groups().await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apiv1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "Unauthorized"}})),
        )
        .mount(&server)
        .await;

    let result = client.user_info().await;
    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "Unauthorized"),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apiv1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "5a00",
            "name": "Ada",
            "email": "ada@example.com",
            "userid": "ada",
            "groups": [
                { "group_id": "g1", "name": "admin", "write_access": true },
                { "group_id": "g2", "name": "developer", "write_access": false }
            ]
        })))
        .mount(&server)
        .await;

    let user = client.user_info().await.unwrap();
    assert_eq!(user.id, "5a00");
    assert_eq!(user.userid, "ada");
    assert_eq!(user.groups.len(), 2);
    assert!(user.groups[0].write_access);
    assert!(!user.groups[1].write_access);
}

#[tokio::test]
async fn test_create_user_omits_missing_name() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apiv1/user/create"))
        .and(body_json(json!({ "email": "new@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_user("new@example.com", "pw", None)
        .await
        .unwrap();
}

// ── Services ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_services_keeps_backend_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apiv1/service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            service_json("s2", "zeta"),
            service_json("s1", "alpha"),
        ])))
        .mount(&server)
        .await;

    let services = client.list_services().await.unwrap();
    let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(services[0].owner.email, "ada@example.com");
    assert_eq!(services[0].pubsub.endpoint, "openchirp/service/s2");
    assert!(services[0].extra.contains_key("properties"));
}

#[tokio::test]
async fn test_create_service_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apiv1/service"))
        .and(body_json(json!({ "name": "weather", "description": "Weather feed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_json("svc-123", "weather")))
        .mount(&server)
        .await;

    let service = client
        .create_service("weather", "Weather feed")
        .await
        .unwrap();
    assert_eq!(service.id, "svc-123");
}

#[tokio::test]
async fn test_delete_missing_service_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apiv1/service/nope"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "Service not found"}})),
        )
        .mount(&server)
        .await;

    let err = client.delete_service("nope").await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
    assert_eq!(err.to_string(), "Service not found");
}

// ── Service tokens ──────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_token_accepts_json_string() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apiv1/service/svc-123/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("abc")))
        .mount(&server)
        .await;

    assert_eq!(client.generate_service_token("svc-123").await.unwrap(), "abc");
}

#[tokio::test]
async fn test_regenerate_token_accepts_plain_text() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/apiv1/service/svc-123/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("def\n"))
        .mount(&server)
        .await;

    assert_eq!(
        client.regenerate_service_token("svc-123").await.unwrap(),
        "def"
    );
}

#[tokio::test]
async fn test_generate_token_twice_conflicts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apiv1/service/svc-123/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("abc")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/apiv1/service/svc-123/token"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"error": {"message": "Token already exists"}})),
        )
        .mount(&server)
        .await;

    client.generate_service_token("svc-123").await.unwrap();
    let err = client.generate_service_token("svc-123").await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }), "got: {err:?}");
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn test_delete_token() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/apiv1/service/svc-123/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_service_token("svc-123").await.unwrap();
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apiv1/device/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d1",
            "name": "Lobby sensor",
            "owner": { "name": "Ada", "email": "ada@example.com" },
            "pubsub": { "protocol": "MQTT", "endpoint": "openchirp/device/d1" }
        })))
        .mount(&server)
        .await;

    let device = client.get_device("d1").await.unwrap();
    assert_eq!(device.id, "d1");
    assert_eq!(device.pubsub.endpoint, "openchirp/device/d1");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_error_uses_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/apiv1/group"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"message": "Group name already taken"}})),
        )
        .mount(&server)
        .await;

    let err = client.create_group("ops").await.unwrap_err();
    match err {
        Error::Api { status, ref message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Group name already taken");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apiv1/device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "got: {result:?}"
    );
}
