#![cfg(test)]

use chat_hvac::service::{
    health,
    hvac::{GenericHvacClient, intesis::IntesisHvacClient},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

const DEVICE: &str = "127934703953";

fn status_document() -> serde_json::Value {
    json!({
        "device": { "id": DEVICE, "name": "Lounge", "familyId": 1, "modelId": 2, "installationId": 3, "zoneId": 4, "order": 0, "widgets": [] },
        "status": { "power": "on", "mode": "heat", "fan_speed": 2, "setpoint": 220, "temperature": 198, "187": 5 }
    })
}

async fn client(mock_server: &MockServer) -> IntesisHvacClient {
    IntesisHvacClient::new(&mock_server.uri(), DEVICE)
}

#[tokio::test]
async fn status_decodes_the_device_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/hvac/{DEVICE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_document()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server).await;

    let first = client.status().await.unwrap();
    let second = client.status().await.unwrap();

    assert_eq!(first.device.name, "Lounge");
    assert_eq!(first.status.mode, "heat");
    assert_eq!(first.status.uid_187, 5);
    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn status_reports_undecodable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).await.status().await.unwrap_err();

    assert_eq!(err.to_string(), "unable to decode: `not json`");
}

#[tokio::test]
async fn status_rejects_non_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("bridge offline"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).await.status().await.unwrap_err().to_string();

    assert!(err.starts_with("invalid status code: 503"));
    assert!(err.ends_with("body: bridge offline"));
}

#[tokio::test]
async fn set_posts_param_and_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/hvac/{DEVICE}")))
        .and(body_json(json!({ "param": "power", "value": "on" })))
        .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client(&mock_server).await.set("power", "on").await.unwrap();

    assert_eq!(body, "accepted");
}

#[tokio::test]
async fn set_accepts_any_success_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    assert_eq!(client(&mock_server).await.set("setpoint", "215").await.unwrap(), "{}");
}

#[tokio::test]
async fn set_surfaces_device_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown param: colour"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).await.set("colour", "blue").await.unwrap_err().to_string();

    assert!(err.starts_with("invalid status code: 400"));
    assert!(err.contains("unknown param: colour"));
}

#[tokio::test]
async fn health_endpoint() {
    let addr = health::start("127.0.0.1:0").await.unwrap();

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status().as_u16(), 501);
    assert_eq!(response.text().await.unwrap(), "not implemented");
}

#[tokio::test]
async fn health_bind_failure_is_an_error() {
    let addr = health::start("127.0.0.1:0").await.unwrap();

    assert!(health::start(&addr.to_string()).await.is_err());
}
