//! HTTP API tests driven through the full router and middleware stack.

use axum::http::StatusCode;
use order_service::config::AppConfig;
use order_service::lifecycle::startup::build_with_logger;
use order_service::lifecycle::Shutdown;
use order_service::observability::{Logger, MemorySink, Severity};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

mod common;

use common::{json_request, TestApp};

fn new_order() -> Value {
    json!({
        "amount": 42.5,
        "longitude": 10.0,
        "latitude": 20.0,
        "clientId": 3,
        "paymentMethod": "visa"
    })
}

#[tokio::test]
async fn test_list_seeded_orders() {
    let app = TestApp::new();

    let (status, body) = app.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["clientId"], json!(1));
    assert_eq!(orders[1]["paymentMethod"], json!("visa"));
}

#[tokio::test]
async fn test_list_filters() {
    let app = TestApp::new();

    let (_, body) = app.get("/orders?clientId=7").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app.get("/orders?paymentMethod=cash").await;
    assert_eq!(body[0]["clientId"], json!(1));

    let (_, body) = app.get("/orders?clientId=7&paymentMethod=cash").await;
    assert_eq!(body, json!([]));

    let (status, body) = app.get("/orders?clientId=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "clientId must be a number, got 'abc'", "status": 400})
    );

    let (status, _) = app.get("/orders?paymentMethod=bitcoin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_crud_round_trip() {
    let app = TestApp::new();

    let (status, created) = app
        .send(json_request("POST", "/orders", new_order().to_string()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["amount"], json!(42.5));

    let (status, fetched) = app.get(&format!("/orders/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .send(json_request(
            "PUT",
            &format!("/orders/{}", id),
            json!({"amount": 50.0}).to_string(),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], json!(50.0));
    assert_eq!(updated["clientId"], json!(3));

    let (status, body) = app
        .send(json_request("DELETE", &format!("/orders/{}", id), ""))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app.get(&format!("/orders/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Order not found", "status": 404}));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = TestApp::new();

    let (status, _) = app.get("/orders/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = app
        .send(json_request(
            "PUT",
            &format!("/orders/{}", missing),
            json!({"amount": 1.0}).to_string(),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(json_request("DELETE", &format!("/orders/{}", missing), ""))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_successful_request_is_observed() {
    let app = TestApp::new();
    app.logs.clear();

    let (status, created) = app
        .send(json_request("POST", "/orders", new_order().to_string()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let entries = app.logs.entries();
    let position = |context: &str| {
        entries
            .iter()
            .position(|e| e.context.as_deref() == Some(context))
            .unwrap()
    };

    let entry = &entries[position("HTTP_REQUEST")];
    assert_eq!(entry.severity, Severity::Info);
    assert_eq!(entry.message, "Incoming POST request to /orders");

    let details: Value =
        serde_json::from_str(&entries[position("HTTP_REQUEST_DETAILS")].message).unwrap();
    assert_eq!(details["method"], json!("POST"));
    assert_eq!(details["body"], new_order());

    let exit = &entries[position("HTTP")];
    assert!(exit.message.starts_with("POST /orders - 201 - "));
    assert!(exit.message.ends_with("ms"));

    let response: Value =
        serde_json::from_str(&entries[position("HTTP_RESPONSE")].message).unwrap();
    assert_eq!(response["statusCode"], json!(201));
    assert_eq!(
        response["responseSize"],
        json!(serde_json::to_string(&created).unwrap().len())
    );

    assert!(position("HTTP_REQUEST") < position("ORDERS"));
    assert!(position("ORDERS") < position("HTTP"));
    assert!(app.logs.at(Severity::Error).is_empty());
}

#[tokio::test]
async fn test_get_body_is_not_logged() {
    let app = TestApp::new();
    app.logs.clear();

    app.get("/orders?clientId=1").await;

    let details: Value =
        serde_json::from_str(&app.logs.in_context("HTTP_REQUEST_DETAILS")[0].message).unwrap();
    assert!(details.get("body").is_none());
    assert_eq!(details["query"], json!({"clientId": "1"}));
}

#[tokio::test]
async fn test_failed_request_is_observed_and_returned() {
    let app = TestApp::new();
    app.logs.clear();
    let missing = uuid::Uuid::new_v4();

    let (status, body) = app.get(&format!("/orders/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Order not found"));

    let errors = app.logs.at(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context.as_deref(), Some("HTTP_ERROR"));
    assert!(errors[0]
        .message
        .starts_with(&format!("Request failed: GET /orders/{} - 404 - ", missing)));

    let details: Value =
        serde_json::from_str(&app.logs.in_context("HTTP_ERROR_DETAILS")[0].message).unwrap();
    assert_eq!(details["statusCode"], json!(404));
    assert_eq!(
        details["error"],
        json!({"message": "Order not found", "name": "NotFound"})
    );

    let request: Value =
        serde_json::from_str(&app.logs.in_context("HTTP_REQUEST_DETAILS")[0].message).unwrap();
    assert_eq!(request["params"], json!({"id": missing.to_string()}));

    assert!(app.logs.in_context("HTTP").is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = TestApp::new();
    app.logs.clear();

    let (status, body) = app
        .send(json_request("POST", "/orders", "{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(400));

    let details: Value =
        serde_json::from_str(&app.logs.in_context("HTTP_ERROR_DETAILS")[0].message).unwrap();
    assert_eq!(details["error"]["name"], json!("InvalidBody"));

    let request: Value =
        serde_json::from_str(&app.logs.in_context("HTTP_REQUEST_DETAILS")[0].message).unwrap();
    assert_eq!(request["body"], json!("{not json"));
}

#[tokio::test]
async fn test_missing_fields_are_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request("POST", "/orders", json!({"amount": 1.0}).to_string()))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], json!(422));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_body_size = 16;
    let app = TestApp::with_config(config);

    let (status, _) = app
        .send(json_request("POST", "/orders", new_order().to_string()))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unrouted_requests_are_not_observed() {
    let app = TestApp::new();
    app.logs.clear();

    let (status, _) = app.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.logs.in_context("HTTP_REQUEST").is_empty());
}

#[tokio::test]
async fn test_server_serves_and_shuts_down() {
    let logs = Arc::new(MemorySink::new());
    let logger = Logger::with_sinks(Arc::new(MemorySink::new()), logs.clone());
    let app = build_with_logger(&AppConfig::default(), logger);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(app.server.run(listener, shutdown.subscribe()));

    let orders: Value = reqwest::get(format!("http://{}/orders", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 2);

    let details: Value =
        serde_json::from_str(&logs.in_context("HTTP_REQUEST_DETAILS")[0].message).unwrap();
    assert!(details["userAgent"].is_string());

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}
