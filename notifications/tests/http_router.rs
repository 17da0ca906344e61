//! Notification router contract: status codes, bodies and CORS headers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use sathi_notifications::http::{router, CONFIRMATION_PATH, NOTIFICATION_PATH};
use sathi_notifications::mocks::MockEmailProvider;
use sathi_notifications::NotificationService;
use sathi_testing::test_clock;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(provider: &MockEmailProvider) -> axum::Router {
    let service = NotificationService::new(Arc::new(provider.clone()), Arc::new(test_clock()));
    router(Arc::new(service))
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_cors(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
}

fn confirmation(status: &str) -> Value {
    json!({
        "userEmail": "asha@example.com",
        "userName": "Asha",
        "companionName": "Meera",
        "bookingDate": "2025-03-14",
        "startTime": "18:30",
        "durationHours": 2,
        "venueName": "Blue Tokai",
        "venueAddress": "Bandra West, Mumbai",
        "presenceNature": "silent_observant",
        "totalAmount": 3000,
        "status": status,
        "bookingId": "0f8fad5b-d9cb-469f-a165-70867728950e"
    })
}

#[tokio::test]
async fn test_options_is_answered_without_sending() {
    for path in [CONFIRMATION_PATH, NOTIFICATION_PATH] {
        let provider = MockEmailProvider::new();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = app(&provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
        assert_eq!(provider.sent_count(), 0);
    }
}

#[tokio::test]
async fn test_confirmation_success_relays_provider_body() {
    let provider = MockEmailProvider::new();
    let body = serde_json::to_vec(&confirmation("confirmed")).unwrap();

    let response = app(&provider)
        .oneshot(post(CONFIRMATION_PATH, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "emailResponse": { "id": "mock-1" } })
    );

    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["asha@example.com".to_string()]);
    assert!(sent[0].subject.contains("Confirmed"));
    assert!(sent[0].html.contains("2 hours"));
}

#[tokio::test]
async fn test_cancelled_subject_names_companion() {
    let provider = MockEmailProvider::new();
    let body = serde_json::to_vec(&confirmation("cancelled")).unwrap();

    let response = app(&provider)
        .oneshot(post(CONFIRMATION_PATH, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.sent()[0].subject, "❌ Booking Update - Meera");
}

#[tokio::test]
async fn test_notification_goes_to_admin_inbox() {
    let provider = MockEmailProvider::new();
    let body = json!({
        "userName": "asha@example.com",
        "companionName": "Meera",
        "bookingDate": "2025-03-14",
        "startTime": "18:30",
        "venueName": "Blue Tokai",
        "venueAddress": "Bandra West, Mumbai",
        "presenceNature": "calm_listener",
        "totalAmount": 1500,
        "specialNotes": "Window seat please",
        "bookingId": "0f8fad5b-d9cb-469f-a165-70867728950e"
    });

    let response = app(&provider)
        .oneshot(post(NOTIFICATION_PATH, serde_json::to_vec(&body).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = provider.sent();
    assert_eq!(sent[0].to, vec![sathi_notifications::DEFAULT_ADMIN_RECIPIENT.to_string()]);
    assert!(sent[0].html.contains("Window seat please"));
}

#[tokio::test]
async fn test_malformed_body_is_500_with_error() {
    for path in [CONFIRMATION_PATH, NOTIFICATION_PATH] {
        let provider = MockEmailProvider::new();

        let response = app(&provider)
            .oneshot(post(path, "{\"userEmail\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        let body = json_body(response).await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
        assert_eq!(provider.sent_count(), 0);
    }
}

#[tokio::test]
async fn test_missing_field_is_500() {
    let provider = MockEmailProvider::new();
    let mut body = confirmation("confirmed");
    body.as_object_mut().unwrap().remove("companionName");

    let response = app(&provider)
        .oneshot(post(CONFIRMATION_PATH, serde_json::to_vec(&body).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("companionName"));
}

#[tokio::test]
async fn test_provider_failure_is_500_with_error() {
    let provider = MockEmailProvider::failing();
    let body = serde_json::to_vec(&confirmation("confirmed")).unwrap();

    let response = app(&provider)
        .oneshot(post(CONFIRMATION_PATH, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("rejected"));
}
