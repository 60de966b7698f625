use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use geobeacon::mail::{Email, EmailBody, MailError, Mailer};
use geobeacon::{api_router, AppState, Config};

/// Records every dispatch attempt; optionally fails each send.
#[derive(Default)]
struct MockMailer {
    sent: Mutex<Vec<Email>>,
    fail: bool,
}

impl MockMailer {
    fn failing() -> Self {
        MockMailer {
            fail: true,
            ..MockMailer::default()
        }
    }

    fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            Err(MailError::Smtp("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

fn configured() -> Config {
    Config {
        email_to: Some("alerts@example.com".into()),
        email_user: Some("sender@example.com".into()),
        email_pass: Some("app-password".into()),
        ..Config::default()
    }
}

fn state(config: Config, mailer: Option<Arc<MockMailer>>) -> AppState {
    AppState {
        config: Arc::new(config),
        mailer: mailer.map(|m| m as Arc<dyn Mailer>),
    }
}

async fn post_log(state: AppState, payload: Value) -> (StatusCode, Value) {
    let response = api_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/log")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn missing_coordinate_is_rejected_without_dispatch() {
    let mailer = Arc::new(MockMailer::default());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lng": -122.084}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid or missing fields: lat");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn string_coordinate_is_rejected() {
    let mailer = Arc::new(MockMailer::default());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lat": "37.4", "lng": -122.08}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("lat"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn both_coordinates_wrong_typed_names_both_fields() {
    let mailer = Arc::new(MockMailer::default());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lat": true, "lng": null}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid or missing fields: lat, lng");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn valid_report_is_relayed() {
    let mailer = Arc::new(MockMailer::default());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lat": 37.422, "lng": -122.084}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Location received and email sent");
    assert_eq!(
        body["link"],
        "https://www.google.com/maps?q=37.422000,-122.084000"
    );

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, "sender@example.com");
    assert_eq!(sent[0].to, "alerts@example.com");
    assert_eq!(sent[0].subject, "New location captured");
}

#[tokio::test]
async fn missing_recipient_skips_dispatch() {
    let mailer = Arc::new(MockMailer::default());
    let config = Config {
        email_to: None,
        ..configured()
    };
    let (status, body) = post_log(
        state(config, Some(mailer.clone())),
        json!({"lat": 1.0, "lng": 2.0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Location received (no notification recipient configured)"
    );
    assert_eq!(body["link"], "https://www.google.com/maps?q=1.000000,2.000000");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn missing_credentials_skips_dispatch() {
    let config = Config {
        email_to: Some("alerts@example.com".into()),
        ..Config::default()
    };
    let (status, body) = post_log(state(config, None), json!({"lat": 1.0, "lng": 2.0})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Location received (email not sent - missing credentials)"
    );
    assert!(body["link"].as_str().is_some());
}

#[tokio::test]
async fn transport_failure_still_responds_ok_with_link() {
    let mailer = Arc::new(MockMailer::failing());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lat": 37.422, "lng": -122.084}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Location received (email notification failed)");
    assert_eq!(
        body["link"],
        "https://www.google.com/maps?q=37.422000,-122.084000"
    );
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn vpn_report_flags_notification_but_not_response() {
    let mailer = Arc::new(MockMailer::default());
    let (status, body) = post_log(
        state(configured(), Some(mailer.clone())),
        json!({"lat": 1.0, "lng": 2.0, "isVPN": true, "vpnProvider": "Acme VPN"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Location received and email sent");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New location captured (VPN detected)");
    match &sent[0].body {
        EmailBody::Multipart { text, html } => {
            assert!(text.contains("VPN: Detected"));
            assert!(text.contains("VPN provider: Acme VPN"));
            assert!(html.contains("Acme VPN"));
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
}

#[tokio::test]
async fn api_keys_echoes_configured_values() {
    let config = Config {
        ipinfo_key: Some("ipinfo-token".into()),
        ..Config::default()
    };
    let response = api_router(state(config, None))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api-keys")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["ipinfoKey"], "ipinfo-token");
    assert_eq!(body["vpnapiKey"], Value::Null);
}
