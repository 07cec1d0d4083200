use std::fs;
use std::sync::Arc;

use actix_web::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use clubhub::config::Config;

mod common;

use common::{FailingMailer, TestApp};

#[actix_web::test]
async fn test_avatars_missing_directory_is_empty() {
    let mut config = Config::test_config();
    config.avatars_dir = "/definitely/not/here".to_string();
    let app = TestApp::with_config(config);

    let (status, body) = app.get("/api/avatars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[actix_web::test]
async fn test_avatars_grouped_by_category() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("animals")).unwrap();
    fs::create_dir_all(dir.path().join("robots")).unwrap();
    fs::write(dir.path().join("animals/owl.png"), b"png").unwrap();
    fs::write(dir.path().join("animals/cat.JPG"), b"jpg").unwrap();
    fs::write(dir.path().join("animals/readme.txt"), b"text").unwrap();
    fs::write(dir.path().join("robots/r2.svg"), b"<svg/>").unwrap();
    fs::write(dir.path().join("stray.png"), b"png").unwrap();

    let mut config = Config::test_config();
    config.avatars_dir = dir.path().to_string_lossy().into_owned();
    let app = TestApp::with_config(config);

    let (status, body) = app.get("/api/avatars", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "animals": ["/avatars/animals/cat.JPG", "/avatars/animals/owl.png"],
            "robots": ["/avatars/robots/r2.svg"]
        })
    );
}

#[actix_web::test]
async fn test_send_email_requires_fields() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/send-email", None, json!({ "subject": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Missing required fields: to, subject, and text or html"
    );
    assert!(app.mailer.sent().is_empty());
}

#[actix_web::test]
async fn test_send_email_returns_message_id() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/send-email",
            None,
            json!({ "to": "member@example.edu", "subject": "Welcome", "text": "Hello!" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "messageId": "<test-1@clubhub.test>" }));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Welcome");
    assert_eq!(sent[0].html, None);
}

#[actix_web::test]
async fn test_send_email_reports_relay_failure() {
    let app = TestApp::with_mailer(Arc::new(FailingMailer));

    let (status, body) = app
        .post(
            "/api/send-email",
            None,
            json!({ "to": "member@example.edu", "subject": "Welcome", "html": "<p>Hi</p>" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "mail relay responded with HTTP 502: relay down");
}

#[actix_web::test]
async fn test_seed_creates_fixture_users() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "count": 10 }));

    let users = app.state.users().list_users().await;
    assert_eq!(users.len(), 10);
    assert!(users.iter().all(|u| !u.is_admin()));
}

#[actix_web::test]
async fn test_seed_is_disabled_in_production() {
    let mut config = Config::test_config();
    config.environment = "production".to_string();
    let app = TestApp::with_config(config);

    let (status, body) = app.get("/api/seed", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert!(app.state.users().list_users().await.is_empty());
}

#[actix_web::test]
async fn test_sitemap_lists_public_pages() {
    let mut config = Config::test_config();
    config.client_base_url = "https://club.example.edu/".to_string();
    let app = TestApp::with_config(config);

    let (status, body) = app
        .call(actix_web::test::TestRequest::get().uri("/sitemap.xml"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(body.contains("<loc>https://club.example.edu</loc>"));
    assert!(body.contains("<loc>https://club.example.edu/events</loc>"));
    assert!(body.contains("<loc>https://club.example.edu/signup</loc>"));
    assert_eq!(body.matches("<url>").count(), 11);
}
