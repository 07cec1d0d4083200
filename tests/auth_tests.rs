use actix_web::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use clubhub::database::models::{AccountStatus, LoginInput, RegisterUserInput, UserRole};
use clubhub::services::auth::AuthError;

mod common;

use common::TestApp;

#[actix_web::test]
async fn test_register_creates_pending_member() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "  Asha@Example.EDU ", "password": "password123", "name": "Asha" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["email"], "asha@example.edu");
    assert_eq!(body["data"]["user"]["role"], "member");
    assert_eq!(body["data"]["user"]["status"], "pending");
    assert_eq!(body["data"]["user"]["emailVerified"], false);
}

#[actix_web::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new();
    app.register_user("dup@example.edu", "First").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "DUP@example.edu", "password": "password123", "name": "Second" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "An account with this email already exists.");
}

#[actix_web::test]
async fn test_register_validates_input() {
    let app = TestApp::new();
    let service = &app.state.auth_service;

    let weak = service
        .register(RegisterUserInput {
            email: "weak@example.edu".to_string(),
            password: "123".to_string(),
            name: "Weak".to_string(),
        })
        .await;
    assert!(matches!(weak, Err(AuthError::WeakPassword)));

    let bad_email = service
        .register(RegisterUserInput {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            name: "Bad".to_string(),
        })
        .await;
    assert!(matches!(bad_email, Err(AuthError::InvalidEmail)));

    let no_name = service
        .register(RegisterUserInput {
            email: "anon@example.edu".to_string(),
            password: "password123".to_string(),
            name: "   ".to_string(),
        })
        .await;
    assert!(matches!(no_name, Err(AuthError::MissingName)));
}

#[actix_web::test]
async fn test_login_outcomes() {
    let app = TestApp::new();
    app.register_user("login@example.edu", "Login User").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "login@example.edu", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "login@example.edu");

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "login@example.edu", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password.");
    assert_eq!(body["code"], "auth/invalid-credential");

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.edu", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No account found with this email.");
    assert_eq!(body["code"], "auth/user-not-found");
}

#[actix_web::test]
async fn test_repeated_failures_lock_the_account() {
    let app = TestApp::new();
    app.register_user("locked@example.edu", "Locked").await;
    let service = &app.state.auth_service;

    let attempt = |password: &str| LoginInput {
        email: "locked@example.edu".to_string(),
        password: password.to_string(),
    };

    // test config allows three attempts
    assert!(matches!(
        service.login(attempt("nope-1")).await,
        Err(AuthError::InvalidCredential)
    ));
    assert!(matches!(
        service.login(attempt("nope-2")).await,
        Err(AuthError::InvalidCredential)
    ));
    assert!(matches!(
        service.login(attempt("nope-3")).await,
        Err(AuthError::TooManyRequests)
    ));
    assert!(matches!(
        service.login(attempt("password123")).await,
        Err(AuthError::TooManyRequests)
    ));
}

#[actix_web::test]
async fn test_me_requires_a_valid_token() {
    let app = TestApp::new();
    let user = app.register_user("me@example.edu", "Me").await;

    let (status, body) = app.get("/api/auth/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.as_str());

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    // only provider failures carry a code
    assert!(body.get("code").is_none());

    let (status, _) = app.get("/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_verification_then_profile_completion_activates_account() {
    let app = TestApp::new();
    let user = app.register_user("newbie@example.edu", "Newbie").await;

    // profile cannot be completed before the email is verified
    let profile = json!({
        "name": "Newbie Kumar",
        "phone": "9876543210",
        "rollNumber": "23CS101",
        "department": "CSE",
        "year": "2"
    });
    let (status, body) = app
        .put("/api/auth/profile", Some(&user.token), profile.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Please verify your email before continuing.");

    let (status, body) = app
        .post("/api/auth/send-verification", Some(&user.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "newbie@example.edu");
    assert!(sent[0].text.as_deref().unwrap().contains(&token));

    let (status, body) = app
        .post("/api/auth/verify-email", None, json!({ "token": token }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["emailVerified"], true);
    assert_eq!(body["data"]["status"], "onboarding");

    // tokens are single use
    let (status, body) = app
        .post("/api/auth/verify-email", None, json!({ "token": token }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "This verification link is invalid or has expired."
    );

    let (status, body) = app
        .put("/api/auth/profile", Some(&user.token), profile)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["rollNumber"], "23CS101");

    let stored = app
        .state
        .users()
        .find_by_id(&user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, AccountStatus::Active);
    assert_eq!(stored.name, "Newbie Kumar");
}

#[actix_web::test]
async fn test_send_verification_for_verified_user_is_a_no_op() {
    let app = TestApp::new();
    let user = app.active_member("done@example.edu", "Done").await;

    let (status, body) = app
        .post("/api/auth/send-verification", Some(&user.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email is already verified.");
    assert!(app.mailer.sent().is_empty());
}

#[actix_web::test]
async fn test_verification_email_escapes_the_name() {
    let app = TestApp::new();
    let user = app
        .register_user("markup@example.edu", "<script>alert('x')</script> & co")
        .await;

    let (status, _) = app
        .post("/api/auth/send-verification", Some(&user.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.mailer.sent();
    let html = sent[0].html.as_deref().unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert('x')&lt;/script&gt; &amp; co"));
}

#[actix_web::test]
async fn test_reload_reflects_role_changes() {
    let app = TestApp::new();
    let user = app.register_user("promoted@example.edu", "Promoted").await;
    app.set_access(&user.id, UserRole::Admin, AccountStatus::Active)
        .await;

    let (status, body) = app
        .post("/api/auth/reload", Some(&user.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "admin");

    let claims = app
        .state
        .auth_service
        .verify_token(body["data"]["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.role, UserRole::Admin);
    assert!(claims.email_verified);
}
