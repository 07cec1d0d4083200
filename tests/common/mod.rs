#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use chrono::{Duration, Local};
use fake::Fake;
use fake::faker::name::en::Name;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use clubhub::AppState;
use clubhub::config::Config;
use clubhub::database::models::{
    AccountStatus, Event, EventInput, PhaseStatus, RegistrationStatus, UserAccessUpdate, UserRole,
};
use clubhub::database::store::ChangeEvent;
use clubhub::database::{Database, Document, DocumentStore, Query, StoreError};
use clubhub::routes;
use clubhub::services::mailer::{EmailMessage, MailError, Mailer};

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("<test-{}@clubhub.test>", sent.len()))
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<String, MailError> {
        Err(MailError::Rejected {
            status: 502,
            body: "relay down".to_string(),
        })
    }
}

/// A store whose every call fails, for exercising degraded reads.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, _collection: &str, _query: &Query) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn add(&self, _collection: &str, _data: Document) -> Result<Document, StoreError> {
        Err(unavailable())
    }

    async fn set(
        &self,
        _collection: &str,
        _id: &str,
        _data: Document,
    ) -> Result<Document, StoreError> {
        Err(unavailable())
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn batch_add(
        &self,
        _collection: &str,
        _documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    fn watch(&self) -> broadcast::Receiver<ChangeEvent> {
        broadcast::channel(1).1
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

// Test application wrapper
pub struct TestApp {
    pub state: web::Data<AppState>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(config, Database::memory(), mailer.clone());
        Self {
            state: web::Data::new(state),
            mailer,
        }
    }

    pub fn with_mailer(mailer: Arc<dyn Mailer>) -> Self {
        let state = AppState::new(Config::test_config(), Database::memory(), mailer);
        Self {
            state: web::Data::new(state),
            mailer: Arc::new(RecordingMailer::default()),
        }
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(Config::test_config(), Database::new(store), mailer.clone());
        Self {
            state: web::Data::new(state),
            mailer,
        }
    }

    /// Send a request through the full route table and return the status
    /// with the raw body.
    pub async fn call(&self, req: test::TestRequest) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .configure(routes::configure),
        )
        .await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn call_json(&self, req: test::TestRequest) -> (StatusCode, Value) {
        let (status, body) = self.call(req).await;
        let value = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call_json(authorized(test::TestRequest::get().uri(uri), token))
            .await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call_json(authorized(test::TestRequest::post().uri(uri), token).set_json(body))
            .await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call_json(authorized(test::TestRequest::put().uri(uri), token).set_json(body))
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call_json(authorized(test::TestRequest::delete().uri(uri), token))
            .await
    }

    pub async fn register_user(&self, email: &str, name: &str) -> TestUser {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": "password123", "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            email: body["data"]["user"]["email"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// A verified member with a completed profile.
    pub async fn active_member(&self, email: &str, name: &str) -> TestUser {
        let user = self.register_user(email, name).await;
        self.set_access(&user.id, UserRole::Member, AccountStatus::Active)
            .await;
        user
    }

    /// An active member with a generated name and a unique address.
    pub async fn random_member(&self) -> TestUser {
        let name: String = Name().fake();
        let email = format!("member-{}@example.edu", uuid::Uuid::new_v4().simple());
        self.active_member(&email, &name).await
    }

    pub async fn admin(&self, email: &str) -> TestUser {
        let user = self.register_user(email, "Club Admin").await;
        self.set_access(&user.id, UserRole::Admin, AccountStatus::Active)
            .await;
        user
    }

    pub async fn set_access(&self, user_id: &str, role: UserRole, status: AccountStatus) {
        self.state
            .users()
            .update_access(
                user_id,
                &UserAccessUpdate {
                    role: Some(role),
                    status: Some(status),
                    email_verified: Some(true),
                },
            )
            .await
            .unwrap()
            .expect("user exists");
    }

    pub async fn create_event(&self, input: EventInput) -> Event {
        self.state.events().create_event(input).await.unwrap()
    }
}

pub fn authorized(req: test::TestRequest, token: Option<&str>) -> test::TestRequest {
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {}", token))),
        None => req,
    }
}

pub fn date_in_days(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// An event open for solo registration a month from now.
pub fn open_event(title: &str) -> EventInput {
    EventInput {
        title: title.to_string(),
        description: "Hands-on session".to_string(),
        date: date_in_days(30),
        time: Some("10:00".to_string()),
        venue: Some("Seminar Hall".to_string()),
        image_url: None,
        registration_status: Some(RegistrationStatus::Open),
        attendance_code: None,
        attendance_status: Some(PhaseStatus::Upcoming),
        feedback_status: Some(PhaseStatus::Upcoming),
        min_team_size: None,
        max_team_size: None,
    }
}
