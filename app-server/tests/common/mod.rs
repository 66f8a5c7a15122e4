use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use app_server::domain::user::errors::UserError;
use app_server::domain::user::models::EmailAddress;
use app_server::domain::user::models::NewUser;
use app_server::domain::user::models::User;
use app_server::domain::user::models::UserId;
use app_server::domain::user::ports::UserRepository;
use app_server::domain::user::service::UserService;
use app_server::inbound::http::router::create_router;
use app_server::observability::user::ObservedUserRepository;
use app_server::observability::user::ObservedUserService;
use async_trait::async_trait;
use auth::Authenticator;
use auth::SigningKey;
use auth::TokenConfig;
use auth::TokenProvider;
use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str =
    "dGVzdC1zZWNyZXQta2V5LWZvci1qd3Qtc2lnbmluZy1hdC1sZWFzdC02NC1ieXRlcy1sb25nLTAxMjM0NTY3ODk=";

/// Store double keeping users in memory, enforcing email uniqueness.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i64, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = users.len() as i64 + 1;
        let created = User {
            id: UserId(id),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.value()).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// Test application driving the real router in process
pub struct TestApp {
    pub router: Router,
    pub token_provider: TokenProvider,
}

pub fn token_provider(config: TokenConfig) -> TokenProvider {
    let key = SigningKey::from_base64(TEST_SECRET, "HmacSHA512").unwrap();
    TokenProvider::new(key, config)
}

impl TestApp {
    pub fn spawn() -> Self {
        let repository = Arc::new(ObservedUserRepository::new(
            InMemoryUserRepository::default(),
        ));
        let authenticator = Arc::new(Authenticator::new(token_provider(TokenConfig::default())));
        let user_service = Arc::new(ObservedUserService::new(UserService::new(
            repository,
            Arc::clone(&authenticator),
        )));

        Self {
            router: create_router(user_service, authenticator),
            token_provider: token_provider(TokenConfig::default()),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Helper to make a request with an optional JSON body and bearer token
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), None).await
    }

    pub async fn get_authenticated(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::GET, path, None, Some(token)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/users",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register then log in, returning the login response data
    pub async fn register_and_login(&self, email: &str, password: &str) -> Value {
        let registered = self.register(email, password).await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let login = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK);

        login.body["data"].clone()
    }
}

/// Assert the uniform error body shape and return its message.
pub fn assert_error_body(response: &TestResponse, status: StatusCode) -> String {
    assert_eq!(response.status, status);
    assert_eq!(response.body["statusCode"], status.as_u16());
    assert_eq!(
        response.body["error"],
        status.canonical_reason().unwrap_or_default()
    );
    assert!(response.body["timestamp"].is_string());

    response.body["message"]
        .as_str()
        .expect("error body has a message")
        .to_string()
}
