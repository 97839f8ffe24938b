//! Shared helpers for API integration tests.
//!
//! Every test app runs the production router over a fresh [`MemoryStore`].

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use presence_api::auth::jwt::{generate_access_token, JwtConfig};
use presence_api::auth::password::hash_password;
use presence_api::config::ServerConfig;
use presence_api::router::build_app_router;
use presence_api::state::AppState;
use presence_core::roles::{ROLE_ADMIN, ROLE_USER};
use presence_core::settings::PresenceSettings;
use presence_db::models::department::CreateDepartment;
use presence_db::models::employee::{CreateEmployee, Employee};
use presence_db::models::user::{CreateUser, User};
use presence_db::{MemoryStore, PresenceStore};
use presence_events::BroadcastHub;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
        presence: PresenceSettings::default(),
        bootstrap_admin: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub hub: Arc<BroadcastHub>,
    pub config: ServerConfig,
}

impl TestApp {
    /// Clone of the router for a single `oneshot` request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Create a user with [`TEST_PASSWORD`].
    pub async fn user(&self, username: &str, role: &str) -> User {
        let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
        self.store
            .create_user(&CreateUser {
                username: username.to_string(),
                password: hashed,
                role: role.to_string(),
                full_name: None,
            })
            .await
            .expect("user creation should succeed")
    }

    /// Bearer token for a freshly created admin.
    pub async fn admin_token(&self) -> String {
        let user = self.user("admin", ROLE_ADMIN).await;
        self.token_for(&user)
    }

    /// Bearer token for a freshly created regular user.
    pub async fn user_token(&self) -> String {
        let user = self.user("staff", ROLE_USER).await;
        self.token_for(&user)
    }

    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt)
            .expect("token generation should succeed")
    }

    pub async fn department(&self, name: &str) -> i64 {
        self.store
            .create_department(&CreateDepartment {
                name: name.to_string(),
                name_ja: format!("{name}部"),
                icon: None,
            })
            .await
            .expect("department creation should succeed")
            .id
    }

    pub async fn employee(&self, department_id: i64, first_name: &str) -> Employee {
        self.store
            .create_employee(&CreateEmployee {
                first_name: first_name.to_string(),
                last_name: "Tanaka".to_string(),
                first_name_ja: first_name.to_string(),
                last_name_ja: "田中".to_string(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                position: "Engineer".to_string(),
                position_ja: "エンジニア".to_string(),
                department_id,
                profile_image_url: None,
            })
            .await
            .expect("employee creation should succeed")
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(BroadcastHub::new());
    let dyn_store: Arc<dyn PresenceStore> = store.clone();
    let state = AppState::new(dyn_store, Arc::clone(&hub), config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        hub,
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
