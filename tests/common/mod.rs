#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use comicvault::api::{self, AppState};
use comicvault::config::Config;
use comicvault::db::Store;
use comicvault::services::seed;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_KEY: &str = "MONERO_123";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn store(&self) -> &Store {
        self.state.store()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, &[], None).await
    }

    pub async fn get_with_key(&self, uri: &str, key_id: i32) -> (StatusCode, Value) {
        let key = key_id.to_string();
        self.request("GET", uri, &[("x-key-id", key.as_str())], None).await
    }

    pub async fn send_with_key(
        &self,
        method: &str,
        uri: &str,
        key_id: i32,
        body: Value,
    ) -> (StatusCode, Value) {
        let key = key_id.to_string();
        self.request(method, uri, &[("x-key-id", key.as_str())], Some(body))
            .await
    }

    pub async fn send_with_token(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let auth = format!("Bearer {token}");
        self.request(method, uri, &[("Authorization", auth.as_str())], body)
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                &[],
                Some(json!({"username": username, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Unlocks with `key_value` and returns the key handle.
    pub async fn unlock(&self, key_value: &str) -> i32 {
        let (status, body) = self
            .request(
                "POST",
                "/api/unlock",
                &[],
                Some(json!({"unlockKey": key_value})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "unlock failed: {body}");
        i32::try_from(body["data"]["keyId"].as_i64().unwrap()).unwrap()
    }

    pub async fn register(&self, username: &str, password: &str) -> i32 {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                &[],
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        i32::try_from(body["data"]["userId"].as_i64().unwrap()).unwrap()
    }

    /// Creates a key through the admin API and returns its id.
    pub async fn create_key(&self, admin_token: &str, key_value: &str) -> i32 {
        let (status, body) = self
            .send_with_token(
                "POST",
                "/api/admin/keys",
                admin_token,
                Some(json!({"key_value": key_value})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create key failed: {body}");
        i32::try_from(body["data"]["keyId"].as_i64().unwrap()).unwrap()
    }

    /// Creates a comic with `chapters` chapters of two pages each and returns its id.
    pub async fn create_comic(&self, admin_token: &str, title: &str, chapters: i32) -> i32 {
        let (status, body) = self
            .send_with_token(
                "POST",
                "/api/admin/comics",
                admin_token,
                Some(json!({
                    "title": title,
                    "author": "Test Author",
                    "genre": "Fantasy",
                    "rating": 7.5,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create comic failed: {body}");
        let comic_id = i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap();

        for number in 1..=chapters {
            let (status, body) = self
                .send_with_token(
                    "POST",
                    &format!("/api/admin/comics/{comic_id}/chapters"),
                    admin_token,
                    Some(json!({"number": number, "title": format!("Chapter {number}")})),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "add chapter failed: {body}");
            let chapter_id = body["data"]["id"].as_i64().unwrap();

            for page in 1..=2 {
                let (status, _) = self
                    .send_with_token(
                        "POST",
                        &format!("/api/admin/chapters/{chapter_id}/pages"),
                        admin_token,
                        Some(json!({
                            "page_number": page,
                            "image_url": format!(
                                "https://img.example.com/{comic_id}/{number}/{page}.jpg"
                            ),
                        })),
                    )
                    .await;
                assert_eq!(status, StatusCode::OK);
            }
        }

        comic_id
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    let path = std::env::temp_dir().join(format!("comicvault-test-{}.db", Uuid::new_v4()));
    config.general.database_path = format!("sqlite:{}", path.display());
    config.general.metrics_enabled = false;
    config.security.jwt_secret = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.catalog.seed_demo_on_empty = false;
    config
}

/// Fresh database with the bootstrap admin and its key.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let security = config.security.clone();
    let state = api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    seed::ensure_admin(state.store(), &security)
        .await
        .expect("Failed to bootstrap admin");

    let router = api::router(state.clone());
    TestApp { router, state }
}
