mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{ADMIN_KEY, spawn_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_and_preview() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);

    let (status, body) = app.get("/api/preview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["title"].is_string());
    assert!(body["data"]["image_url"].is_string());
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            &[],
            Some(json!({
                "username": "reader",
                "email": "reader@example.com",
                "password": "hunter22",
                "full_name": "Avid Reader",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["message"].is_string());

    // Same username, different email
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            &[],
            Some(json!({
                "username": "reader",
                "email": "other@example.com",
                "password": "hunter22",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username or email already exists");

    let token = app.login("reader", "hunter22").await;

    let (status, body) = app.send_with_token("GET", "/api/auth/me", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "reader");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["key"].is_null());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_requires_fields() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            &[],
            Some(json!({"username": "nobody"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;
    app.register("reader", "hunter22").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            &[],
            Some(json!({"username": "reader", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            &[],
            Some(json!({"username": "ghost", "password": "hunter22"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            &[],
            Some(json!({"username": "reader"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_banned_user_cannot_login() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user_id = app.register("troll", "hunter22").await;

    let (status, _) = app
        .send_with_token(
            "PUT",
            &format!("/api/admin/users/{user_id}"),
            &admin,
            Some(json!({"status": "banned"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            &[],
            Some(json!({"username": "troll", "password": "hunter22"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account is banned");
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, body) = app
        .send_with_token("GET", "/api/auth/me", "not-a-jwt", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_update_profile() {
    let app = spawn_app().await;
    app.register("reader", "hunter22").await;
    let token = app.login("reader", "hunter22").await;

    let (status, body) = app
        .send_with_token(
            "PUT",
            "/api/user/profile",
            &token,
            Some(json!({"full_name": "Renamed Reader", "phone": "555-0100"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Renamed Reader");
    assert_eq!(body["data"]["phone"], "555-0100");
}

#[tokio::test]
async fn test_admin_profile_includes_key() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, body) = app.send_with_token("GET", "/api/auth/me", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["key"]["key_value"], ADMIN_KEY);
}

#[tokio::test]
async fn test_unknown_comic_is_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/comic/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Comic not found");

    let (status, _) = app.get("/api/comic/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comic_detail_and_chapter_content() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let comic_id = app.create_comic(&admin, "Iron Garden", 3).await;

    let (status, body) = app.get(&format!("/api/comic/{comic_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Iron Garden");
    assert_eq!(body["data"]["totalChapters"], 3);
    assert_eq!(body["data"]["chapters"].as_array().unwrap().len(), 3);

    let (status, body) = app
        .get(&format!("/api/comic/{comic_id}/chapter/2"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["number"], 2);
    assert_eq!(body["data"]["pages"], 2);
    let pages = body["data"]["pages_content"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["pageNumber"], 1);

    let (status, body) = app
        .get(&format!("/api/comic/{comic_id}/chapter/9"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Chapter not found");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = spawn_app().await;

    for uri in ["/api/nope", "/elsewhere"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Route not found");
    }
}

#[tokio::test]
async fn test_wrongly_typed_comment_uses_envelope() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let comic_id = app.create_comic(&admin, "Typed", 1).await;
    let key_id = app.unlock(ADMIN_KEY).await;

    let (status, body) = app
        .send_with_key(
            "POST",
            &format!("/api/comic/{comic_id}/comment"),
            key_id,
            json!({"content": "Nice", "rating": "5"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("rating"));
}
