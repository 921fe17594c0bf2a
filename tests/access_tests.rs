mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{ADMIN_KEY, spawn_app};
use comicvault::models::access_key::NewAccessKey;
use serde_json::json;

#[tokio::test]
async fn test_unlock_rejections() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("POST", "/api/unlock", &[], Some(json!({"unlockKey": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please enter a key");

    let (status, _) = app
        .request("POST", "/api/unlock", &[], Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(
            "POST",
            "/api/unlock",
            &[],
            Some(json!({"unlockKey": "NOPE"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Wrong unlock key or the key has expired");
}

#[tokio::test]
async fn test_unlock_matches_key_exactly() {
    let app = spawn_app().await;

    for attempt in [format!(" {ADMIN_KEY} "), ADMIN_KEY.to_lowercase(), "   ".to_string()] {
        let (status, body) = app
            .request(
                "POST",
                "/api/unlock",
                &[],
                Some(json!({"unlockKey": attempt})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{attempt:?}");
        assert_eq!(body["message"], "Wrong unlock key or the key has expired");
    }

    let key = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    assert!(key.last_used_at.is_none());
}

#[tokio::test]
async fn test_malformed_unlock_body_uses_envelope() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/unlock",
            &[],
            Some(json!({"unlockKey": ["not", "a", "string"]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unlock_returns_catalog_and_touches_key() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_comic(&admin, "First", 1).await;
    app.create_comic(&admin, "Second", 2).await;

    let before = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    assert!(before.last_used_at.is_none());

    let (status, body) = app
        .request(
            "POST",
            "/api/unlock",
            &[],
            Some(json!({"unlockKey": ADMIN_KEY})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["keyId"], before.id);

    let comics = body["data"]["comics"].as_array().unwrap();
    assert_eq!(comics.len(), 2);
    // Newest first
    assert_eq!(comics[0]["title"], "Second");
    assert_eq!(comics[0]["chapters"].as_array().unwrap().len(), 2);

    let after = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    assert!(after.last_used_at.is_some());
}

#[tokio::test]
async fn test_expired_and_inactive_keys_are_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    app.store()
        .create_key(NewAccessKey {
            key_value: "OLD_KEY".to_string(),
            expires_at: Some(Utc::now() - Duration::hours(1)),
            ..NewAccessKey::default()
        })
        .await
        .unwrap()
        .unwrap();

    let (status, _) = app
        .request(
            "POST",
            "/api/unlock",
            &[],
            Some(json!({"unlockKey": "OLD_KEY"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let key_id = app.create_key(&admin, "PAUSED").await;
    app.unlock("PAUSED").await;

    // Body without is_active deactivates
    let (status, body) = app
        .send_with_token(
            "PUT",
            &format!("/api/admin/keys/{key_id}"),
            &admin,
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, _) = app
        .request(
            "POST",
            "/api/unlock",
            &[],
            Some(json!({"unlockKey": "PAUSED"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_key_handle_is_required_for_scoped_routes() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/comics").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    for handle in ["abc", "424242"] {
        let (status, body) = app
            .request("GET", "/api/history", &[("x-key-id", handle)], None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid key");
    }

    let key_id = app.unlock(ADMIN_KEY).await;
    let (status, body) = app.get_with_key("/api/comics", key_id).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_array());
}

#[tokio::test]
async fn test_search_comics() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_comic(&admin, "Moonlit Harbor", 1).await;
    app.create_comic(&admin, "Desert Crown", 1).await;
    let key_id = app.unlock(ADMIN_KEY).await;

    let (status, body) = app.get_with_key("/api/comics/search?q=moonlit", key_id).await;
    assert_eq!(status, StatusCode::OK);
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Moonlit Harbor");

    // Author matches too
    let (_, body) = app.get_with_key("/api/comics/search?q=test%20author", key_id).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get_with_key("/api/comics/search?q=", key_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query required");
}

#[tokio::test]
async fn test_extend_key() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &admin,
            Some(json!({"days": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Extension days must be greater than 0");

    // Admin key never expired, so extension starts from now.
    let (status, body) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &admin,
            Some(json!({"days": 30})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let expected = (Utc::now() + Duration::days(30)).format("%d/%m/%Y").to_string();
    assert_eq!(body["data"]["new_expiry_date"], expected);

    let first = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    let first_expiry = first.expires_at.unwrap();

    // A future expiry is extended from the expiry, not from now.
    let (status, _) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &admin,
            Some(json!({"days": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let second = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    assert_eq!(second.expires_at.unwrap(), first_expiry + Duration::days(10));
}

#[tokio::test]
async fn test_extend_key_rejects_bad_days() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    for days in [json!(9_000_000_000_000_i64), json!(36_501)] {
        let (status, body) = app
            .send_with_token(
                "POST",
                "/api/user/extend-key",
                &admin,
                Some(json!({"days": days})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Extension days cannot exceed 36500");
    }

    // Wrong JSON type is reported through the envelope, not as a bare rejection.
    let (status, body) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &admin,
            Some(json!({"days": "30"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("days"));

    let key = app.store().get_key_by_value(ADMIN_KEY).await.unwrap().unwrap();
    assert!(key.expires_at.is_none());

    // Still serving after the rejected requests.
    let (status, _) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &admin,
            Some(json!({"days": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_extend_key_without_key() {
    let app = spawn_app().await;
    app.register("reader", "hunter22").await;
    let token = app.login("reader", "hunter22").await;

    let (status, body) = app
        .send_with_token(
            "POST",
            "/api/user/extend-key",
            &token,
            Some(json!({"days": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User has no key");
}
