mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset};
use common::{ADMIN_KEY, TestApp, spawn_app};
use serde_json::{Value, json};

async fn setup() -> (TestApp, String, i32) {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let key_id = app.unlock(ADMIN_KEY).await;
    (app, admin, key_id)
}

#[tokio::test]
async fn test_chapter_read_records_history_and_views() {
    let (app, admin, key_id) = setup().await;
    let comic_id = app.create_comic(&admin, "Tide Walker", 3).await;

    let (status, _) = app
        .get_with_key(&format!("/api/comic/{comic_id}/chapter/1"), key_id)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_with_key("/api/history", key_id).await;
    let first_read = last_read_at(&body["data"][0]);

    tokio::time::sleep(Duration::from_millis(20)).await;
    app.get_with_key(&format!("/api/comic/{comic_id}/chapter/2"), key_id)
        .await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Reading the same chapter again refreshes the row instead of adding one.
    app.get_with_key(&format!("/api/comic/{comic_id}/chapter/1"), key_id)
        .await;

    let (status, body) = app.get_with_key("/api/history", key_id).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["chapter_number"], 1);
    assert_eq!(rows[0]["comic_title"], "Tide Walker");
    assert_eq!(rows[1]["chapter_number"], 2);
    assert!(last_read_at(&rows[0]) > first_read);
    assert!(last_read_at(&rows[0]) > last_read_at(&rows[1]));

    let comic = app.store().get_comic(comic_id).await.unwrap().unwrap();
    assert_eq!(comic.views, 3);
}

fn last_read_at(row: &Value) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(row["last_read_at"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_chapter_read_without_key_is_not_recorded() {
    let (app, admin, key_id) = setup().await;
    let comic_id = app.create_comic(&admin, "Quiet Lanes", 1).await;

    let (status, _) = app
        .get(&format!("/api/comic/{comic_id}/chapter/1"))
        .await;
    assert_eq!(status, StatusCode::OK);

    // An unusable handle still serves the chapter.
    let (status, _) = app
        .request(
            "GET",
            &format!("/api/comic/{comic_id}/chapter/1"),
            &[("x-key-id", "garbage")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.store().count_history(key_id).await.unwrap(), 0);
    let comic = app.store().get_comic(comic_id).await.unwrap().unwrap();
    assert_eq!(comic.views, 0);
}

#[tokio::test]
async fn test_history_is_capped_at_twenty() {
    let (app, admin, key_id) = setup().await;
    let comic_id = app.create_comic(&admin, "Long Road", 22).await;

    for number in 1..=22 {
        app.get_with_key(&format!("/api/comic/{comic_id}/chapter/{number}"), key_id)
            .await;
    }

    let (_, body) = app.get_with_key("/api/history", key_id).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0]["chapter_number"], 22);
    assert_eq!(app.store().count_history(key_id).await.unwrap(), 22);
}

#[tokio::test]
async fn test_bookmark_lifecycle() {
    let (app, admin, key_id) = setup().await;
    let comic_id = app.create_comic(&admin, "Paper Lantern", 2).await;

    let (status, body) = app
        .send_with_key("POST", "/api/bookmark", key_id, json!({"comicId": comic_id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bookmark added");

    let (status, body) = app
        .send_with_key("POST", "/api/bookmark", key_id, json!({"comicId": comic_id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Already bookmarked");

    // A chapter bookmark is a different slot from the whole-comic one.
    let (_, body) = app
        .send_with_key(
            "POST",
            "/api/bookmark",
            key_id,
            json!({"comicId": comic_id, "chapterNumber": 2}),
        )
        .await;
    assert_eq!(body["message"], "Bookmark added");

    let (_, body) = app.get_with_key("/api/bookmarks", key_id).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["comic_title"], "Paper Lantern");

    let (_, body) = app
        .get_with_key(
            &format!("/api/bookmark/check?comicId={comic_id}&chapterNumber=2"),
            key_id,
        )
        .await;
    assert_eq!(body["data"]["isBookmarked"], true);

    let (_, body) = app
        .get_with_key(
            &format!("/api/bookmark/check?comicId={comic_id}&chapterNumber=1"),
            key_id,
        )
        .await;
    assert_eq!(body["data"]["isBookmarked"], false);

    let (status, body) = app
        .send_with_key("DELETE", "/api/bookmark", key_id, json!({"comicId": comic_id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bookmark removed");

    let (_, body) = app
        .get_with_key(&format!("/api/bookmark/check?comicId={comic_id}"), key_id)
        .await;
    assert_eq!(body["data"]["isBookmarked"], false);

    // The chapter bookmark survives removal of the whole-comic one.
    let (_, body) = app.get_with_key("/api/bookmarks", key_id).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["chapter_number"], 2);
}

#[tokio::test]
async fn test_bookmark_validation() {
    let (app, _admin, key_id) = setup().await;

    let (status, body) = app
        .send_with_key("POST", "/api/bookmark", key_id, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "comicId is required");

    let (status, body) = app
        .send_with_key("POST", "/api/bookmark", key_id, json!({"comicId": 777}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comic not found");

    let (status, _) = app.get("/api/bookmarks").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_comment_posting_rules() {
    let (app, admin, key_id) = setup().await;
    let comic_id = app.create_comic(&admin, "Glass Tower", 1).await;
    let uri = format!("/api/comic/{comic_id}/comment");

    let (status, _) = app
        .send_with_key("POST", &uri, key_id, json!({"content": "Great"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send_with_key("POST", &uri, key_id, json!({"content": "Great", "rating": 6}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send_with_key("POST", &uri, key_id, json!({"content": "Great", "rating": 5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["rating"], 5);

    let (status, body) = app
        .send_with_key("POST", &uri, key_id, json!({"content": "Again", "rating": 4}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "You have already reviewed this comic. Each account may review a comic only once."
    );

    let (status, body) = app.get(&format!("/api/comic/{comic_id}/comments")).await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Great");
}

#[tokio::test]
async fn test_comment_requires_a_user_behind_the_key() {
    let (app, admin, _) = setup().await;
    let comic_id = app.create_comic(&admin, "Orphan Key", 1).await;
    app.create_key(&admin, "LOOSE_KEY").await;
    let loose = app.unlock("LOOSE_KEY").await;

    let (status, body) = app
        .send_with_key(
            "POST",
            &format!("/api/comic/{comic_id}/comment"),
            loose,
            json!({"content": "Hi", "rating": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/comic/{comic_id}/comment"),
            &[],
            Some(json!({"content": "Hi", "rating": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_comment_on_missing_comic() {
    let (app, _admin, key_id) = setup().await;

    let (status, body) = app
        .send_with_key(
            "POST",
            "/api/comic/4040/comment",
            key_id,
            json!({"content": "Hello", "rating": 4}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comic not found");
}
