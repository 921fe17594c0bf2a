//! Administrator endpoints, mounted under `/admin` behind session and admin checks.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use super::{AppState, observability};

mod comics;
mod comments;
mod keys;
mod stats;
mod users;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}/assign-key", post(users::assign_key))
        .route("/keys", get(keys::list_keys).post(keys::create_key))
        .route("/keys/bulk", post(keys::create_bulk))
        .route(
            "/keys/{id}",
            put(keys::set_key_active).delete(keys::delete_key),
        )
        .route("/comments", get(comments::list_comments))
        .route("/comments/{id}", delete(comments::delete_comment))
        .route("/comments/{id}/approve", put(comments::approve_comment))
        .route("/comics", post(comics::create_comic))
        .route(
            "/comics/{id}",
            put(comics::update_comic).delete(comics::delete_comic),
        )
        .route("/comics/{id}/chapters", post(comics::add_chapter))
        .route("/chapters/{id}/pages", post(comics::add_page))
        .route("/stats/comments", get(stats::comment_stats))
        .route("/stats/reading", get(stats::reading_stats))
        .route("/metrics", get(observability::get_metrics))
}
