use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccessService, AccountService, CatalogService, CommentService, ReadingService,
};
use crate::state::SharedState;

mod access;
mod account;
mod admin;
pub mod auth;
mod catalog;
mod comments;
mod error;
mod extract;
mod observability;
mod reading;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn access_service(&self) -> &Arc<dyn AccessService> {
        &self.shared.access_service
    }

    #[must_use]
    pub fn account_service(&self) -> &Arc<dyn AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn reading_service(&self) -> &Arc<dyn ReadingService> {
        &self.shared.reading_service
    }

    #[must_use]
    pub fn comment_service(&self) -> &Arc<dyn CommentService> {
        &self.shared.comment_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

/// Opens the store from `config` and builds the application state in one step.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let session_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/user/profile", put(account::update_profile))
        .route("/user/extend-key", post(account::extend_key))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    // Layers run outside-in: the session check populates the user the admin check reads.
    let admin_routes = admin::router()
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(session_routes)
        .nest("/admin", admin_routes)
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .fallback(route_not_found)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/preview", get(system::preview))
        .route("/unlock", post(access::unlock))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Key-scoped (x-key-id)
        .route("/comics", get(catalog::list_comics))
        .route("/comics/search", get(catalog::search_comics))
        .route("/comic/{id}", get(catalog::get_comic))
        .route("/comic/{id}/chapter/{number}", get(catalog::get_chapter))
        .route("/comic/{id}/comments", get(comments::list_comments))
        .route("/comic/{id}/comment", post(comments::post_comment))
        .route("/history", get(reading::history))
        .route("/bookmarks", get(reading::list_bookmarks))
        .route(
            "/bookmark",
            post(reading::add_bookmark).delete(reading::remove_bookmark),
        )
        .route("/bookmark/check", get(reading::check_bookmark))
}
