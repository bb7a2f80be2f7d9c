/// Application state and router builder
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::store::MemoryStore;
///
/// let state = AppState::new(Arc::new(MemoryStore::new()), Config::for_memory_store());
/// let app = build_router(state);
/// ```

use crate::{
    config::Config,
    middleware::security::{security_headers, SecurityHeaders},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;
use taskboard_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor. The store is
/// injected so tests can swap PostgreSQL for [`MemoryStore`](taskboard_shared::store::MemoryStore).
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health
/// ├── GET    /users
/// ├── POST   /users
/// ├── DELETE /users          # id in body
/// ├── DELETE /users/:id
/// ├── GET    /tasks?userId=
/// ├── POST   /tasks
/// ├── PUT    /tasks/:id
/// ├── DELETE /tasks/:id
/// └── /api/...               # same user and task routes, for the browser client
/// ```
///
/// # Middleware Stack
///
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security response headers
pub fn build_router(state: AppState) -> Router {
    let resource_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .delete(routes::users::delete_user),
        )
        .route("/users/:id", delete(routes::users::delete_user_by_id))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        );

    let cors = cors_layer(&state.config.api.cors_origins);
    let security = SecurityHeaders::new(state.config.api.production);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(resource_routes.clone())
        .nest("/api", resource_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(security, security_headers))
        .with_state(state)
}

/// Permissive CORS for `*`, otherwise the listed origins only
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
