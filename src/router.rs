use crate::handlers::{
    health::health_check,
    posts::{create_post, delete_post, get_post, get_posts, update_post},
    users::{
        create_user, delete_user, get_user, get_user_open_posts, get_user_posts, get_users,
        update_user,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Association routes: a user's posts and the open-posts view
        .route("/api/v1/users/:user_id/posts", get(get_user_posts))
        .route("/api/v1/users/:user_id/posts/open", get(get_user_open_posts))
        // Post CRUD routes
        .route("/api/v1/posts", post(create_post))
        .route("/api/v1/posts", get(get_posts))
        .route("/api/v1/posts/:post_id", get(get_post))
        .route("/api/v1/posts/:post_id", put(update_post))
        .route("/api/v1/posts/:post_id", delete(delete_post))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
