use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{auth as auth_handlers, docs, users, whatsapp};
use super::state::AppState;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check and docs
        .route("/health", get(auth_handlers::health_check))
        .route("/docs", get(docs::docs_page))
        .route("/openapi.json", get(docs::openapi_json))
        // Twilio webhook
        .route("/whatsapp", post(whatsapp::receive_message))
        // Auth routes
        .route("/api/auth/login", post(auth_handlers::login))
        // User admin routes
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:user_id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/:user_id/preferences",
            patch(users::update_preferences),
        )
        .route("/api/users/:user_id/inventory", get(users::get_inventory))
        .route(
            "/api/users/:user_id/conversation",
            delete(users::clear_conversation),
        )
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // Shared state
        .with_state(state)
}
