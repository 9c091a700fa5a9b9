//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{admin, communities, docs, health, messages, posts, products, users};
use crate::state::AppState;

/// Versioned API routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Probes and the API document, kept outside the rate limiter
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(community_routes())
        .merge(product_routes())
        .merge(post_routes())
        .merge(admin_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route("/users/me", get(users::me))
        .route("/users/me/password", patch(users::change_password))
        .route("/users/my-badges", get(users::my_badges))
}

fn community_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/communities",
            get(communities::list_communities).post(communities::create_community),
        )
        .route("/communities/:id", get(communities::get_community))
        .route("/communities/:id/request-join", post(communities::request_join))
        .route("/communities/:id/leave", post(communities::leave_community))
        .route(
            "/communities/:id/pending-requests",
            get(communities::pending_requests),
        )
        .route("/communities/:id/approve-member", post(communities::approve_member))
        .route("/communities/:id/reject-member", post(communities::reject_member))
        .route(
            "/communities/:id/messages",
            get(messages::list_messages).post(messages::post_message),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/:id", get(products::get_product))
        .route("/products/:id/buy-request", post(products::buy_request))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/:id", get(posts::get_post))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/artists/pending", get(admin::pending_artists))
        .route("/admin/artists/:id/approve", patch(admin::approve_artist))
        .route("/admin/artists/:id/reject", patch(admin::reject_artist))
        .route("/admin/communities/pending", get(admin::pending_communities))
        .route("/admin/communities/:id/approve", patch(admin::approve_community))
        .route("/admin/communities/:id/reject", patch(admin::reject_community))
        .route("/admin/analytics", get(admin::analytics))
}
