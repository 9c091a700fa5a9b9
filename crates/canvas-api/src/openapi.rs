//! OpenAPI document for the HTTP surface

use utoipa::OpenApi;

use crate::handlers::{admin, communities, health, messages, posts, products, users};

#[derive(OpenApi)]
#[openapi(
    info(title = "ArchiCanvas API", description = "Artist marketplace and communities"),
    paths(
        health::health_check,
        health::readiness_check,
        users::register,
        users::login,
        users::logout,
        users::me,
        users::change_password,
        users::my_badges,
        communities::list_communities,
        communities::create_community,
        communities::get_community,
        communities::request_join,
        communities::approve_member,
        communities::reject_member,
        communities::pending_requests,
        communities::leave_community,
        messages::list_messages,
        messages::post_message,
        products::list_products,
        products::get_product,
        products::create_product,
        products::buy_request,
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        admin::stats,
        admin::pending_artists,
        admin::approve_artist,
        admin::reject_artist,
        admin::pending_communities,
        admin::approve_community,
        admin::reject_community,
        admin::analytics,
    ),
    tags(
        (name = "health"),
        (name = "users", description = "Accounts and sessions"),
        (name = "communities", description = "Community membership workflow"),
        (name = "messages", description = "Community feed"),
        (name = "products", description = "Artwork catalogue"),
        (name = "posts", description = "Photo story board"),
        (name = "admin", description = "Moderation and dashboard"),
    )
)]
pub struct ApiDoc;
