/*
 * Responsibility
 * - v1 URL layout: /health, /blogs, /users, /login
 * - no auth layer here: token checks happen per operation inside BlogService
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    blogs::{add_comment, create_blog, delete_blog, get_blog, list_blogs, update_blog},
    health::health,
    login::login,
    users::{create_user, list_users},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/blogs", get(list_blogs).post(create_blog))
        .route(
            "/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .route("/blogs/{id}/comments", post(add_comment))
        .route("/users", get(list_users).post(create_user))
        .route("/login", post(login))
}
