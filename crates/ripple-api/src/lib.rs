pub mod auth;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod storage;
pub mod uploads;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use ripple_db::Database;

use crate::storage::Storage;

pub type AppState = Arc<AppStateInner>;

/// Everything handlers need, constructed once at startup and passed in
/// explicitly. Handlers never read configuration from the environment.
pub struct AppStateInner {
    pub db: Database,
    pub storage: Storage,
    pub jwt_secret: String,
}

/// API routes. Register and login are public; every user and post route
/// sits behind the bearer-token middleware. Static files and cross-cutting
/// layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health));

    let protected = Router::new()
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/friends", get(users::get_friends))
        .route("/users/{id}/{friend_id}", patch(users::toggle_friend))
        .route("/posts", get(posts::feed).post(posts::create_post))
        .route("/posts/{user_id}", get(posts::user_posts))
        .route("/posts/{id}/like", patch(posts::toggle_like))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    public.merge(protected).with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
