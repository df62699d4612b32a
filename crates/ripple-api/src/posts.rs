use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use ripple_types::api::Claims;
use ripple_types::models::Post;

use crate::AppState;
use crate::error::ApiError;
use crate::uploads::UploadForm;

/// POST /posts — multipart, authenticated.
///
/// Author display fields are copied from the poster's profile as it is
/// right now; later profile edits do not rewrite existing posts.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = UploadForm::collect(multipart, &state.storage).await?;
    let description = form.require("description")?.to_string();

    let author = state
        .db
        .get_user_by_id(&claims.sub)?
        .ok_or(ApiError::NotFound("user"))?;

    let post = Post {
        id: Uuid::new_v4(),
        author_id: author.id,
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        description,
        location: author.location.clone(),
        picture_path: form.picture_path.clone(),
        author_picture_path: author.picture_path.clone(),
        likes: HashMap::new(),
        comments: vec![],
        created_at: Utc::now(),
    };

    state
        .db
        .create_post(&post)
        .map_err(|e| ApiError::Conflict(e.to_string()))?;

    let posts = state.db.list_posts()?;
    Ok((StatusCode::CREATED, Json(posts)))
}

/// GET /posts
pub async fn feed(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.db.list_posts()?))
}

/// GET /posts/{user_id}
pub async fn user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.db.list_posts_by_author(&user_id)?))
}

/// PATCH /posts/{id}/like
///
/// Membership toggle on the like map, written back as a whole document.
/// No version check, so overlapping toggles on the same post are
/// last-write-wins.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut post = state
        .db
        .get_post(&id)?
        .ok_or(ApiError::NotFound("post"))?;

    if post.likes.remove(&claims.sub).is_none() {
        post.likes.insert(claims.sub, true);
    }

    state.db.update_post(&post)?;

    Ok(Json(post))
}
