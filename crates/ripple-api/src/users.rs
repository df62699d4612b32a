use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use ripple_types::api::{Claims, FriendSummary, UserProfile};
use ripple_types::models::User;

use crate::AppState;
use crate::error::ApiError;

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_id(&id)?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserProfile::from(user)))
}

/// GET /users/{id}/friends
pub async fn get_friends(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_id(&id)?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(resolve_friends(&state, &user)?))
}

/// PATCH /users/{id}/{friend_id}
///
/// The relationship is symmetric: toggling updates both friend lists.
/// The two document writes are not atomic with each other.
pub async fn toggle_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(Uuid, Uuid)>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if id == friend_id {
        return Err(ApiError::BadRequest(
            "cannot add yourself as a friend".into(),
        ));
    }

    let mut user = state
        .db
        .get_user_by_id(&id)?
        .ok_or(ApiError::NotFound("user"))?;
    let mut friend = state
        .db
        .get_user_by_id(&friend_id)?
        .ok_or(ApiError::NotFound("friend"))?;

    if user.friends.contains(&friend_id) {
        user.friends.retain(|f| *f != friend_id);
        friend.friends.retain(|f| *f != id);
    } else {
        user.friends.push(friend_id);
        friend.friends.push(id);
    }

    state.db.update_user(&user)?;
    state.db.update_user(&friend)?;

    Ok(Json(resolve_friends(&state, &user)?))
}

/// Resolve a friend id list to profile summaries. Ids that no longer
/// resolve are skipped rather than failing the whole request.
fn resolve_friends(state: &AppState, user: &User) -> Result<Vec<FriendSummary>, ApiError> {
    let mut friends = Vec::with_capacity(user.friends.len());
    for friend_id in &user.friends {
        match state.db.get_user_by_id(friend_id)? {
            Some(friend) => friends.push(FriendSummary::from(&friend)),
            None => warn!("friend {} of user {} no longer exists", friend_id, user.id),
        }
    }
    Ok(friends)
}
