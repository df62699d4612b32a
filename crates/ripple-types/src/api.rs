use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

// -- JWT Claims --

/// JWT claims verified by the auth middleware on every protected request.
/// Canonical definition lives here in ripple-types; the token is the only
/// session state the server keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

// -- Users --

/// A user record as returned to clients: the stored document minus the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture_path: Option<String>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub friends: Vec<Uuid>,
    pub viewed_profile: u64,
    pub impressions: u64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            picture_path: user.picture_path,
            location: user.location,
            occupation: user.occupation,
            friends: user.friends,
            viewed_profile: user.viewed_profile,
            impressions: user.impressions,
            created_at: user.created_at,
        }
    }
}

/// The subset of profile fields shown in a friend list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub picture_path: Option<String>,
}

impl From<&User> for FriendSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            occupation: user.occupation.clone(),
            location: user.location.clone(),
            picture_path: user.picture_path.clone(),
        }
    }
}
