use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as persisted in the users collection.
///
/// The password hash lives here because the document is the authoritative
/// record; API responses go through [`crate::api::UserProfile`], which
/// never carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub picture_path: Option<String>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub friends: Vec<Uuid>,
    pub viewed_profile: u64,
    pub impressions: u64,
    pub created_at: DateTime<Utc>,
}

/// A post as persisted in the posts collection.
///
/// Author display fields are denormalized at creation time and do not
/// update when the author's profile changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub location: Option<String>,
    pub picture_path: Option<String>,
    pub author_picture_path: Option<String>,
    /// user id -> liked flag. Toggled as whole-document writes, so two
    /// concurrent toggles on the same post are last-write-wins.
    pub likes: HashMap<Uuid, bool>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
}
