use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use ripple_api::auth::hash_password;
use ripple_db::Database;
use ripple_types::models::{Post, User};

/// Insert sample users and posts for local development.
///
/// Runs only while the users collection is empty, so repeated boots with
/// RIPPLE_SEED=1 do not duplicate data.
pub fn run(db: &Database) -> Result<()> {
    if db.count_users()? > 0 {
        info!("Seed skipped: users collection is not empty");
        return Ok(());
    }

    let mut jane = sample_user("Jane", "Doe", "jane@ripple.dev", "Hamburg", "Photographer")?;
    let mut marco = sample_user("Marco", "Reyes", "marco@ripple.dev", "Lisbon", "Barista")?;

    jane.friends.push(marco.id);
    marco.friends.push(jane.id);

    db.create_user(&jane)?;
    db.create_user(&marco)?;

    db.create_post(&sample_post(&jane, "First light over the harbor this morning."))?;
    db.create_post(&sample_post(&marco, "Dialed in a new espresso blend today."))?;

    info!("Seeded 2 users and 2 posts");
    Ok(())
}

fn sample_user(
    first_name: &str,
    last_name: &str,
    email: &str,
    location: &str,
    occupation: &str,
) -> Result<User> {
    Ok(User {
        id: Uuid::new_v4(),
        first_name: first_name.into(),
        last_name: last_name.into(),
        email: email.into(),
        password_hash: hash_password("password")?,
        picture_path: None,
        location: Some(location.into()),
        occupation: Some(occupation.into()),
        friends: vec![],
        viewed_profile: 0,
        impressions: 0,
        created_at: Utc::now(),
    })
}

fn sample_post(author: &User, description: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        author_id: author.id,
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        description: description.into(),
        location: author.location.clone(),
        picture_path: None,
        author_picture_path: author.picture_path.clone(),
        likes: HashMap::new(),
        comments: vec![],
        created_at: Utc::now(),
    }
}
