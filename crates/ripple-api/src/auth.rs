use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use ripple_types::api::{Claims, LoginRequest, LoginResponse, UserProfile};
use ripple_types::models::User;

use crate::AppState;
use crate::error::ApiError;
use crate::uploads::UploadForm;

const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_LIFETIME_DAYS: i64 = 30;

/// POST /auth/register — multipart, `picture` field optional.
///
/// Persistence failures (including a duplicate email) surface as a 500
/// carrying the store's error text; there is no structured conflict code.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = UploadForm::collect(multipart, &state.storage).await?;

    let first_name = form.require("first_name")?.to_string();
    let last_name = form.require("last_name")?.to_string();
    let email = form.require("email")?.to_string();
    let password = form.require("password")?;

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(password)?;

    let user = User {
        id: Uuid::new_v4(),
        first_name,
        last_name,
        email,
        password_hash,
        picture_path: form.picture_path.clone(),
        location: form.optional("location"),
        occupation: form.optional("occupation"),
        friends: vec![],
        viewed_profile: 0,
        impressions: 0,
        created_at: Utc::now(),
    };

    state.db.create_user(&user)?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

/// POST /auth/login — JSON. 404 for an unknown email, 400 for a wrong
/// password, token plus profile on success.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::NotFound("user"))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(anyhow!("corrupt password hash: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = issue_token(&state.jwt_secret, user.id)?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Salted one-way hash with Argon2id. Also used by the dev seeder.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

fn issue_token(secret: &str, user_id: Uuid) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
