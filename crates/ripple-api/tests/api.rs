use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use ripple_api::storage::Storage;
use ripple_api::{AppState, AppStateInner, router};
use ripple_db::Database;

const BOUNDARY: &str = "ripple-test-boundary";

async fn test_app() -> (Router, PathBuf) {
    let db = Database::open_in_memory().unwrap();
    let dir = std::env::temp_dir().join(format!("ripple-test-{}", Uuid::new_v4()));
    let storage = Storage::new(dir.clone()).await.unwrap();
    let state: AppState = Arc::new(AppStateInner {
        db,
        storage,
        jwt_secret: "test-secret".into(),
    });
    (router(state), dir)
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str, picture: Option<(&str, &[u8])>) -> Value {
    let body = multipart_body(
        &[
            ("first_name", "Jane"),
            ("last_name", "Doe"),
            ("email", email),
            ("password", "hunter2!"),
            ("location", "Hamburg"),
            ("occupation", "Photographer"),
        ],
        picture,
    );
    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(
            r#"{{"email":"{email}","password":"{password}"}}"#
        )))
        .unwrap();
    send(app, req).await
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn patch(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn create_post(app: &Router, token: &str, description: &str) -> (StatusCode, Value) {
    let body = multipart_body(&[("description", description)], None);
    let req = Request::builder()
        .method("POST")
        .uri("/posts")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

#[tokio::test]
async fn register_then_login_yields_token() {
    let (app, _dir) = test_app().await;

    let profile = register(&app, "a@x.com", None).await;
    assert_eq!(profile["email"], "a@x.com");
    // The stored hash must never be echoed back.
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());

    let (status, body) = login(&app, "a@x.com", "hunter2!").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let (app, _dir) = test_app().await;
    register(&app, "a@x.com", None).await;

    let (status, body) = login(&app, "a@x.com", "not-the-password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid credentials");

    let (status, _) = login(&app, "nobody@x.com", "hunter2!").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_surfaces_as_store_error() {
    let (app, _dir) = test_app().await;
    register(&app, "dup@x.com", None).await;

    let body = multipart_body(
        &[
            ("first_name", "Jane"),
            ("last_name", "Doe"),
            ("email", "dup@x.com"),
            ("password", "hunter2!"),
        ],
        None,
    );
    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn protected_routes_reject_requests_without_a_token() {
    let (app, _dir) = test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/posts")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "access denied");

    let (status, _) = send(&app, get("/posts", "not-a-real-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_post_denormalizes_author_fields() {
    let (app, _dir) = test_app().await;

    let profile = register(&app, "a@x.com", Some(("avatar.png", b"png bytes"))).await;
    assert_eq!(profile["picture_path"], "avatar.png");
    let (_, body) = login(&app, "a@x.com", "hunter2!").await;
    let token = body["token"].as_str().unwrap().to_string();

    // Empty feed before any posts.
    let (status, feed) = send(&app, get("/posts", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 0);

    let (status, posts) = create_post(&app, &token, "hello world").await;
    assert_eq!(status, StatusCode::CREATED);
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["description"], "hello world");
    assert_eq!(posts[0]["first_name"], "Jane");
    assert_eq!(posts[0]["last_name"], "Doe");
    assert_eq!(posts[0]["author_picture_path"], "avatar.png");
    assert_eq!(posts[0]["author_id"], profile["id"]);

    // Author posts filter sees it; another user's filter does not.
    let (_, mine) = send(
        &app,
        get(&format!("/posts/{}", profile["id"].as_str().unwrap()), &token),
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, theirs) = send(&app, get(&format!("/posts/{}", Uuid::new_v4()), &token)).await;
    assert_eq!(theirs.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn like_toggle_twice_returns_to_original_state() {
    let (app, _dir) = test_app().await;

    let profile = register(&app, "a@x.com", None).await;
    let user_id = profile["id"].as_str().unwrap().to_string();
    let (_, body) = login(&app, "a@x.com", "hunter2!").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (_, posts) = create_post(&app, &token, "like me").await;
    let post_id = posts.as_array().unwrap()[0]["id"].as_str().unwrap().to_string();

    let (status, liked) = send(&app, patch(&format!("/posts/{post_id}/like"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"][&user_id], true);

    let (status, unliked) = send(&app, patch(&format!("/posts/{post_id}/like"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unliked["likes"].as_object().unwrap().len(), 0);

    let (status, _) = send(&app, patch(&format!("/posts/{}/like", Uuid::new_v4()), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn friend_toggle_is_symmetric() {
    let (app, _dir) = test_app().await;

    let a = register(&app, "a@x.com", None).await;
    let b = register(&app, "b@x.com", None).await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let b_id = b["id"].as_str().unwrap().to_string();
    let (_, body) = login(&app, "a@x.com", "hunter2!").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, friends) = send(&app, patch(&format!("/users/{a_id}/{b_id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let friends = friends.as_array().unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], b_id.as_str());

    // The reverse direction was updated too.
    let (_, b_friends) = send(&app, get(&format!("/users/{b_id}/friends"), &token)).await;
    assert_eq!(b_friends.as_array().unwrap()[0]["id"], a_id.as_str());

    // Toggling again removes the relationship on both sides.
    let (_, friends) = send(&app, patch(&format!("/users/{a_id}/{b_id}"), &token)).await;
    assert_eq!(friends.as_array().unwrap().len(), 0);
    let (_, b_friends) = send(&app, get(&format!("/users/{b_id}/friends"), &token)).await;
    assert_eq!(b_friends.as_array().unwrap().len(), 0);

    // Self-friending is rejected.
    let (status, _) = send(&app, patch(&format!("/users/{a_id}/{a_id}"), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_returns_profile_or_404() {
    let (app, _dir) = test_app().await;

    let profile = register(&app, "a@x.com", None).await;
    let id = profile["id"].as_str().unwrap();
    let (_, body) = login(&app, "a@x.com", "hunter2!").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, user) = send(&app, get(&format!("/users/{id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "a@x.com");
    assert!(user.get("password_hash").is_none());

    let (status, _) = send(&app, get(&format!("/users/{}", Uuid::new_v4()), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn same_filename_uploads_overwrite() {
    let (app, dir) = test_app().await;

    register(&app, "a@x.com", Some(("shared.png", b"first bytes"))).await;
    register(&app, "b@x.com", Some(("shared.png", b"second bytes"))).await;

    let stored = tokio::fs::read(dir.join("shared.png")).await.unwrap();
    assert_eq!(stored, b"second bytes");
}
