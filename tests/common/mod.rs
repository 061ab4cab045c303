#![allow(dead_code)]

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use attendify::routes::API_PREFIX;

pub const PASSWORD: &str = "password1";

pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = serde_json::from_slice(&bytes).expect("body should be json");
    (status, json)
}

pub async fn register(app: &Router, email: &str, name: &str, role: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            &api_path("/auth/register"),
            None,
            json!({"email": email, "password": PASSWORD, "name": name, "role": role}),
        ),
    )
    .await
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            &api_path("/auth/login"),
            None,
            json!({"email": email, "password": PASSWORD}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// Registers and logs in, returning `(user_id, token)`.
pub async fn signup(app: &Router, email: &str, name: &str, role: &str) -> (String, String) {
    let (status, body) = register(app, email, name, role).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let id = body["data"]["id"]
        .as_str()
        .expect("id should be a string")
        .to_string();
    (id, login(app, email).await)
}

pub async fn create_class(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        json_request("POST", &api_path("/classes"), Some(token), json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create class failed: {body}");
    body["data"].clone()
}
