//! End-to-end tests driving the full router against the in-memory store.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use story_api::{
    adapters::{GeminiStoryAdapter, MemoryAdapter},
    config::Config,
    web::{build_router, state::AppState},
};
use story_time_core::{
    domain::{GeneratedStory, StoryLength},
    fallback::word_count,
    paragraphs::split_paragraphs,
    ports::StoryGenerationService,
};
use tower::ServiceExt;

/// Always answers with the same two-paragraph story.
struct FixedStoryGenerator;

#[async_trait]
impl StoryGenerationService for FixedStoryGenerator {
    async fn generate_story(
        &self,
        lesson: &str,
        _theme: Option<&str>,
        _length: StoryLength,
    ) -> GeneratedStory {
        GeneratedStory {
            title: format!("The {lesson} Tree"),
            content: "Para one.\n\nPara two.".to_string(),
        }
    }
}

struct TestApp {
    router: Router,
    db: Arc<MemoryAdapter>,
}

fn config(jwt_secret: Option<&str>) -> Arc<Config> {
    let mut vars = HashMap::new();
    vars.insert("CONNECTION_STRING".to_string(), "memory://".to_string());
    if let Some(secret) = jwt_secret {
        vars.insert("JWT_SECRET".to_string(), secret.to_string());
    }
    Arc::new(Config::from_vars(&vars).expect("test config"))
}

fn app_with(generator: Arc<dyn StoryGenerationService>, jwt_secret: Option<&str>) -> TestApp {
    let db = Arc::new(MemoryAdapter::new());
    let state = Arc::new(AppState {
        db: db.clone(),
        config: config(jwt_secret),
        story_generator: generator,
    });
    TestApp {
        router: build_router(state).expect("router"),
        db,
    }
}

/// The production adapter with no key: every story comes from the templates.
fn template_app() -> TestApp {
    let adapter = GeminiStoryAdapter::new(None, "http://unused", "gemini-test".to_string());
    app_with(Arc::new(adapter), Some("test-secret"))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, cookie, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

async fn register(router: &Router, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(
        router,
        post_json(
            "/user/register",
            json!({ "username": username, "email": email, "password": password }),
        ),
    )
    .await;
    (status, body)
}

//=========================================================================================
// Stories
//=========================================================================================

#[tokio::test]
async fn create_story_defaults_length_to_normal() {
    let app = template_app();
    let (status, _, body) = send(&app.router, post_json("/story/create", json!({ "lesson": "sharing" }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Story created successfully");
    let story = &body["story"];
    assert_eq!(story["lesson"], "sharing");
    assert_eq!(story["length"], "NORMAL");
    assert_eq!(story["theme"], Value::Null);
    assert_eq!(story["title"], "Learning sharing");

    let content = story["content"].as_str().expect("content");
    assert!(word_count(content) >= 500);
    assert!(!split_paragraphs(content).is_empty());
}

#[tokio::test]
async fn fallback_story_meets_word_target_for_each_length() {
    let app = template_app();
    for length in StoryLength::ALL {
        let (status, _, body) = send(
            &app.router,
            post_json(
                "/story/create",
                json!({ "lesson": "kindness", "theme": "SPACE", "length": length.as_str() }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["story"]["title"], "SPACE Adventure: Learning kindness");
        let content = body["story"]["content"].as_str().expect("content");
        assert!(word_count(content) >= length.target_word_count());
    }
}

#[tokio::test]
async fn create_story_rejects_invalid_fields() {
    let app = template_app();
    let (status, _, body) = send(
        &app.router,
        post_json("/story/create", json!({ "theme": "SPACE", "length": "EPIC" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    let paths: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .filter_map(|issue| issue["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["lesson", "length"]);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = template_app();
    let request = Request::post("/story/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("request");
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "body");
}

#[tokio::test]
async fn stored_story_can_be_fetched_and_listed() {
    let app = app_with(Arc::new(FixedStoryGenerator), Some("test-secret"));
    let owner = uuid::Uuid::new_v4();

    let (_, _, first) = send(
        &app.router,
        post_json("/story/create", json!({ "lesson": "patience", "userId": owner.to_string() })),
    )
    .await;
    let (_, _, second) = send(&app.router, post_json("/story/create", json!({ "lesson": "honesty" }))).await;

    let first_id = first["story"]["id"].as_str().expect("id").to_string();
    let second_id = second["story"]["id"].as_str().expect("id").to_string();

    let (status, _, body) = send(&app.router, get(&format!("/story/{first_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["story"]["title"], "The patience Tree");
    let content = body["story"]["content"].as_str().expect("content");
    assert_eq!(split_paragraphs(content), vec!["Para one.", "Para two."]);

    let (status, _, body) = send(&app.router, get("/story")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["stories"]
        .as_array()
        .expect("stories")
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert_eq!(ids, vec![second_id.as_str(), first_id.as_str()]);

    let (_, _, body) = send(&app.router, get(&format!("/story?userId={owner}"))).await;
    let stories = body["stories"].as_array().expect("stories");
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0]["id"], first_id.as_str());
}

#[tokio::test]
async fn unknown_story_is_404_and_bad_id_is_500() {
    let app = template_app();

    let (status, _, body) = send(&app.router, get(&format!("/story/{}", uuid::Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Story not found");

    let (status, _, body) = send(&app.router, get("/story/not-an-id")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error retrieving story");
    assert!(body["error"].is_string());
}

//=========================================================================================
// Users
//=========================================================================================

#[tokio::test]
async fn register_validates_and_rejects_duplicates() {
    let app = template_app();

    let (status, body) = register(&app.router, "robin", "robin@example.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["userId"].is_string());

    let (status, body) = register(&app.router, "robin", "other@example.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username or email already exists");

    let (status, _) = register(&app.router, "robin2", "robin@example.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.db.user_count().await, 1);

    let (status, body) = register(&app.router, "ro", "robin", "123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
    assert_eq!(app.db.user_count().await, 1);
}

#[tokio::test]
async fn login_sets_cookie_only_for_correct_password() {
    let app = template_app();
    register(&app.router, "robin", "robin@example.com", "secret1").await;

    let (status, cookie, body) = send(
        &app.router,
        post_json("/user/login", json!({ "email": "robin@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
    assert!(cookie.is_none());

    let (status, cookie, _) = send(
        &app.router,
        post_json("/user/login", json!({ "email": "nobody@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());

    let (status, cookie, _) = send(
        &app.router,
        post_json("/user/login", json!({ "email": "robin@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.expect("session cookie");
    assert!(cookie.starts_with("accessToken="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn login_without_jwt_secret_is_500() {
    let adapter = GeminiStoryAdapter::new(None, "http://unused", "gemini-test".to_string());
    let app = app_with(Arc::new(adapter), None);
    register(&app.router, "robin", "robin@example.com", "secret1").await;

    let (status, cookie, body) = send(
        &app.router,
        post_json("/user/login", json!({ "email": "robin@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "JWT secret is not configured");
    assert!(cookie.is_none());
}

#[tokio::test]
async fn session_cookie_supplies_story_owner() {
    let app = template_app();
    let (_, body) = register(&app.router, "robin", "robin@example.com", "secret1").await;
    let user_id = body["userId"].as_str().expect("userId").to_string();

    let (_, cookie, _) = send(
        &app.router,
        post_json("/user/login", json!({ "email": "robin@example.com", "password": "secret1" })),
    )
    .await;
    let cookie = cookie.expect("session cookie");
    let token_pair = cookie.split(';').next().expect("cookie pair").to_string();

    let request = Request::post("/story/create")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, token_pair)
        .body(Body::from(json!({ "lesson": "bravery", "length": "QUICK" }).to_string()))
        .expect("request");
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["story"]["userId"], user_id.as_str());
}

//=========================================================================================
// Service
//=========================================================================================

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = template_app();

    let (status, _, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "Healthy");

    let (status, _, body) = send(&app.router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Story Time server running");

    let (status, _, body) = send(&app.router, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/story/create"].is_object());
    assert!(body["paths"]["/user/login"].is_object());
}
