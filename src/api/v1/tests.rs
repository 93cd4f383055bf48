use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{
    app::build_router,
    config::Config,
    repos::MemoryStore,
    services::{auth::build_auth_service, id_codec::IdCodec},
    state::AppState,
};

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let config = Config::for_tests();
        let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            build_auth_service(&config),
            id_codec,
        );
        Self {
            router: build_router(state.clone(), &config),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_and_login(&self, username: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/api/v1/users",
                None,
                Some(json!({ "username": username, "name": "Tester", "password": "salainen" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/login",
                None,
                Some(json!({ "username": username, "password": "salainen" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_blog(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/blogs",
                Some(token),
                Some(json!({ "title": title, "author": "A", "url": "http://blog.test" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }

    async fn blog_count(&self) -> usize {
        let (_, body) = self.send(Method::GET, "/api/v1/blogs", None, None).await;
        body.as_array().unwrap().len()
    }
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_path_returns_unknown_endpoint() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "unknown endpoint" }));
}

#[tokio::test]
async fn authenticated_create_links_owner() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            Some(&token),
            Some(json!({ "title": "T", "url": "u", "likes": 11 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 11);
    assert_eq!(body["user"]["username"], "root");
    assert_eq!(app.blog_count().await, 1);

    let (_, users) = app.send(Method::GET, "/api/v1/users", None, None).await;
    assert_eq!(users[0]["blogs"][0]["id"], body["id"]);
}

#[tokio::test]
async fn likes_default_to_zero() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            Some(&token),
            Some(json!({ "title": "T" })),
        )
        .await;
    assert_eq!(body["likes"], 0);
}

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            None,
            Some(json!({ "title": "T", "url": "u" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn create_with_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            Some("not-a-jwt"),
            Some(json!({ "title": "T" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_without_title_and_url_is_bad_request() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            Some(&token),
            Some(json!({ "author": "A", "likes": 3 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn only_the_owner_can_delete() {
    let app = TestApp::new();
    let owner = app.register_and_login("owner").await;
    let other = app.register_and_login("other").await;
    let id = app.create_blog(&owner, "mine").await;
    let uri = format!("/api/v1/blogs/{id}");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.blog_count().await, 1);

    let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.blog_count().await, 0);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/api/v1/blogs/!!bad!!", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "malformatted id");
}

#[tokio::test]
async fn unknown_valid_id_is_empty_not_found() {
    let app = TestApp::new();
    let missing = app.state.id_codec.encode(9_999).unwrap();

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/blogs/{missing}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn get_returns_what_was_created() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;
    let id = app.create_blog(&token, "round trip").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/blogs/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["title"], "round trip");
    assert_eq!(body["user"]["username"], "root");
}

#[tokio::test]
async fn update_and_comment_do_not_need_a_token() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;
    let id = app.create_blog(&token, "before").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/blogs/{id}"),
            None,
            Some(json!({ "likes": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 42);
    assert_eq!(body["title"], "before");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/blogs/{id}/comments"),
            None,
            Some(json!({ "comment": "great read" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"][0]["comment"], "great read");

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/blogs/{id}/comments"),
            None,
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_username_is_bad_request() {
    let app = TestApp::new();
    app.register_and_login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/users",
            None,
            Some(json!({ "username": "root", "password": "another" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unique")
    );
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.register_and_login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({ "username": "root", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn wrongly_typed_field_is_validation_error() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/blogs",
            Some(&token),
            Some(json!({ "title": "T", "likes": "many" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("likes"));
    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn non_json_body_is_validation_error() {
    let app = TestApp::new();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/login")
        .body(Body::from("username=root&password=salainen"))
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_checks_the_token_before_the_id() {
    let app = TestApp::new();
    let token = app.register_and_login("root").await;

    let (status, _) = app
        .send(Method::DELETE, "/api/v1/blogs/!!bad!!", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::DELETE, "/api/v1/blogs/!!bad!!", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "malformatted id");
}

#[tokio::test]
async fn update_and_comment_on_unknown_id_are_empty_not_found() {
    let app = TestApp::new();
    let missing = app.state.id_codec.encode(9_999).unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/blogs/{missing}"),
            None,
            Some(json!({ "likes": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/blogs/{missing}/comments"),
            None,
            Some(json!({ "comment": "hello?" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn update_and_comment_on_malformed_id_are_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/blogs/!!bad!!",
            None,
            Some(json!({ "likes": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "malformatted id");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/blogs/!!bad!!/comments",
            None,
            Some(json!({ "comment": "hello?" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "malformatted id");
}
