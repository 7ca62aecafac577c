//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use locker_core::config::AppConfig;
use locker_server::{AppState, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// A router wired to a fresh in-memory store.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
}

/// Status, headers and raw body of a response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with `AppConfig::for_testing()`.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test server with custom config modifications.
    pub fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = AppConfig::for_testing();
        modifier(&mut config);

        let store =
            locker_metadata::from_config(&config.files).expect("Failed to create metadata store");
        let state = AppState::new(config, store);
        let router = create_router(state.clone());

        Self { router, state }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request with an optional JSON body and session token.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header("X-Session", token);
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Upload raw bytes as a file.
    pub async fn put_file(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
        session: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(format!("/files/{filename}"));
        if let Some(token) = session {
            builder = builder.header("X-Session", token);
        }
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        self.send(builder.body(Body::from(data.to_vec())).unwrap())
            .await
    }

    /// Register a user and log in, returning the session token.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let credentials = json!({ "username": username, "password": password });
        let response = self
            .request("POST", "/register", Some(credentials.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        let response = self.request("POST", "/login", Some(credentials), None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }
}
