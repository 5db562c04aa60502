#![allow(dead_code)]

use auto_marketplace::{
    config::EnvironmentConfig,
    create_app,
    models::user::{User, UserRole},
    repositories::Repositories,
    state::AppState,
    utils::jwt::generate_token,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Full router over in-memory repositories.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct Account {
    pub user: User,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(EnvironmentConfig::for_tests())
    }

    pub fn with_config(config: EnvironmentConfig) -> Self {
        let state = AppState::new(config, Repositories::in_memory());
        Self {
            router: create_app(state.clone()),
            state,
        }
    }

    /// Stores an account directly and mints a token for it.
    pub async fn account(&self, role: UserRole) -> Account {
        let user = User::new(
            format!("Test {}", role),
            format!("{}-{}@example.com", role, Uuid::new_v4()),
            "not-a-real-hash".to_string(),
            Some("+1 555 0100".to_string()),
            role,
        );
        let user = self.state.repos.users.create(user).await.unwrap();
        let token = generate_token(user.id, user.role, &self.state.jwt).unwrap();
        Account { user, token }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_as(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put_as(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete_as(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a listing through the API and returns its id.
    pub async fn create_vehicle(&self, token: &str, overrides: Value) -> String {
        let response = self
            .post_as("/vehicles", Some(token), vehicle_body(overrides))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }
}

/// A valid creation body with `overrides` merged on top.
pub fn vehicle_body(overrides: Value) -> Value {
    let mut body = json!({
        "make": "Toyota",
        "model": "Camry",
        "year": 2021,
        "price": 24000,
        "mileage": 30000,
        "fuelType": "Petrol",
        "transmission": "Automatic",
        "bodyType": "Sedan",
        "engine": "2.5L I4",
        "condition": "Used",
        "features": ["Bluetooth", "Backup Camera"],
        "location": {
            "city": "Austin",
            "state": "TX",
            "country": "USA",
            "zipCode": "73301"
        }
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            body.insert(key.clone(), value.clone());
        }
    }
    body
}

pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
