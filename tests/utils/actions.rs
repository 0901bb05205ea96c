use axum::{
    body::Body,
    http::{Method, Request},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::{assertions::TestResponse, setup::TestSetup};

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the full router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::from_response(response).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": username, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a user and returns (token, user id)
    pub async fn register_user(&self, username: &str) -> (String, String) {
        let response = self
            .register(username, &format!("{}@example.com", username), "password123")
            .await;
        let token = response.body["token"].as_str().unwrap().to_string();
        let user_id = response.body["user"]["id"].as_str().unwrap().to_string();
        (token, user_id)
    }

    pub async fn create_cafe(&self, token: Option<&str>, cafe: Value) -> TestResponse {
        self.send(Method::POST, "/api/cafes", token, Some(cafe)).await
    }

    pub async fn list_cafes(&self) -> TestResponse {
        self.send(Method::GET, "/api/cafes", None, None).await
    }

    pub async fn get_cafe(&self, cafe_id: &str) -> TestResponse {
        self.send(Method::GET, &format!("/api/cafes/{}", cafe_id), None, None)
            .await
    }

    pub async fn update_cafe(&self, token: Option<&str>, cafe_id: &str, patch: Value) -> TestResponse {
        self.send(
            Method::PUT,
            &format!("/api/cafes/{}", cafe_id),
            token,
            Some(patch),
        )
        .await
    }

    pub async fn delete_cafe(&self, token: Option<&str>, cafe_id: &str) -> TestResponse {
        self.send(Method::DELETE, &format!("/api/cafes/{}", cafe_id), token, None)
            .await
    }

    /// Creates a cafe and returns its id
    pub async fn seed_cafe(&self, token: &str, cafe: Value) -> String {
        let response = self.create_cafe(Some(token), cafe).await;
        response.body["id"].as_str().unwrap().to_string()
    }
}

/// A complete cafe as a client would send it
pub fn full_cafe(name: &str) -> Value {
    json!({
        "name": name,
        "address": "123 Test St",
        "phone": "1234567890",
        "menu": ["Coffee", "Tea"],
        "openingHours": {
            "monday": { "open": "09:00", "close": "18:00" },
            "tuesday": { "open": "09:00", "close": "18:00" },
            "wednesday": { "open": "09:00", "close": "18:00" },
            "thursday": { "open": "09:00", "close": "18:00" },
            "friday": { "open": "09:00", "close": "18:00" },
            "saturday": { "open": "10:00", "close": "16:00" },
            "sunday": { "open": "10:00", "close": "16:00" }
        },
        "longitude": -73.9857,
        "latitude": 40.7484
    })
}
