//! Test assertion helpers - fluent API for verifying responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{http::StatusCode, response::Response};
use serde_json::Value;

// ============================================================================
// Assertion Helpers
// ============================================================================

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Self { status, body }
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body was {}",
            self.body
        );
        self
    }

    /// Asserts the `error` field contains `text`
    pub fn assert_error_contains(&self, text: &str) -> &Self {
        let error = self.body["error"].as_str().unwrap_or_default();
        assert!(
            error.contains(text),
            "expected error containing {:?}, got {:?}",
            text,
            error
        );
        self
    }

    /// Asserts the `message` field contains `text`
    pub fn assert_message_contains(&self, text: &str) -> &Self {
        let message = self.body["message"].as_str().unwrap_or_default();
        assert!(
            message.contains(text),
            "expected message containing {:?}, got {:?}",
            text,
            message
        );
        self
    }

    /// Asserts the validation details name `field`
    pub fn assert_detail_present(&self, field: &str) -> &Self {
        assert!(
            self.body["details"].get(field).is_some(),
            "should have error for {}, details were {}",
            field,
            self.body["details"]
        );
        self
    }

    pub fn assert_field(&self, field: &str, expected: Value) -> &Self {
        assert_eq!(self.body[field], expected, "field {} mismatch", field);
        self
    }
}
