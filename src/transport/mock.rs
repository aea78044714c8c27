//! # Mock Transport
//!
//! Expectation-driven [`Transport`] for testing loaders and models without a
//! server.
//!
//! ```ignore
//! let mock = MockTransport::new();
//! mock.expect_get("/posts/1").return_ok(json!({"data": {...}}));
//! mock.expect_delete("/posts/1").return_err(RequestError::network());
//!
//! // use `mock` (or a clone) as the transport...
//! mock.verify(); // every expectation was consumed
//! ```

use super::error::RequestError;
use super::request::{Method, Request};
use super::transport_trait::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

struct Expectation {
    method: Method,
    url: String,
    response: Result<Option<Value>, RequestError>,
}

/// A transport that answers from a queue of expectations, in order.
///
/// Clones share the queue. A request that does not match the next
/// expectation panics.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    received: Arc<Mutex<Vec<(Method, Request)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, url)
    }

    pub fn expect_post(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, url)
    }

    pub fn expect_patch(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Patch, url)
    }

    pub fn expect_delete(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, url)
    }

    fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<(Method, Request)> {
        self.received.lock().clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Completes an expectation with its response.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    pub fn return_ok(self, body: Value) {
        self.push(Ok(Some(body)));
    }

    /// Succeeds with an empty body.
    pub fn return_empty(self) {
        self.push(Ok(None));
    }

    pub fn return_err(self, error: RequestError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Option<Value>, RequestError>) {
        self.expectations.lock().push_back(Expectation {
            method: self.method,
            url: self.url,
            response,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, request: Request) -> Result<Option<Value>, RequestError> {
        let expectation = self.expectations.lock().pop_front();
        self.received.lock().push((method, request.clone()));

        match expectation {
            Some(expected) if expected.method == method && expected.url == request.url => expected.response,
            Some(expected) => panic!(
                "Unexpected request {method} {}; expected {} {}",
                request.url, expected.method, expected.url
            ),
            None => panic!("Unexpected request {method} {}; no expectations left", request.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn answers_expectations_in_order() {
        let mock = MockTransport::new();
        mock.expect_get("/posts").return_ok(json!({"data": []}));
        mock.expect_delete("/posts/1").return_empty();

        assert_eq!(mock.get("/posts".into()).await.unwrap(), Some(json!({"data": []})));
        assert_eq!(mock.delete("/posts/1".into()).await.unwrap(), None);
        mock.verify();
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn fan_out_keeps_order_and_fails_fast() {
        let mock = MockTransport::new();
        mock.expect_patch("/a").return_ok(json!(1));
        mock.expect_patch("/b").return_ok(json!(2));
        let results = mock.patch_all(vec!["/a".into(), "/b".into()]).await.unwrap();
        assert_eq!(results, vec![Some(json!(1)), Some(json!(2))]);

        mock.expect_delete("/a").return_ok(json!(1));
        mock.expect_delete("/b").return_err(RequestError::from_response(403, Some("Forbidden"), ""));
        let err = mock.delete_all(vec!["/a".into(), "/b".into()]).await.unwrap_err();
        assert_eq!(err.status, 403);
        assert_eq!(err.message, "Forbidden");
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn verify_panics_on_leftovers() {
        let mock = MockTransport::new();
        mock.expect_get("/never").return_empty();
        mock.verify();
    }
}
