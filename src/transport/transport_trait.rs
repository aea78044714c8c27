use super::error::RequestError;
use super::request::{Method, Request};
use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;

/// JSON request/response exchange.
///
/// Implementors provide [`send`](Self::send); the verbs and their fan-out
/// variants are derived from it. A successful response resolves to its
/// parsed body, or `None` when the body is empty or not JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, request: Request) -> Result<Option<Value>, RequestError>;

    #[tracing::instrument(skip(self), fields(url = %request.url))]
    async fn get(&self, request: Request) -> Result<Option<Value>, RequestError> {
        self.send(Method::Get, request).await
    }

    #[tracing::instrument(skip(self), fields(url = %request.url))]
    async fn post(&self, request: Request) -> Result<Option<Value>, RequestError> {
        self.send(Method::Post, request).await
    }

    #[tracing::instrument(skip(self), fields(url = %request.url))]
    async fn patch(&self, request: Request) -> Result<Option<Value>, RequestError> {
        self.send(Method::Patch, request).await
    }

    #[tracing::instrument(skip(self), fields(url = %request.url))]
    async fn delete(&self, request: Request) -> Result<Option<Value>, RequestError> {
        self.send(Method::Delete, request).await
    }

    /// Issues every request concurrently. Results keep request order; the
    /// first failure rejects the batch.
    async fn get_all(&self, requests: Vec<Request>) -> Result<Vec<Option<Value>>, RequestError> {
        fan_out(self, Method::Get, requests).await
    }

    async fn post_all(&self, requests: Vec<Request>) -> Result<Vec<Option<Value>>, RequestError> {
        fan_out(self, Method::Post, requests).await
    }

    async fn patch_all(&self, requests: Vec<Request>) -> Result<Vec<Option<Value>>, RequestError> {
        fan_out(self, Method::Patch, requests).await
    }

    async fn delete_all(&self, requests: Vec<Request>) -> Result<Vec<Option<Value>>, RequestError> {
        fan_out(self, Method::Delete, requests).await
    }
}

async fn fan_out<T: Transport + ?Sized>(
    transport: &T,
    method: Method,
    requests: Vec<Request>,
) -> Result<Vec<Option<Value>>, RequestError> {
    tracing::debug!(%method, count = requests.len(), "fanning out requests");
    try_join_all(requests.into_iter().map(|request| transport.send(method, request))).await
}
