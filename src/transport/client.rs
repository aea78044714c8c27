//! `reqwest`-backed [`Transport`].

use super::config::TransportConfig;
use super::credentials::CredentialsProvider;
use super::error::{ClientError, RequestError};
use super::request::{Method, Request};
use super::transport_trait::Transport;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const JSON: &str = "application/json";
const CSRF_HEADER: &str = "X-CSRF-Token";

/// Resolves a finished response into the transport's result.
///
/// A 2xx or 3xx status yields the parsed body, or `None` for an empty or
/// non-JSON body. Any other status yields a [`RequestError`].
pub fn classify_response(status: u16, status_text: Option<&str>, body: &str) -> Result<Option<Value>, RequestError> {
    if (200..400).contains(&status) {
        Ok(serde_json::from_str(body).ok())
    } else {
        Err(RequestError::from_response(status, status_text, body))
    }
}

pub struct HttpJsonClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialsProvider>,
}

impl HttpJsonClient {
    pub fn new(config: &TransportConfig, credentials: impl CredentialsProvider + 'static) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)?;
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
            credentials: Arc::new(credentials),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The absolute URL a request is sent to, with the data encoded into the
    /// query for GET and DELETE.
    pub fn request_url(&self, method: Method, request: &Request) -> Result<Url, RequestError> {
        let mut url = self
            .base_url
            .join(&request.url)
            .map_err(|e| RequestError::invalid_url(&request.url, e))?;
        if !method.sends_body() {
            if let Some(query) = request.query_string() {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                    _ => query,
                };
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }
}

impl fmt::Debug for HttpJsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpJsonClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpJsonClient {
    async fn send(&self, method: Method, request: Request) -> Result<Option<Value>, RequestError> {
        let url = self.request_url(method, &request)?;
        debug!(%method, %url, "sending request");

        let mut builder = self.http.request(method.into(), url);
        if method.sends_json_headers() {
            builder = builder.header(CONTENT_TYPE, JSON).header(ACCEPT, JSON);
        }
        if let Some(token) = self.credentials.csrf_token().filter(|token| !token.is_empty()) {
            builder = builder.header(CSRF_HEADER, token);
        }
        if method.sends_body() {
            if let Some(data) = &request.data {
                builder = builder.json(data);
            }
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%method, error = %e, "request was not answered");
            RequestError::network()
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(%method, error = %e, "response body could not be read");
            RequestError::network()
        })?;

        let result = classify_response(status.as_u16(), status.canonical_reason(), &body);
        if let Err(e) = &result {
            warn!(%method, status = e.status, message = %e.message, "request failed");
        }
        result
    }
}
