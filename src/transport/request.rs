use serde_json::Value;
use std::fmt;
use url::form_urlencoded;

/// HTTP verbs used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// POST and PATCH send data as a JSON body; GET and DELETE encode it into
    /// the query string.
    pub fn sends_body(self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }

    /// Whether JSON `Content-Type` and `Accept` headers are set.
    pub fn sends_json_headers(self) -> bool {
        !matches!(self, Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A URL plus optional data.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub data: Option<Value>,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Query pairs for GET and DELETE. Only the top-level keys of an object
    /// are encoded; strings are sent as-is and other values as JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(Value::Object(data)) = &self.data else {
            return Vec::new();
        };
        data.iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// The query string for GET and DELETE, `key=value` pairs joined by `&`
    /// with both sides percent-encoded (a space is `%20`). `None` when there
    /// are no pairs.
    pub fn query_string(&self) -> Option<String> {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return None;
        }
        let encoded: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect();
        Some(encoded.join("&"))
    }
}

/// Percent-encodes a query component. Form encoding writes a space as `+`
/// and a literal `+` as `%2B`, so swapping `+` for `%20` is lossless.
fn encode_component(component: &str) -> String {
    form_urlencoded::byte_serialize(component.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl From<&str> for Request {
    fn from(url: &str) -> Self {
        Request::new(url)
    }
}

impl From<String> for Request {
    fn from(url: String) -> Self {
        Request::new(url)
    }
}
