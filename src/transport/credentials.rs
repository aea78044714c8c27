//! Source of the anti-forgery token attached to every request.

/// Supplies the `X-CSRF-Token` header value. `None` omits the header.
pub trait CredentialsProvider: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

impl<F> CredentialsProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn csrf_token(&self) -> Option<String> {
        self()
    }
}

/// Sends no token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialsProvider for NoCredentials {
    fn csrf_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, typically read once from the hosting page or environment.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialsProvider for StaticToken {
    fn csrf_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
