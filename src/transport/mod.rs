//! # Transport
//!
//! JSON-over-HTTP client used to fetch JSON:API documents.
//!
//! - [`Transport`]: the verb-level interface (`get`/`post`/`patch`/`delete`
//!   plus fan-out variants). Only [`Transport::send`] must be implemented.
//! - [`HttpJsonClient`]: the `reqwest` implementation.
//! - [`CredentialsProvider`]: injected source of the CSRF token.
//! - [`RequestError`]: the structured failure every verb rejects with.
//! - [`mock::MockTransport`]: expectation-driven stand-in for tests.
//!
//! A successful status with an empty or unparseable body resolves to `None`
//! rather than failing.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mock;
pub mod request;
pub mod transport_trait;

pub use client::{classify_response, HttpJsonClient};
pub use config::TransportConfig;
pub use credentials::{CredentialsProvider, NoCredentials, StaticToken};
pub use error::{ClientError, RequestError, GENERIC_ERROR_MESSAGE};
pub use request::{Method, Request};
pub use transport_trait::Transport;
