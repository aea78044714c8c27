//! Runtime wiring.
//!
//! - [`ResourceLoader`] fetches a JSON:API document through a
//!   [`Transport`](crate::transport::Transport) and hydrates live records
//!   with their relationships bound.
//! - [`setup_tracing`] installs the log subscriber.

pub mod error;
pub mod loader;
pub mod tracing;

pub use self::error::LoadError;
pub use self::loader::ResourceLoader;
pub use self::tracing::setup_tracing;
