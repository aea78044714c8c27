//! Error types for relationship binding.

use crate::store::StoreError;
use thiserror::Error;

/// Errors produced by client models.
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while binding a relationship.
///
/// Any of these rejects the whole orchestration; there is no partial
/// success reporting.
#[derive(Debug, Error)]
pub enum BindError {
    /// The declared model factory refused the record.
    #[error("failed to construct `{relationship}` model: {source}")]
    Construct {
        relationship: String,
        #[source]
        source: ModelError,
    },

    /// A model's "done loading" signal failed.
    #[error("`{relationship}` model failed to finish loading: {source}")]
    Loading {
        relationship: String,
        #[source]
        source: ModelError,
    },

    /// The existing container cannot hold data of this shape.
    #[error("`{relationship}` holds a {expected} container but received {found} data")]
    ShapeMismatch {
        relationship: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
