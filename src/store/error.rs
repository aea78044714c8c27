//! Errors raised by reactive containers.

use super::extension::ExtensionKind;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The extension does not apply to this kind of container.
    #[error("{extension:?} extension is not supported on {container} containers")]
    Unsupported {
        extension: ExtensionKind,
        container: &'static str,
    },

    /// `push_new` was called on a sequence without a pushable extension.
    #[error("sequence has no pushable extension")]
    NotPushable,

    /// The pushable constructor failed.
    #[error("failed to construct pushed element: {0}")]
    Construct(String),
}
