use super::error::StoreError;
use std::fmt;
use std::sync::Arc;

/// Behaviour attached to a container.
///
/// `T` is the element type: the value type of an [`Observable`](super::Observable),
/// or the item type of an [`ObservableArray`](super::ObservableArray).
#[derive(Debug, Clone)]
pub enum Extension<T> {
    /// The container backs a form attribute sent back to the server.
    /// Scalars only.
    Postable { attribute: String, initial_value: T },

    /// The container is edited as nested attributes of its parent.
    /// `initial_length` seeds the pending-change baseline of a sequence.
    Nestable {
        relationship: String,
        initial_length: Option<usize>,
        watch_for_pending_changes: bool,
    },

    /// New elements pushed by the client are built by this constructor.
    /// Sequences only.
    Pushable(Pushable<T>),
}

impl<T> Extension<T> {
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Extension::Postable { .. } => ExtensionKind::Postable,
            Extension::Nestable { .. } => ExtensionKind::Nestable,
            Extension::Pushable(_) => ExtensionKind::Pushable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    Postable,
    Nestable,
    Pushable,
}

/// Element constructor used by [`ObservableArray::push_new`](super::ObservableArray::push_new).
pub struct Pushable<T> {
    construct: Arc<dyn Fn() -> Result<T, StoreError> + Send + Sync>,
}

impl<T> Pushable<T> {
    pub fn new(construct: impl Fn() -> Result<T, StoreError> + Send + Sync + 'static) -> Self {
        Self {
            construct: Arc::new(construct),
        }
    }

    pub fn build(&self) -> Result<T, StoreError> {
        (self.construct)()
    }
}

impl<T> Clone for Pushable<T> {
    fn clone(&self) -> Self {
        Self {
            construct: Arc::clone(&self.construct),
        }
    }
}

impl<T> fmt::Debug for Pushable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pushable").finish_non_exhaustive()
    }
}

/// Replaces an extension of the same kind, or appends it.
pub(crate) fn attach<T>(extensions: &mut Vec<Extension<T>>, extension: Extension<T>) {
    match extensions.iter().position(|e| e.kind() == extension.kind()) {
        Some(index) => extensions[index] = extension,
        None => extensions.push(extension),
    }
}
