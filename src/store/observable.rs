use super::error::StoreError;
use super::extension::{attach, Extension, ExtensionKind};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared value cell behind both container kinds.
struct Cell<T> {
    sender: watch::Sender<T>,
    dirty: AtomicBool,
}

impl<T> Cell<T> {
    fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender,
            dirty: AtomicBool::new(false),
        }
    }

    fn replace(&self, value: T) {
        self.sender.send_replace(value);
        self.dirty.store(true, Ordering::Release);
    }

    fn modify(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
        self.dirty.store(true, Ordering::Release);
    }
}

fn watches_pending_changes<T>(extensions: &[Extension<T>]) -> bool {
    extensions.iter().any(|extension| {
        matches!(
            extension,
            Extension::Nestable {
                watch_for_pending_changes: true,
                ..
            }
        )
    })
}

// =============================================================================
// Scalar
// =============================================================================

/// A reactive scalar value.
pub struct Observable<T> {
    cell: Arc<Cell<T>>,
    extensions: Arc<RwLock<Vec<Extension<T>>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            extensions: Arc::clone(&self.extensions),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&*self.cell.sender.borrow()).finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            cell: Arc::new(Cell::new(initial)),
            extensions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A scalar backing a form attribute, born with its postable extension.
    pub fn postable(attribute: impl Into<String>, initial: T) -> Self {
        let postable = Extension::Postable {
            attribute: attribute.into(),
            initial_value: initial.clone(),
        };
        Self {
            cell: Arc::new(Cell::new(initial)),
            extensions: Arc::new(RwLock::new(vec![postable])),
        }
    }

    pub fn get(&self) -> T {
        self.cell.sender.borrow().clone()
    }

    /// Reads the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.sender.borrow())
    }

    pub fn set(&self, value: T) {
        self.cell.replace(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.cell.modify(f);
    }

    /// A receiver woken on every subsequent `set`/`update`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.cell.sender.subscribe()
    }

    /// Attaches a behaviour. Sequence-only behaviours are rejected.
    pub fn extend(&self, extension: Extension<T>) -> Result<(), StoreError> {
        if let Extension::Pushable(_) = extension {
            return Err(StoreError::Unsupported {
                extension: ExtensionKind::Pushable,
                container: "scalar",
            });
        }
        attach(&mut self.extensions.write(), extension);
        Ok(())
    }

    pub fn extensions(&self) -> Vec<ExtensionKind> {
        self.extensions.read().iter().map(Extension::kind).collect()
    }

    pub fn has_extension(&self, kind: ExtensionKind) -> bool {
        self.extensions.read().iter().any(|e| e.kind() == kind)
    }

    /// The value recorded by a postable extension.
    pub fn initial_value(&self) -> Option<T> {
        self.extensions.read().iter().find_map(|extension| match extension {
            Extension::Postable { initial_value, .. } => Some(initial_value.clone()),
            _ => None,
        })
    }

    /// True when a watching nestable extension is attached and the value was
    /// reassigned since the last [`mark_clean`](Self::mark_clean).
    pub fn has_pending_changes(&self) -> bool {
        watches_pending_changes(&self.extensions.read()) && self.cell.dirty.load(Ordering::Acquire)
    }

    pub fn mark_clean(&self) {
        self.cell.dirty.store(false, Ordering::Release);
    }

    /// True when both handles point at the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    /// True when a postable extension is attached and the value differs from
    /// its initial value.
    pub fn is_modified(&self) -> bool {
        self.initial_value()
            .is_some_and(|initial| self.with(|current| *current != initial))
    }
}

// =============================================================================
// Sequence
// =============================================================================

/// A reactive ordered sequence.
pub struct ObservableArray<T> {
    cell: Arc<Cell<Vec<T>>>,
    extensions: Arc<RwLock<Vec<Extension<T>>>>,
    baseline: Arc<AtomicUsize>,
}

impl<T> Clone for ObservableArray<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            extensions: Arc::clone(&self.extensions),
            baseline: Arc::clone(&self.baseline),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableArray").field(&*self.cell.sender.borrow()).finish()
    }
}

impl<T: Clone + Send + Sync + 'static> ObservableArray<T> {
    pub fn new(initial: Vec<T>) -> Self {
        let baseline = Arc::new(AtomicUsize::new(initial.len()));
        Self {
            cell: Arc::new(Cell::new(initial)),
            extensions: Arc::new(RwLock::new(Vec::new())),
            baseline,
        }
    }

    pub fn get(&self) -> Vec<T> {
        self.cell.sender.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.cell.sender.borrow())
    }

    pub fn len(&self) -> usize {
        self.cell.sender.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set(&self, items: Vec<T>) {
        self.cell.replace(items);
    }

    pub fn update(&self, f: impl FnOnce(&mut Vec<T>)) {
        self.cell.modify(f);
    }

    pub fn push(&self, item: T) {
        self.cell.modify(|items| items.push(item));
    }

    pub fn remove(&self, index: usize) -> Option<T> {
        let mut removed = None;
        self.cell.modify(|items| {
            if index < items.len() {
                removed = Some(items.remove(index));
            }
        });
        removed
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.cell.sender.subscribe()
    }

    /// Attaches a behaviour. Postable is scalar-only.
    ///
    /// A nestable extension with an `initial_length` resets the pending-change
    /// baseline to that length.
    pub fn extend(&self, extension: Extension<T>) -> Result<(), StoreError> {
        match &extension {
            Extension::Postable { .. } => {
                return Err(StoreError::Unsupported {
                    extension: ExtensionKind::Postable,
                    container: "sequence",
                });
            }
            Extension::Nestable {
                initial_length: Some(length),
                ..
            } => {
                self.baseline.store(*length, Ordering::Release);
                self.cell.dirty.store(false, Ordering::Release);
            }
            _ => {}
        }
        attach(&mut self.extensions.write(), extension);
        Ok(())
    }

    pub fn extensions(&self) -> Vec<ExtensionKind> {
        self.extensions.read().iter().map(Extension::kind).collect()
    }

    pub fn has_extension(&self, kind: ExtensionKind) -> bool {
        self.extensions.read().iter().any(|e| e.kind() == kind)
    }

    /// Builds an element through the pushable extension and appends it.
    pub fn push_new(&self) -> Result<T, StoreError> {
        let pushable = self
            .extensions
            .read()
            .iter()
            .find_map(|extension| match extension {
                Extension::Pushable(pushable) => Some(pushable.clone()),
                _ => None,
            })
            .ok_or(StoreError::NotPushable)?;
        let item = pushable.build()?;
        self.push(item.clone());
        Ok(item)
    }

    /// True when a watching nestable extension is attached and the sequence
    /// was mutated, or changed length, since the baseline was taken.
    pub fn has_pending_changes(&self) -> bool {
        if !watches_pending_changes(&self.extensions.read()) {
            return false;
        }
        self.cell.dirty.load(Ordering::Acquire) || self.len() != self.baseline.load(Ordering::Acquire)
    }

    /// Takes the current contents as the new baseline.
    pub fn mark_clean(&self) {
        self.baseline.store(self.len(), Ordering::Release);
        self.cell.dirty.store(false, Ordering::Release);
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}
