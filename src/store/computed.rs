use super::observable::ObservableArray;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// A filtered view over an [`ObservableArray`].
///
/// The view holds a handle to the source container, so it always reflects
/// the current contents; nothing is cached.
pub struct Computed<T> {
    source: ObservableArray<T>,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed").finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Computed<T> {
    pub fn filter(source: ObservableArray<T>, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            source,
            predicate: Arc::new(predicate),
        }
    }

    pub fn get(&self) -> Vec<T> {
        self.source
            .with(|items| items.iter().filter(|item| (self.predicate)(item)).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.source
            .with(|items| items.iter().filter(|item| (self.predicate)(item)).count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receiver woken whenever the source changes; call [`get`](Self::get)
    /// afterwards for the recomputed view.
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.source.subscribe()
    }

    pub fn source(&self) -> &ObservableArray<T> {
        &self.source
    }
}
