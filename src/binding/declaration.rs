//! Client-side declarations of how relationships map onto live records.

use super::error::ModelError;
use super::record::Record;
use futures::future::BoxFuture;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A client model wrapping one related record.
///
/// Every method except [`as_any`](Self::as_any) is optional. The defaults
/// describe a model that is never deleted, never loading, and ready as soon
/// as it is constructed.
pub trait RelatedModel: fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Soft-deletion flag read by the `non_deleted_<name>` view.
    fn marked_for_deletion(&self) -> bool {
        false
    }

    /// `None` when the model does not track loading at all.
    fn loading(&self) -> Option<bool> {
        None
    }

    /// `None` when the model has no "done loading" signal. Otherwise the
    /// binder awaits the returned future before the bind completes.
    fn done_loading(&self) -> Option<BoxFuture<'_, Result<(), ModelError>>> {
        None
    }
}

/// Builds a client model from a parent record and related data.
pub trait ModelFactory: Send + Sync {
    fn construct(&self, parent: &Arc<Record>, data: Value) -> Result<Arc<dyn RelatedModel>, ModelError>;
}

impl<F> ModelFactory for F
where
    F: Fn(&Arc<Record>, Value) -> Result<Arc<dyn RelatedModel>, ModelError> + Send + Sync,
{
    fn construct(&self, parent: &Arc<Record>, data: Value) -> Result<Arc<dyn RelatedModel>, ModelError> {
        self(parent, data)
    }
}

/// Template for a model built when a relationship has no data, or when the
/// client pushes a new element.
#[derive(Clone)]
pub enum BlankValue {
    Literal(Value),
    /// Invoked with the parent record each time a blank is needed.
    Factory(Arc<dyn Fn(&Record) -> Value + Send + Sync>),
}

impl BlankValue {
    pub fn factory(f: impl Fn(&Record) -> Value + Send + Sync + 'static) -> Self {
        BlankValue::Factory(Arc::new(f))
    }

    pub fn resolve(&self, parent: &Record) -> Value {
        match self {
            BlankValue::Literal(value) => value.clone(),
            BlankValue::Factory(f) => f(parent),
        }
    }
}

impl From<Value> for BlankValue {
    fn from(value: Value) -> Self {
        BlankValue::Literal(value)
    }
}

impl fmt::Debug for BlankValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlankValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            BlankValue::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// How one named relationship is projected onto a live record.
#[derive(Clone, Default)]
pub struct ClientRelationship {
    pub name: String,
    /// Wraps every related record in a client model.
    pub model: Option<Arc<dyn ModelFactory>>,
    /// Adds a `non_deleted_<name>` view that hides soft-deleted elements.
    pub allow_destroy: bool,
    /// Tracks the container as nested form attributes.
    pub nested_attributes_accepted: bool,
    pub blank_value: Option<BlankValue>,
}

impl ClientRelationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, factory: impl ModelFactory + 'static) -> Self {
        self.model = Some(Arc::new(factory));
        self
    }

    pub fn allow_destroy(mut self) -> Self {
        self.allow_destroy = true;
        self
    }

    pub fn nested_attributes(mut self) -> Self {
        self.nested_attributes_accepted = true;
        self
    }

    pub fn with_blank_value(mut self, blank: impl Into<BlankValue>) -> Self {
        self.blank_value = Some(blank.into());
        self
    }
}

impl fmt::Debug for ClientRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRelationship")
            .field("name", &self.name)
            .field("model", &self.model.is_some())
            .field("allow_destroy", &self.allow_destroy)
            .field("nested_attributes_accepted", &self.nested_attributes_accepted)
            .field("blank_value", &self.blank_value)
            .finish()
    }
}
