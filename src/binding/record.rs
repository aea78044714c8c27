//! The live parent record and the containers it owns.

use super::declaration::RelatedModel;
use crate::store::{Computed, Extension, Observable, ObservableArray, StoreError};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One element of a relationship container.
#[derive(Debug, Clone)]
pub enum Related {
    /// A merged record, or the empty object of an unset relationship.
    Record(Value),
    /// A record wrapped by the relationship's model factory.
    Model(Arc<dyn RelatedModel>),
}

impl Related {
    pub fn as_record(&self) -> Option<&Value> {
        match self {
            Related::Record(value) => Some(value),
            Related::Model(_) => None,
        }
    }

    pub fn as_model(&self) -> Option<&Arc<dyn RelatedModel>> {
        match self {
            Related::Record(_) => None,
            Related::Model(model) => Some(model),
        }
    }

    /// The wrapped model as its concrete type.
    pub fn downcast<M: RelatedModel>(&self) -> Option<&M> {
        self.as_model()?.as_any().downcast_ref::<M>()
    }

    pub fn marked_for_deletion(&self) -> bool {
        match self {
            Related::Record(value) => flag(value, "marked_for_deletion").unwrap_or(false),
            Related::Model(model) => model.marked_for_deletion(),
        }
    }

    pub fn loading(&self) -> Option<bool> {
        match self {
            Related::Record(value) => flag(value, "loading"),
            Related::Model(model) => model.loading(),
        }
    }

    /// Neither soft-deleted nor still loading.
    pub fn is_live(&self) -> bool {
        !self.loading().unwrap_or(false) && !self.marked_for_deletion()
    }
}

fn flag(value: &Value, name: &str) -> Option<bool> {
    value.get(name).and_then(Value::as_bool)
}

/// A relationship container: scalar for to-one, sequence for to-many.
#[derive(Debug, Clone)]
pub enum Field {
    Scalar(Observable<Option<Related>>),
    Sequence(ObservableArray<Related>),
}

impl Field {
    /// A sequence for array-shaped data, a scalar otherwise.
    pub fn for_data(data: &Value) -> Self {
        if data.is_array() {
            Field::Sequence(ObservableArray::new(Vec::new()))
        } else {
            Field::Scalar(Observable::new(None))
        }
    }

    pub fn get(&self) -> FieldValue {
        match self {
            Field::Scalar(scalar) => FieldValue::One(scalar.get()),
            Field::Sequence(sequence) => FieldValue::Many(sequence.get()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Observable<Option<Related>>> {
        match self {
            Field::Scalar(scalar) => Some(scalar),
            Field::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&ObservableArray<Related>> {
        match self {
            Field::Scalar(_) => None,
            Field::Sequence(sequence) => Some(sequence),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Field::Scalar(_) => "scalar",
            Field::Sequence(_) => "sequence",
        }
    }

    /// Attaches a behaviour to whichever container this is.
    ///
    /// Postable extensions are rejected here; they belong on attribute
    /// observables, see [`Record::create_observable`].
    pub fn extend(&self, extension: Extension<Related>) -> Result<(), StoreError> {
        match self {
            Field::Scalar(scalar) => match extension {
                Extension::Nestable {
                    relationship,
                    initial_length,
                    watch_for_pending_changes,
                } => scalar.extend(Extension::Nestable {
                    relationship,
                    initial_length,
                    watch_for_pending_changes,
                }),
                other => Err(StoreError::Unsupported {
                    extension: other.kind(),
                    container: "scalar",
                }),
            },
            Field::Sequence(sequence) => sequence.extend(extension),
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        match self {
            Field::Scalar(scalar) => scalar.has_pending_changes(),
            Field::Sequence(sequence) => sequence.has_pending_changes(),
        }
    }

    pub fn mark_clean(&self) {
        match self {
            Field::Scalar(scalar) => scalar.mark_clean(),
            Field::Sequence(sequence) => sequence.mark_clean(),
        }
    }
}

/// Snapshot of a relationship container.
#[derive(Debug, Clone)]
pub enum FieldValue {
    One(Option<Related>),
    Many(Vec<Related>),
}

impl FieldValue {
    pub fn as_one(&self) -> Option<&Related> {
        match self {
            FieldValue::One(related) => related.as_ref(),
            FieldValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Related]> {
        match self {
            FieldValue::One(_) => None,
            FieldValue::Many(items) => Some(items),
        }
    }
}

/// A live view-model record.
///
/// Holds the plain attributes it was built from, postable attribute
/// observables, one container per relationship, and the derived
/// `non_deleted_<name>` views. Records are shared as `Arc<Record>`; client
/// models receive the parent through their factory.
#[derive(Default)]
pub struct Record {
    attributes: RwLock<Map<String, Value>>,
    observables: RwLock<BTreeMap<String, Observable<Value>>>,
    relationships: RwLock<BTreeMap<String, Field>>,
    views: RwLock<BTreeMap<String, Computed<Related>>>,
}

impl Record {
    pub fn new(attributes: Map<String, Value>) -> Arc<Self> {
        Arc::new(Self {
            attributes: RwLock::new(attributes),
            ..Self::default()
        })
    }

    /// Builds a record from a merged record. Non-objects give an empty record.
    pub fn from_value(value: Value) -> Arc<Self> {
        match value {
            Value::Object(attributes) => Self::new(attributes),
            _ => Self::new(Map::new()),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    pub fn attributes(&self) -> Map<String, Value> {
        self.attributes.read().clone()
    }

    pub fn id(&self) -> Option<i64> {
        self.attributes.read().get("id").and_then(Value::as_i64)
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: Value) {
        self.attributes.write().insert(name.into(), value);
    }

    /// Creates a postable observable for an attribute, or returns the
    /// existing one.
    pub fn create_observable(&self, name: &str, value: Value) -> Observable<Value> {
        self.observables
            .write()
            .entry(name.to_owned())
            .or_insert_with(|| Observable::postable(name, value))
            .clone()
    }

    pub fn observable(&self, name: &str) -> Option<Observable<Value>> {
        self.observables.read().get(name).cloned()
    }

    /// Postable attributes whose value moved away from the initial one.
    pub fn modified_attributes(&self) -> Map<String, Value> {
        self.observables
            .read()
            .iter()
            .filter(|(_, observable)| observable.is_modified())
            .map(|(name, observable)| (name.clone(), observable.get()))
            .collect()
    }

    pub fn relationship(&self, name: &str) -> Option<Field> {
        self.relationships.read().get(name).cloned()
    }

    pub fn relationship_names(&self) -> Vec<String> {
        self.relationships.read().keys().cloned().collect()
    }

    /// The `non_deleted_<name>` view of a soft-deletable relationship.
    pub fn non_deleted(&self, relationship: &str) -> Option<Computed<Related>> {
        self.views.read().get(&non_deleted_key(relationship)).cloned()
    }

    pub(crate) fn field_or_insert_with(&self, name: &str, create: impl FnOnce() -> Field) -> Field {
        self.relationships
            .write()
            .entry(name.to_owned())
            .or_insert_with(create)
            .clone()
    }

    pub(crate) fn set_non_deleted(&self, relationship: &str, view: Computed<Related>) {
        self.views.write().insert(non_deleted_key(relationship), view);
    }
}

fn non_deleted_key(relationship: &str) -> String {
    format!("non_deleted_{relationship}")
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("attributes", &*self.attributes.read())
            .field("relationships", &self.relationship_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn related_records_read_soft_delete_flags() {
        let deleted = Related::Record(json!({"marked_for_deletion": true}));
        let kept = Related::Record(json!({"marked_for_deletion": false}));
        let loading = Related::Record(json!({"loading": true}));
        assert!(!deleted.is_live());
        assert!(kept.is_live());
        assert!(!loading.is_live());
        assert!(Related::Record(json!({})).is_live());
    }

    #[test]
    fn postable_observables_report_modified_attributes() {
        let record = Record::from_value(json!({"id": 1, "title": "Hi"}));
        let title = record.create_observable("title", json!("Hi"));
        record.create_observable("body", json!("text"));
        assert!(record.modified_attributes().is_empty());

        title.set(json!("Hello"));
        let modified = record.modified_attributes();
        assert_eq!(modified.len(), 1);
        assert_eq!(modified["title"], "Hello");

        assert!(title.has_extension(crate::store::ExtensionKind::Postable));
        let again = record.create_observable("title", json!("ignored"));
        assert!(again.ptr_eq(&title));
        assert_eq!(record.id(), Some(1));
    }

    #[test]
    fn scalar_fields_reject_sequence_behaviour() {
        let field = Field::for_data(&json!({"id": 1, "type": "user"}));
        assert_eq!(field.kind(), "scalar");
        let err = field
            .extend(Extension::Pushable(crate::store::Pushable::new(|| {
                Ok(Related::Record(json!({})))
            })))
            .unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { container: "scalar", .. }));
        assert_eq!(Field::for_data(&json!([])).kind(), "sequence");
    }
}
