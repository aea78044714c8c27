//! Binds one relationship's raw data into its container.

use super::declaration::{BlankValue, ClientRelationship, ModelFactory, RelatedModel};
use super::error::BindError;
use super::record::{Field, FieldValue, Record, Related};
use crate::model::empty_object;
use crate::resolve::{materialize, IncludedPool, MaterializeOptions};
use crate::store::{Extension, Pushable, StoreError};
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Resolves `data` and assigns it to `field`, returning the container's value.
///
/// - An array becomes an ordered sequence. Items are materialized only when
///   an included pool is given.
/// - An object is materialized and becomes the scalar value.
/// - Anything else (`null`, absent, malformed) becomes a blank model built
///   from the declaration's blank value, or an empty object.
///
/// The container is assigned before waiting on "done loading" signals, so
/// observers see the models while they load; the returned future settles once
/// every signal has.
#[instrument(skip_all, fields(relationship = %name))]
pub async fn build_relationship(
    record: &Arc<Record>,
    name: &str,
    data: Value,
    field: &Field,
    declaration: Option<&ClientRelationship>,
    included: Option<&Arc<IncludedPool>>,
) -> Result<FieldValue, BindError> {
    let nested = declaration.is_some_and(|d| d.nested_attributes_accepted);
    let factory = declaration.and_then(|d| d.model.as_ref());

    match data {
        Value::Array(items) => {
            let Field::Sequence(sequence) = field else {
                return Err(shape_mismatch(name, field, "array"));
            };
            let records: Vec<Value> = match included {
                Some(pool) => {
                    let options = MaterializeOptions::new().with_included(Arc::clone(pool));
                    items.into_iter().map(|item| materialize(item, &options)).collect()
                }
                None => items,
            };
            if nested {
                field.extend(nestable(name, Some(records.len())))?;
            }

            let models = match factory {
                Some(factory) => {
                    let models = records
                        .into_iter()
                        .map(|data| construct(&**factory, record, name, data))
                        .collect::<Result<Vec<_>, _>>()?;
                    if let Some(blank) = declaration.and_then(|d| d.blank_value.clone()) {
                        field.extend(Extension::Pushable(pushable(record, Arc::clone(factory), blank)))?;
                    }
                    sequence.set(models.iter().cloned().map(Related::Model).collect());
                    models
                }
                None => {
                    sequence.set(records.into_iter().map(Related::Record).collect());
                    Vec::new()
                }
            };
            sequence.mark_clean();
            debug!(len = sequence.len(), wrapped = factory.is_some(), "bound to-many relationship");
            wait_until_loaded(name, &models).await?;
        }
        Value::Object(_) => {
            let Field::Scalar(scalar) = field else {
                return Err(shape_mismatch(name, field, "object"));
            };
            if nested {
                field.extend(nestable(name, None))?;
            }
            let options = MaterializeOptions {
                included: included.cloned(),
                ..MaterializeOptions::default()
            };
            let merged = materialize(data, &options);

            match factory {
                Some(factory) => {
                    let model = construct(&**factory, record, name, merged)?;
                    scalar.set(Some(Related::Model(Arc::clone(&model))));
                    scalar.mark_clean();
                    debug!(wrapped = true, "bound to-one relationship");
                    wait_until_loaded(name, &[model]).await?;
                }
                None => {
                    scalar.set(Some(Related::Record(merged)));
                    scalar.mark_clean();
                    debug!(wrapped = false, "bound to-one relationship");
                }
            }
        }
        _ => {
            if nested {
                field.extend(nestable(name, None))?;
            }
            match (field, factory) {
                (Field::Sequence(sequence), _) => {
                    sequence.set(Vec::new());
                    sequence.mark_clean();
                }
                (Field::Scalar(scalar), Some(factory)) => {
                    let template = declaration
                        .and_then(|d| d.blank_value.as_ref())
                        .map(|blank| blank.resolve(record))
                        .unwrap_or_else(empty_object);
                    let model = construct(&**factory, record, name, template)?;
                    scalar.set(Some(Related::Model(Arc::clone(&model))));
                    scalar.mark_clean();
                    wait_until_loaded(name, &[model]).await?;
                }
                (Field::Scalar(scalar), None) => {
                    scalar.set(Some(Related::Record(empty_object())));
                    scalar.mark_clean();
                }
            }
            debug!("bound empty relationship");
        }
    }

    Ok(field.get())
}

fn nestable(name: &str, initial_length: Option<usize>) -> Extension<Related> {
    Extension::Nestable {
        relationship: name.to_owned(),
        initial_length,
        watch_for_pending_changes: true,
    }
}

fn construct(
    factory: &dyn ModelFactory,
    record: &Arc<Record>,
    name: &str,
    data: Value,
) -> Result<Arc<dyn RelatedModel>, BindError> {
    factory
        .construct(record, data)
        .map_err(|source| BindError::Construct {
            relationship: name.to_owned(),
            source,
        })
}

/// Element constructor for client pushes. Holds the parent weakly: the parent
/// owns the container that owns this constructor.
fn pushable(record: &Arc<Record>, factory: Arc<dyn ModelFactory>, blank: BlankValue) -> Pushable<Related> {
    let parent = Arc::downgrade(record);
    Pushable::new(move || {
        let parent = parent
            .upgrade()
            .ok_or_else(|| StoreError::Construct("parent record was dropped".to_owned()))?;
        let template = blank.resolve(&parent);
        factory
            .construct(&parent, template)
            .map(Related::Model)
            .map_err(|e| StoreError::Construct(e.to_string()))
    })
}

async fn wait_until_loaded(name: &str, models: &[Arc<dyn RelatedModel>]) -> Result<(), BindError> {
    let pending: Vec<_> = models.iter().filter_map(|model| model.done_loading()).collect();
    if pending.is_empty() {
        return Ok(());
    }
    debug!(pending = pending.len(), "waiting for models to finish loading");
    try_join_all(pending)
        .await
        .map_err(|source| BindError::Loading {
            relationship: name.to_owned(),
            source,
        })?;
    Ok(())
}

fn shape_mismatch(name: &str, field: &Field, found: &'static str) -> BindError {
    BindError::ShapeMismatch {
        relationship: name.to_owned(),
        expected: field.kind(),
        found,
    }
}
