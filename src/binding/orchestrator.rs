//! Two-phase relationship creation for a whole record.

use super::binder::build_relationship;
use super::declaration::ClientRelationship;
use super::error::BindError;
use super::record::{Field, FieldValue, Record, Related};
use crate::resolve::IncludedPool;
use crate::store::Computed;
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Options shared by every relationship of one orchestration.
#[derive(Debug, Clone, Default)]
pub struct RelationshipOptions {
    /// Side-loaded resources used to resolve relationship references.
    pub included: Option<Arc<IncludedPool>>,
    /// Client declarations, matched to relationships by name.
    pub declarations: Vec<ClientRelationship>,
}

impl RelationshipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_included(mut self, included: Arc<IncludedPool>) -> Self {
        self.included = Some(included);
        self
    }

    pub fn with_declaration(mut self, declaration: ClientRelationship) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn declaration(&self, name: &str) -> Option<&ClientRelationship> {
        find_declaration(&self.declarations, name)
    }
}

fn find_declaration<'a>(declarations: &'a [ClientRelationship], name: &str) -> Option<&'a ClientRelationship> {
    declarations.iter().find(|declaration| declaration.name == name)
}

/// A relationship whose container exists and is ready to be bound.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub name: String,
    pub data: Value,
    pub declaration: Option<&'a ClientRelationship>,
    pub field: Field,
}

/// Phase 1 for one relationship.
///
/// Reuses the record's container for `name` when there is one, otherwise
/// creates a sequence for array data and a scalar for anything else. With
/// `allow_destroy` declared on a sequence, also installs the
/// `non_deleted_<name>` view.
pub fn init_relationship<'a>(
    record: &Arc<Record>,
    name: String,
    data: Value,
    declarations: &'a [ClientRelationship],
) -> Resolution<'a> {
    let declaration = find_declaration(declarations, &name);
    let field = record.field_or_insert_with(&name, || Field::for_data(&data));

    if declaration.is_some_and(|d| d.allow_destroy) {
        match &field {
            Field::Sequence(sequence) => {
                record.set_non_deleted(&name, Computed::filter(sequence.clone(), Related::is_live));
            }
            Field::Scalar(_) => debug!(relationship = %name, "allow_destroy ignored on to-one relationship"),
        }
    }

    Resolution {
        name,
        data,
        declaration,
        field,
    }
}

/// Phase 2 for one relationship.
pub async fn bind_resolution(
    record: &Arc<Record>,
    resolution: Resolution<'_>,
    included: Option<&Arc<IncludedPool>>,
) -> Result<FieldValue, BindError> {
    let Resolution {
        name,
        data,
        declaration,
        field,
    } = resolution;
    build_relationship(record, &name, data, &field, declaration, included).await
}

/// Creates and binds every relationship of `record`.
///
/// All containers (and their derived views) are created before any bind
/// starts. The binds then run concurrently on the current task and are
/// joined; the result lists the final container values in input order. The
/// first failing bind rejects the whole call and the remaining binds are
/// dropped.
#[instrument(skip_all)]
pub async fn create_relationships<I>(
    record: &Arc<Record>,
    relationships: I,
    options: &RelationshipOptions,
) -> Result<Vec<FieldValue>, BindError>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let resolutions: Vec<Resolution<'_>> = relationships
        .into_iter()
        .map(|(name, data)| init_relationship(record, name, data, &options.declarations))
        .collect();
    debug!(count = resolutions.len(), "relationship containers ready");

    let included = options.included.as_ref();
    let values = try_join_all(
        resolutions
            .into_iter()
            .map(|resolution| bind_resolution(record, resolution, included)),
    )
    .await?;

    info!(count = values.len(), "relationships bound");
    Ok(values)
}

/// [`create_relationships`] for a single relationship.
#[instrument(skip(record, data, options))]
pub async fn create_relationship(
    record: &Arc<Record>,
    name: &str,
    data: Value,
    options: &RelationshipOptions,
) -> Result<FieldValue, BindError> {
    let resolution = init_relationship(record, name.to_owned(), data, &options.declarations);
    bind_resolution(record, resolution, options.included.as_ref()).await
}
