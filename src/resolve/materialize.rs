//! Recursive resolution of a single resource into a merged record.
//!
//! A merged record is the resource object with:
//! - `attributes` flattened onto the top level,
//! - `id` coerced to an integer (`null` when it does not parse),
//! - every relationship name holding the resolved record, an ordered list of
//!   resolved records, or `null`.
//!
//! References are resolved against the [`IncludedPool`] when one is given. A
//! reference with no match in the pool is used as-is, which also covers
//! documents that embed full resources instead of side-loading them.

use super::pool::IncludedPool;
use crate::model::{parse_int, Immybox, ResourceKey};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Options for [`materialize`].
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Side-loaded resources used to resolve `{id, type}` references.
    pub included: Option<Arc<IncludedPool>>,
    /// Adds `value`/`text` fields to the top-level record.
    pub immybox: Option<Immybox>,
    /// Relationships whose resolved records also get `value`/`text` fields,
    /// using the default `id`/`name` projection.
    pub nested_immybox_relationships: Vec<String>,
}

impl MaterializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_included(mut self, included: Arc<IncludedPool>) -> Self {
        self.included = Some(included);
        self
    }

    pub fn with_immybox(mut self, immybox: Immybox) -> Self {
        self.immybox = Some(immybox);
        self
    }

    pub fn with_nested_immybox<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nested_immybox_relationships = relationships.into_iter().map(Into::into).collect();
        self
    }
}

/// Resolves a resource, a bare reference, or anything else into a merged record.
///
/// Non-object input yields `Value::Null`. The input is consumed; the pool is
/// only read.
pub fn materialize(resource: Value, options: &MaterializeOptions) -> Value {
    let remapper = Remapper {
        pool: options.included.as_deref(),
        nested_immybox: &options.nested_immybox_relationships,
    };
    let mut chain = Vec::new();
    remapper.remap(resource, options.immybox.as_ref(), &mut chain)
}

struct Remapper<'a> {
    pool: Option<&'a IncludedPool>,
    nested_immybox: &'a [String],
}

impl Remapper<'_> {
    /// `chain` holds the keys of the resources currently being expanded above
    /// this one. A resource already on the chain is not expanded again.
    fn remap(&self, resource: Value, immybox: Option<&Immybox>, chain: &mut Vec<ResourceKey>) -> Value {
        let resource = match self.pool.and_then(|pool| pool.find(&resource)) {
            Some(found) => found.clone(),
            None => resource,
        };
        let Value::Object(mut object) = resource else {
            return Value::Null;
        };

        let key = object_key(&object);
        let kind = object.get("type").cloned();
        let attributes = object.shift_remove("attributes");
        let relationships = object.shift_remove("relationships");

        if let Some(Value::Object(attributes)) = attributes {
            object.extend(attributes);
        }
        let id = key
            .as_ref()
            .and_then(|key| key.id)
            .or_else(|| object.get("id").and_then(parse_int));
        object.insert("id".to_owned(), id.map(Value::from).unwrap_or(Value::Null));
        if let Some(kind) = kind {
            object.insert("type".to_owned(), kind);
        }

        let revisited = key
            .as_ref()
            .is_some_and(|key| chain.iter().any(|seen| seen.matches(key)));

        match relationships {
            Some(Value::Object(_)) if revisited => {
                if let Some(key) = &key {
                    warn!(resource = %key, "cyclic relationship, leaving reference unexpanded");
                }
            }
            Some(Value::Object(relationships)) => {
                let pushed = match key {
                    Some(key) => {
                        chain.push(key);
                        true
                    }
                    None => false,
                };
                for (name, relationship) in relationships {
                    let resolved = self.remap_relationship(&name, relationship, chain);
                    object.insert(name, resolved);
                }
                if pushed {
                    chain.pop();
                }
            }
            _ => {}
        }

        if let Some(immybox) = immybox {
            let value = object.get(immybox.value_field()).cloned().unwrap_or(Value::Null);
            let text = object.get(immybox.text_field()).cloned().unwrap_or(Value::Null);
            object.insert("value".to_owned(), value);
            object.insert("text".to_owned(), text);
        }

        Value::Object(object)
    }

    fn remap_relationship(&self, name: &str, relationship: Value, chain: &mut Vec<ResourceKey>) -> Value {
        let immybox = self
            .nested_immybox
            .iter()
            .any(|nested| nested == name)
            .then(Immybox::default);
        let data = match relationship {
            Value::Object(mut relationship) => relationship.shift_remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        };

        match data {
            Value::Array(items) => {
                debug!(relationship = name, len = items.len(), "resolving to-many relationship");
                Value::Array(
                    items
                        .into_iter()
                        .map(|item| self.remap(item, immybox.as_ref(), chain))
                        .collect(),
                )
            }
            data @ Value::Object(_) => self.remap(data, immybox.as_ref(), chain),
            _ => Value::Null,
        }
    }
}

fn object_key(object: &Map<String, Value>) -> Option<ResourceKey> {
    let kind = object.get("type")?.as_str()?.to_owned();
    let id = object.get("id").and_then(parse_int);
    Some(ResourceKey { id, kind })
}
