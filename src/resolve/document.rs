use super::materialize::{materialize, MaterializeOptions};
use super::pool::IncludedPool;
use crate::model::is_truthy;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The primary data of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// `data` was a single resource (or `null`).
    Single(Value),
    /// `data` was a list of resources, in document order.
    Collection(Vec<Value>),
}

impl Parsed {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Parsed::Single(record) => Some(record),
            Parsed::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Parsed::Single(_) => None,
            Parsed::Collection(records) => Some(records),
        }
    }

    /// Flattens either shape into a list. A single `null` record yields an empty list.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Parsed::Single(Value::Null) => Vec::new(),
            Parsed::Single(record) => vec![record],
            Parsed::Collection(records) => records,
        }
    }
}

/// A response document split into its side-loaded pool and primary data.
#[derive(Debug, Clone)]
pub struct Document {
    pub included: Option<Arc<IncludedPool>>,
    /// The `data` member, `null` when absent.
    pub data: Value,
}

impl Document {
    /// Splits a response. A falsy response (`null`, `false`, `0`, `""`) or a
    /// non-object yields `None`: there is no data, which is not an error.
    pub fn from_response(response: Value) -> Option<Self> {
        if !is_truthy(&response) {
            return None;
        }
        let Value::Object(mut document) = response else {
            debug!("response is not a document object");
            return None;
        };

        let included = match document.shift_remove("included") {
            Some(Value::Array(included)) => {
                debug!(included = included.len(), "building included pool");
                Some(Arc::new(IncludedPool::new(included)))
            }
            _ => None,
        };
        Some(Self {
            included,
            data: document.shift_remove("data").unwrap_or(Value::Null),
        })
    }

    /// The primary resources, in document order. A single resource is a
    /// list of one; `null` or malformed data is an empty list.
    pub fn into_resources(self) -> Vec<Value> {
        match self.data {
            Value::Array(resources) => resources,
            resource @ Value::Object(_) => vec![resource],
            _ => Vec::new(),
        }
    }
}

/// Parses a JSON:API response document into merged records.
///
/// See [`Document::from_response`] for what counts as "no data". When the
/// document has an `included` list it replaces any pool already present in
/// `options`.
pub fn parse_document(response: Value, mut options: MaterializeOptions) -> Option<Parsed> {
    let document = Document::from_response(response)?;
    if document.included.is_some() {
        options.included = document.included;
    }

    let parsed = match document.data {
        Value::Array(resources) => Parsed::Collection(
            resources
                .into_iter()
                .map(|resource| materialize(resource, &options))
                .collect(),
        ),
        resource => Parsed::Single(materialize(resource, &options)),
    };
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_side_loaded_author() {
        let document = json!({
            "data": {
                "id": "1",
                "type": "post",
                "attributes": {"title": "Hi"},
                "relationships": {"author": {"data": {"id": "2", "type": "user"}}}
            },
            "included": [{"id": "2", "type": "user", "attributes": {"name": "Ann"}}]
        });
        let parsed = parse_document(document, MaterializeOptions::new()).unwrap();
        assert_eq!(
            parsed,
            Parsed::Single(json!({
                "id": 1,
                "type": "post",
                "title": "Hi",
                "author": {"id": 2, "type": "user", "name": "Ann"}
            }))
        );
    }

    #[test]
    fn collections_keep_order() {
        let document = json!({
            "data": [
                {"id": "3", "type": "tag", "attributes": {"label": "c"}},
                {"id": "1", "type": "tag", "attributes": {"label": "a"}}
            ]
        });
        let records = parse_document(document, MaterializeOptions::new())
            .unwrap()
            .into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"id": 3, "type": "tag", "label": "c"}));
        assert_eq!(records[1]["label"], "a");
    }

    #[test]
    fn document_without_relationships_is_only_flattened() {
        let document = json!({"data": {"id": 7, "type": "note", "attributes": {"body": "x"}}, "included": []});
        let parsed = parse_document(document, MaterializeOptions::new()).unwrap();
        assert_eq!(parsed.as_single(), Some(&json!({"id": 7, "type": "note", "body": "x"})));
    }

    #[test]
    fn falsy_responses_have_no_data() {
        assert!(parse_document(Value::Null, MaterializeOptions::new()).is_none());
        assert!(parse_document(json!(""), MaterializeOptions::new()).is_none());
        assert!(parse_document(json!(false), MaterializeOptions::new()).is_none());
    }

    #[test]
    fn documents_split_into_pool_and_resources() {
        let document = Document::from_response(json!({
            "data": {"id": "1", "type": "post"},
            "included": [{"id": "2", "type": "user"}]
        }))
        .unwrap();
        assert_eq!(document.included.as_ref().map(|pool| pool.len()), Some(1));
        assert_eq!(document.into_resources(), vec![json!({"id": "1", "type": "post"})]);

        let empty = Document::from_response(json!({"data": null})).unwrap();
        assert!(empty.included.is_none());
        assert!(empty.into_resources().is_empty());
        assert!(Document::from_response(json!([1, 2])).is_none());
    }

    #[test]
    fn document_pool_replaces_caller_pool() {
        let stale = Arc::new(IncludedPool::new(vec![
            json!({"id": "2", "type": "user", "attributes": {"name": "Stale"}}),
        ]));
        let document = json!({
            "data": {"id": "1", "type": "post", "relationships": {"author": {"data": {"id": "2", "type": "user"}}}},
            "included": [{"id": "2", "type": "user", "attributes": {"name": "Fresh"}}]
        });
        let parsed = parse_document(document, MaterializeOptions::new().with_included(stale)).unwrap();
        assert_eq!(parsed.as_single().unwrap()["author"]["name"], "Fresh");
    }
}
