use serde_json::{Map, Value};
use std::fmt;

/// Coerces a wire id to an integer the way `parseInt(id, 10)` does.
///
/// Strings are read up to the first non-digit after an optional sign and
/// leading whitespace (`"12abc"` is `12`). Floats truncate toward zero.
/// Anything without leading digits yields `None`, and so does a digit run
/// outside the `i64` range: such an id cannot name a resource in the pool,
/// so it is treated like any other unparseable id.
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_str(s),
        _ => None,
    }
}

fn parse_int_str(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Identity of a resource: its `type` plus its integer-coerced `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub id: Option<i64>,
    pub kind: String,
}

impl ResourceKey {
    /// Reads `id` and `type` from a resource or reference object.
    ///
    /// Returns `None` when the value is not an object or has no string `type`.
    pub fn of(resource: &Value) -> Option<Self> {
        let object = resource.as_object()?;
        let kind = object.get("type")?.as_str()?.to_owned();
        let id = object.get("id").and_then(parse_int);
        Some(Self { id, kind })
    }

    /// Two keys match only when both ids parsed and everything is equal.
    /// An unparseable id never matches anything, itself included.
    pub fn matches(&self, other: &ResourceKey) -> bool {
        self.id.is_some() && self.id == other.id && self.kind == other.kind
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}:{}", self.kind, id),
            None => write!(f, "{}:?", self.kind),
        }
    }
}

/// Extracts `relationships[name].data` for every relationship of a raw
/// resource, in document order.
///
/// A relationship object without a `data` member yields `Value::Null`.
pub fn relationship_data(resource: &Value) -> Vec<(String, Value)> {
    resource
        .get("relationships")
        .and_then(Value::as_object)
        .map(|relationships| {
            relationships
                .iter()
                .map(|(name, relationship)| {
                    let data = relationship.get("data").cloned().unwrap_or(Value::Null);
                    (name.clone(), data)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// JavaScript truthiness for a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// An empty JSON object.
pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_int_follows_parse_int_rules() {
        assert_eq!(parse_int(&json!(7)), Some(7));
        assert_eq!(parse_int(&json!("42")), Some(42));
        assert_eq!(parse_int(&json!("  -3")), Some(-3));
        assert_eq!(parse_int(&json!("12abc")), Some(12));
        assert_eq!(parse_int(&json!(4.9)), Some(4));
        assert_eq!(parse_int(&json!("abc")), None);
        assert_eq!(parse_int(&json!(null)), None);
        assert_eq!(parse_int(&json!(true)), None);
    }

    #[test]
    fn ids_outside_the_integer_range_do_not_parse() {
        assert_eq!(parse_int(&json!("9223372036854775807")), Some(i64::MAX));
        assert_eq!(parse_int(&json!("99999999999999999999")), None);
        let key = ResourceKey::of(&json!({"id": "99999999999999999999", "type": "user"})).unwrap();
        assert!(!key.matches(&key));
    }

    #[test]
    fn keys_compare_type_and_integer_id() {
        let a = ResourceKey::of(&json!({"id": "2", "type": "user"})).unwrap();
        let b = ResourceKey::of(&json!({"id": 2, "type": "user"})).unwrap();
        let c = ResourceKey::of(&json!({"id": 2, "type": "post"})).unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));

        let broken = ResourceKey::of(&json!({"id": "x", "type": "user"})).unwrap();
        assert!(!broken.matches(&broken));
        assert_eq!(a.to_string(), "user:2");
    }

    #[test]
    fn relationship_data_keeps_document_order_and_nulls() {
        let resource = json!({
            "id": "1",
            "type": "post",
            "relationships": {
                "author": {"data": {"id": "2", "type": "user"}},
                "comments": {"data": [{"id": "3", "type": "comment"}]},
                "editor": {"links": {"related": "/x"}}
            }
        });
        let data = relationship_data(&resource);
        let names: Vec<&str> = data.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["author", "comments", "editor"]);
        assert_eq!(data[2].1, Value::Null);
        assert!(relationship_data(&json!({"id": 1})).is_empty());
    }
}
