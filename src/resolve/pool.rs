use crate::model::ResourceKey;
use serde_json::Value;

/// The `included` section of a document.
///
/// Lookups are linear and the first entry in document order wins, so a
/// duplicated resource resolves to its earliest occurrence.
#[derive(Debug, Clone, Default)]
pub struct IncludedPool {
    resources: Vec<Value>,
    keys: Vec<Option<ResourceKey>>,
}

impl IncludedPool {
    pub fn new(resources: Vec<Value>) -> Self {
        let keys = resources.iter().map(ResourceKey::of).collect();
        Self { resources, keys }
    }

    /// Finds the resource whose type and integer id equal the reference's.
    pub fn find(&self, reference: &Value) -> Option<&Value> {
        let wanted = ResourceKey::of(reference)?;
        self.keys
            .iter()
            .position(|key| key.as_ref().is_some_and(|key| key.matches(&wanted)))
            .map(|index| &self.resources[index])
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl From<Vec<Value>> for IncludedPool {
    fn from(resources: Vec<Value>) -> Self {
        Self::new(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pool() -> IncludedPool {
        IncludedPool::new(vec![
            json!({"id": "2", "type": "user", "attributes": {"name": "Ann"}}),
            json!({"id": 2, "type": "tag", "attributes": {"label": "rust"}}),
            json!({"id": "2", "type": "user", "attributes": {"name": "Shadowed"}}),
        ])
    }

    #[test]
    fn finds_by_integer_id_and_type() {
        let pool = pool();
        let found = pool.find(&json!({"id": 2, "type": "user"})).unwrap();
        assert_eq!(found["attributes"]["name"], "Ann");

        let tag = pool.find(&json!({"id": "02", "type": "tag"})).unwrap();
        assert_eq!(tag["attributes"]["label"], "rust");
    }

    #[test]
    fn wrong_type_or_id_does_not_match() {
        let pool = pool();
        assert!(pool.find(&json!({"id": 2, "type": "post"})).is_none());
        assert!(pool.find(&json!({"id": 3, "type": "user"})).is_none());
        assert!(pool.find(&json!({"id": "nope", "type": "user"})).is_none());
        assert!(pool.find(&json!(null)).is_none());
    }
}
