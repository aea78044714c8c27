use serde::{Deserialize, Serialize};

/// Projection of a merged record into a `{value, text}` pair for
/// list-selection widgets.
///
/// `value` and `text` name the fields of the record to read; they default to
/// `id` and `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Immybox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Immybox {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            text: Some(text.into()),
        }
    }

    pub fn value_field(&self) -> &str {
        self.value.as_deref().unwrap_or("id")
    }

    pub fn text_field(&self) -> &str {
        self.text.as_deref().unwrap_or("name")
    }
}
