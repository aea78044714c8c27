//! Wire-level helpers for JSON:API documents.
//!
//! Resources stay loosely typed ([`serde_json::Value`]) because attributes are
//! arbitrary. This module only adds the small typed pieces the resolver needs:
//! integer id coercion, `(type, id)` keys and the selection-widget projection.

pub mod immybox;
pub mod resource;

pub use immybox::*;
pub use resource::*;
