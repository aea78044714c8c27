//! # Resource Resolution
//!
//! Turns JSON:API documents into fully merged records.
//!
//! - [`IncludedPool`]: the side-loaded `included` resources, searched by `(type, id)`.
//! - [`materialize`]: resolves one resource (or reference) recursively, flattening
//!   `attributes` and replacing every relationship with its resolved record(s).
//! - [`parse_document`]: entry point for a whole response document.
//!
//! Everything here is synchronous and infallible. Malformed pieces of a
//! document degrade to `null` instead of failing.

pub mod document;
pub mod materialize;
pub mod pool;

pub use document::{parse_document, Document, Parsed};
pub use materialize::{materialize, MaterializeOptions};
pub use pool::IncludedPool;
