//! # Relationship Binding
//!
//! Wires the relationships of a record into reactive containers.
//!
//! The flow for one record:
//!
//! 1. [`init_relationship`] creates (or reuses) the container for every
//!    relationship and, for soft-deletable ones, the `non_deleted_<name>` view.
//! 2. [`build_relationship`] resolves the raw data, optionally wraps each
//!    record in a client model, and assigns the container.
//!
//! [`create_relationships`] runs step 1 for every relationship before any
//! step 2 starts, then runs all step-2 binds concurrently and joins them.
//!
//! Client behaviour per relationship is declared with [`ClientRelationship`]:
//! a [`ModelFactory`] replaces prototype-based class injection, and the
//! optional "done loading" capability lives on [`RelatedModel`].

pub mod binder;
pub mod declaration;
pub mod error;
pub mod orchestrator;
pub mod record;

pub use binder::build_relationship;
pub use declaration::*;
pub use error::*;
pub use orchestrator::*;
pub use record::*;
