//! # JSON:API Graph
//!
//! > **Turn JSON:API documents into live, reactive record graphs.**
//!
//! A JSON:API response is a flat document: primary `data`, a side-loaded
//! `included` list, and relationships that point at other resources by
//! `(type, id)`. This crate resolves those references into merged records and
//! binds each relationship of a record into an observable container that the
//! rest of an application can read, mutate and subscribe to.
//!
//! ## Architecture Notes
//!
//! ### 1. Loosely typed resources, typed plumbing
//! Attributes are arbitrary, so resources stay [`serde_json::Value`]. Everything
//! around them (keys, containers, declarations, errors) is typed.
//!
//! ### 2. Resolution never fails
//! Dangling references fall back to the embedded relationship object, and a
//! malformed relationship payload degrades to `null`. Only binding (model
//! construction and "done loading" signals) and transport can fail.
//!
//! ### 3. Two-phase binding
//! [`create_relationships`](binding::create_relationships) creates every
//! container of a record before any bind starts, then joins all binds. The
//! join runs on the calling task; no tasks are spawned.
//!
//! ### 4. Observability
//! `tracing` is used throughout with structured fields. Install a subscriber
//! with [`runtime::setup_tracing`].
//!
//! ## Module Tour
//!
//! ### 1. The Wire Model ([`model`])
//! - **Role**: Id coercion, `(type, id)` keys, relationship extraction, the
//!   selection-widget projection.
//! - **Key items**: [`ResourceKey`](model::ResourceKey), [`parse_int`](model::parse_int), [`Immybox`](model::Immybox).
//!
//! ### 2. The Resolver ([`resolve`])
//! - **Role**: Recursive, cycle-safe merging of resources with their included neighbours.
//! - **Key items**: [`parse_document`](resolve::parse_document), [`materialize`](resolve::materialize), [`IncludedPool`](resolve::IncludedPool).
//!
//! ### 3. The Store ([`store`])
//! - **Role**: Observable scalars and sequences, filtered views, attachable extensions.
//! - **Key items**: [`Observable`](store::Observable), [`ObservableArray`](store::ObservableArray), [`Computed`](store::Computed).
//!
//! ### 4. The Binder ([`binding`])
//! - **Role**: Projects a record's relationships onto containers, wrapping related records in client models.
//! - **Key items**: [`Record`](binding::Record), [`ClientRelationship`](binding::ClientRelationship), [`build_relationship`](binding::build_relationship).
//!
//! ### 5. The Transport ([`transport`])
//! - **Role**: JSON over HTTP with CSRF credentials and structured request errors.
//! - **Key items**: [`Transport`](transport::Transport), [`HttpJsonClient`](transport::HttpJsonClient), [`MockTransport`](transport::mock::MockTransport).
//!
//! ### 6. The Runtime ([`runtime`])
//! - **Role**: Fetch-and-hydrate, logging setup.
//! - **Key items**: [`ResourceLoader`](runtime::ResourceLoader), [`setup_tracing`](runtime::setup_tracing).
//!
//! ## Quick Start
//!
//! ```ignore
//! use jsonapi_graph::binding::ClientRelationship;
//! use jsonapi_graph::runtime::{setup_tracing, ResourceLoader};
//! use jsonapi_graph::transport::{HttpJsonClient, StaticToken, TransportConfig};
//!
//! setup_tracing();
//! let client = HttpJsonClient::new(&TransportConfig::from_env()?, StaticToken::new(token))?;
//! let loader = ResourceLoader::new(client)
//!     .with_declaration(ClientRelationship::new("comments").allow_destroy());
//!
//! let posts = loader.load("posts?include=comments".into()).await?;
//! let live = posts[0].non_deleted("comments").unwrap().get();
//! ```

pub mod binding;
pub mod model;
pub mod resolve;
pub mod runtime;
pub mod store;
pub mod transport;
