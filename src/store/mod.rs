//! # Reactive Store
//!
//! Observable containers the relationship binder writes into.
//!
//! - [`Observable`]: a scalar value with get/set/subscribe.
//! - [`ObservableArray`]: an ordered sequence with the same capabilities plus
//!   element-level mutation.
//! - [`Computed`]: a derived, filtered view over an [`ObservableArray`].
//! - [`Extension`]: behaviours attached to a container (postable, nestable,
//!   pushable), modelled as an explicit strategy enum.
//!
//! Containers are cheap handles around shared state, so cloning one yields
//! another handle to the same value. Change notification rides on
//! [`tokio::sync::watch`]: every `set` wakes the subscribers.

pub mod computed;
pub mod error;
pub mod extension;
pub mod observable;

pub use computed::Computed;
pub use error::StoreError;
pub use extension::{Extension, ExtensionKind, Pushable};
pub use observable::{Observable, ObservableArray};
