//! Annotation entity module
//!
//! A single addressable annotation record mirrored from the remote
//! `/_annotations` collection:
//!
//! - open attribute map adopted verbatim from the server, `uid` as identity
//! - dirty tracking against the last synchronized baseline
//! - synchronous change notification to registered observers
//! - fetch/save/destroy delegating to an injected [`crate::transport::Transport`]

mod events;
mod model;

pub use events::{EntityEvent, Interest, SubscriptionId};
pub use model::{AnnotationEntity, ID_ATTRIBUTE};
