//! Annotation Client
//!
//! Client-side mirror of a single annotation record on a remote HTTP
//! collection (conventionally `/_annotations`). The entity keeps an
//! observable in-memory attribute map, tracks which attributes changed since
//! the last sync, and exposes fetch/save/destroy operations that delegate the
//! actual network exchange to an injected transport.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use annotation_client::{AnnotationEntity, Config, HttpTransport};
//! use serde_json::json;
//!
//! # async fn run() -> annotation_client::Result<()> {
//! let config = Config::new("http://localhost:3000");
//! let mut annotation = AnnotationEntity::new(Arc::new(HttpTransport::new()), config);
//! annotation.set("title", json!("cpu spike"));
//! annotation.save().await?;
//! println!("server assigned uid {:?}", annotation.identifier());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - `entity`: the observable annotation record and its sync operations
//! - `transport`: the HTTP seam (trait + reqwest implementation)
//! - `config`: endpoint and collection path
//! - `error`: error kinds (configuration, sync, invalid state)

pub mod config;
pub mod entity;
pub mod error;
pub mod transport;

pub use config::Config;
pub use entity::{AnnotationEntity, EntityEvent, Interest, SubscriptionId};
pub use error::{EntityError, Result, TransportError};
pub use transport::{Attributes, HttpTransport, Transport};
