//! Configuration for the annotation client

use std::env;

use serde::Deserialize;

use crate::error::{EntityError, Result};

/// Collection path the remote API serves annotations under.
pub const DEFAULT_COLLECTION_PATH: &str = "_annotations";

/// Client configuration: where the annotation collection lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server base URL, e.g. `http://localhost:3000`.
    pub endpoint: String,
    /// Collection path under the endpoint.
    pub collection_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: String::new(),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
        }
    }
}

impl Config {
    /// Create a configuration pointing at the given server endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Config {
            endpoint: endpoint.into(),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `ANNOTATION_ENDPOINT` has no default; a sync operation on a config
    /// without an endpoint fails with a configuration error.
    pub fn from_env() -> Self {
        Config {
            endpoint: env::var("ANNOTATION_ENDPOINT").unwrap_or_default(),
            collection_path: env::var("ANNOTATION_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_COLLECTION_PATH.to_string()),
        }
    }

    /// URL of the annotation collection itself (create targets, and the
    /// address of an entity that has no identifier yet).
    pub fn collection_url(&self) -> Result<String> {
        if self.endpoint.is_empty() {
            return Err(EntityError::Configuration(
                "annotation endpoint is not configured".to_string(),
            ));
        }
        Ok(format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.collection_path.trim_matches('/')
        ))
    }

    /// URL of a single record: `{collection}/{uid}`, with the identifier
    /// percent-encoded for path safety.
    pub fn resource_url(&self, uid: &str) -> Result<String> {
        Ok(format!("{}/{}", self.collection_url()?, urlencoding::encode(uid)))
    }
}
