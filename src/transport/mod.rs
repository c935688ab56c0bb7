//! Transport abstraction for entity synchronization
//!
//! The entity never talks to the network itself; it hands method, URL, and a
//! JSON body to an injected [`Transport`] and adopts whatever JSON object
//! comes back. [`HttpTransport`] is the production implementation.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TransportError;

/// The open attribute mapping exchanged with the server.
pub type Attributes = Map<String, Value>;

/// Four verbs mapped to create/read/update/delete against the collection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Insert a new record at the collection URL. Returns the stored record,
    /// including server-assigned fields such as `uid`.
    async fn create(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError>;

    /// Read the current record at a resource URL.
    async fn read(&self, url: &str) -> Result<Attributes, TransportError>;

    /// Replace the record at a resource URL. Returns the stored record.
    async fn update(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError>;

    /// Delete the record at a resource URL.
    async fn delete(&self, url: &str) -> Result<(), TransportError>;
}

/// Scripted transport for tests
#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{Attributes, Transport};
    use crate::error::TransportError;

    /// One recorded call: verb, URL, and body if the verb carried one.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub verb: &'static str,
        pub url: String,
        pub body: Option<Attributes>,
    }

    /// In-memory transport that records every request it receives.
    ///
    /// `create` and `update` echo the body back (create adds a generated
    /// `uid`) unless a canned response is queued via `next_response`.
    pub struct MockTransport {
        /// Payload served by `read`.
        pub remote: Mutex<Attributes>,
        /// Canned response for the next create/update, consumed once.
        pub next_response: Mutex<Option<Attributes>>,
        /// When set, every verb fails with this HTTP status.
        pub fail_status: Option<u16>,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            MockTransport {
                remote: Mutex::new(Attributes::new()),
                next_response: Mutex::new(None),
                fail_status: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_remote(remote: Attributes) -> Self {
            let transport = Self::new();
            *transport.remote.lock().unwrap() = remote;
            transport
        }

        pub fn failing(status: u16) -> Self {
            MockTransport {
                fail_status: Some(status),
                ..Self::new()
            }
        }

        pub fn respond_with(self, response: Attributes) -> Self {
            *self.next_response.lock().unwrap() = Some(response);
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn record(&self, verb: &'static str, url: &str, body: Option<&Attributes>) {
            self.requests.lock().unwrap().push(RecordedRequest {
                verb,
                url: url.to_string(),
                body: body.cloned(),
            });
        }

        fn check_failure(&self) -> Result<(), TransportError> {
            match self.fail_status {
                Some(code) => Err(TransportError::Status {
                    code,
                    message: "scripted failure".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn create(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError> {
            self.check_failure()?;
            self.record("create", url, Some(body));
            if let Some(canned) = self.next_response.lock().unwrap().take() {
                return Ok(canned);
            }
            let mut stored = body.clone();
            stored.insert(
                "uid".to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
            Ok(stored)
        }

        async fn read(&self, url: &str) -> Result<Attributes, TransportError> {
            self.check_failure()?;
            self.record("read", url, None);
            Ok(self.remote.lock().unwrap().clone())
        }

        async fn update(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError> {
            self.check_failure()?;
            self.record("update", url, Some(body));
            if let Some(canned) = self.next_response.lock().unwrap().take() {
                return Ok(canned);
            }
            Ok(body.clone())
        }

        async fn delete(&self, url: &str) -> Result<(), TransportError> {
            self.check_failure()?;
            self.record("delete", url, None);
            Ok(())
        }
    }
}
