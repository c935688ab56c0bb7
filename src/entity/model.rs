//! The annotation entity: an observable mirror of one remote record
//!
//! Attributes are an open JSON object adopted verbatim from the server; the
//! only field this crate interprets is the `uid` primary key. Dirty tracking
//! compares against the baseline captured at the last successful sync.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::events::{EntityEvent, Interest, Subscribers, SubscriptionId};
use crate::config::Config;
use crate::error::{EntityError, Result};
use crate::transport::{Attributes, Transport};

/// Identity attribute the remote API uses as primary key.
pub const ID_ATTRIBUTE: &str = "uid";

/// A single annotation record, mirrored locally and synchronized on demand.
///
/// While `uid` is unset the entity is "new" (not yet persisted); once the
/// server assigns one on create, or the entity is built from an existing
/// record, it is "existing". A successful [`destroy`](Self::destroy) makes it
/// terminal: further sync calls fail with an invalid-state error.
pub struct AnnotationEntity {
    transport: Arc<dyn Transport>,
    config: Config,
    attributes: Attributes,
    /// Attribute values at the last successful sync (or construction).
    baseline: Attributes,
    dirty: HashSet<String>,
    destroyed: bool,
    subscribers: Subscribers,
}

impl AnnotationEntity {
    /// Create an empty, new entity. No I/O happens here.
    pub fn new(transport: Arc<dyn Transport>, config: Config) -> Self {
        Self::from_attributes(transport, config, Attributes::new())
    }

    /// Create an entity pre-populated from a record payload. The initial
    /// attributes become the baseline, so nothing starts out dirty.
    pub fn from_attributes(
        transport: Arc<dyn Transport>,
        config: Config,
        attributes: Attributes,
    ) -> Self {
        AnnotationEntity {
            transport,
            config,
            baseline: attributes.clone(),
            attributes,
            dirty: HashSet::new(),
            destroyed: false,
            subscribers: Subscribers::new(),
        }
    }

    // ---- attribute access ----

    /// Current value of an attribute, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Whether the attribute is present and non-null. A server-sent explicit
    /// `null` reads the same as a missing key.
    pub fn has(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|v| !v.is_null())
    }

    /// String value of an attribute, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Boolean value of an attribute, if it is a boolean.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Numeric value of an attribute, if it is a number.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// The `createdAt` timestamp, if the server sent one in RFC 3339 form.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.get_str("createdAt")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Set an attribute. Any key/value is accepted; the schema is
    /// server-defined. Emits a change event and updates the dirty set only
    /// when the value actually differs from the current one.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if self.attributes.get(&name) == Some(&value) {
            return;
        }
        self.attributes.insert(name.clone(), value);
        self.refresh_dirty(&name);
        self.subscribers.notify(&EntityEvent::Changed { name });
    }

    /// Remove an attribute entirely. Emits a change event if it was present.
    pub fn unset(&mut self, name: &str) {
        if self.attributes.remove(name).is_none() {
            return;
        }
        self.refresh_dirty(name);
        self.subscribers.notify(&EntityEvent::Changed {
            name: name.to_string(),
        });
    }

    fn refresh_dirty(&mut self, name: &str) {
        if self.attributes.get(name) == self.baseline.get(name) {
            self.dirty.remove(name);
        } else {
            self.dirty.insert(name.to_string());
        }
    }

    /// Snapshot of the full attribute map as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }

    // ---- identity & addressing ----

    /// The `uid`, once assigned by the server or supplied at construction.
    ///
    /// The payload is opaque beyond the field name, so a scalar `uid` of any
    /// JSON type is honored: numbers are rendered the way the wire sends
    /// them, exactly as they would appear in the resource URL.
    pub fn identifier(&self) -> Option<String> {
        match self.get(ID_ATTRIBUTE)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// New means not yet persisted: no usable `uid` assigned. Derived from
    /// [`identifier`](Self::identifier) so classification and addressing can
    /// never disagree.
    pub fn is_new(&self) -> bool {
        self.identifier().is_none()
    }

    /// Whether the entity has been destroyed and is terminal.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names changed locally since the last successful sync, sorted.
    pub fn changed_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dirty.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Address of this record: `{collection}/{uid}` for existing records, the
    /// collection URL while new. Fails if no endpoint is configured.
    pub fn resource_url(&self) -> Result<String> {
        match self.identifier() {
            Some(uid) => self.config.resource_url(&uid),
            None => self.config.collection_url(),
        }
    }

    // ---- observers ----

    /// Register a listener. Notifications fire synchronously with the
    /// mutation that caused them.
    pub fn subscribe(
        &mut self,
        interest: Interest,
        callback: impl FnMut(&EntityEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(interest, callback)
    }

    /// Remove a listener. Effective for all notifications after this returns.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ---- synchronization ----

    /// Replace local state with the server's current record.
    ///
    /// On success every attribute comes from the response, the dirty set is
    /// cleared, and one consolidated `Replaced` event fires. On failure local
    /// state is untouched. Never retried internally.
    pub async fn fetch(&mut self) -> Result<()> {
        self.ensure_live("fetch")?;
        let url = self.resource_url()?;
        debug!(%url, "fetching annotation");
        let fetched = match self.transport.read(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(%url, error = %e, "annotation fetch failed");
                return Err(EntityError::Sync(e));
            }
        };
        self.apply_fetched(fetched)
    }

    /// Adopt a fetch completion. Split from the await so a completion that
    /// lands after a destroy is rejected instead of resurrecting attributes
    /// on a terminal entity.
    fn apply_fetched(&mut self, fetched: Attributes) -> Result<()> {
        self.ensure_live("fetch completion")?;
        self.attributes = fetched.clone();
        self.baseline = fetched;
        self.dirty.clear();
        self.subscribers.notify(&EntityEvent::Replaced);
        Ok(())
    }

    /// Persist local state: create while new, update once existing.
    ///
    /// Both branches send the full attribute set (matching the remote API's
    /// replace semantics; dirty tracking is for callers, not the wire). The
    /// server response is merged over the local map, so server-assigned
    /// fields like `uid` win; a change event fires per attribute the server
    /// altered. On failure local state is untouched.
    pub async fn save(&mut self) -> Result<()> {
        self.ensure_live("save")?;
        let body = self.attributes.clone();
        let outcome = if self.is_new() {
            let url = self.config.collection_url()?;
            debug!(%url, "creating annotation");
            self.transport.create(&url, &body).await
        } else {
            let url = self.resource_url()?;
            debug!(%url, "updating annotation");
            self.transport.update(&url, &body).await
        };
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "annotation save failed");
                return Err(EntityError::Sync(e));
            }
        };
        self.apply_saved(response)
    }

    /// Adopt a save completion; same terminal-entity check as
    /// [`apply_fetched`](Self::apply_fetched).
    fn apply_saved(&mut self, response: Attributes) -> Result<()> {
        self.ensure_live("save completion")?;
        self.merge_response(response);
        Ok(())
    }

    /// Delete the remote record and make the entity terminal.
    ///
    /// A new entity has nothing to delete server-side: this is a local no-op
    /// that succeeds immediately. Either way a `Destroyed` event fires on
    /// success; on transport failure the entity stays in its prior state.
    pub async fn destroy(&mut self) -> Result<()> {
        self.ensure_live("destroy")?;
        if !self.is_new() {
            let url = self.resource_url()?;
            debug!(%url, "deleting annotation");
            if let Err(e) = self.transport.delete(&url).await {
                warn!(%url, error = %e, "annotation delete failed");
                return Err(EntityError::Sync(e));
            }
        }
        self.destroyed = true;
        self.subscribers.notify(&EntityEvent::Destroyed);
        Ok(())
    }

    fn merge_response(&mut self, response: Attributes) {
        let mut changed = Vec::new();
        for (name, value) in response {
            if self.attributes.get(&name) != Some(&value) {
                self.attributes.insert(name.clone(), value);
                changed.push(name);
            }
        }
        self.baseline = self.attributes.clone();
        self.dirty.clear();
        for name in changed {
            self.subscribers.notify(&EntityEvent::Changed { name });
        }
    }

    fn ensure_live(&self, operation: &str) -> Result<()> {
        if self.destroyed {
            return Err(EntityError::InvalidState(format!(
                "{operation} on a destroyed entity"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for AnnotationEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationEntity")
            .field("uid", &self.identifier())
            .field("attributes", &self.attributes.len())
            .field("dirty", &self.changed_attributes())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
