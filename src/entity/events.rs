//! Change notification for annotation entities
//!
//! The entity owns a listener registry and notifies it synchronously with the
//! mutation that caused the event. Single-threaded cooperative model: no
//! locking, callbacks run on the mutating call's stack.

/// Events emitted by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityEvent {
    /// One attribute took a new value.
    Changed { name: String },
    /// The whole attribute map was replaced (after a successful fetch).
    Replaced,
    /// The entity was destroyed and is now terminal.
    Destroyed,
}

/// What a listener wants to hear about.
///
/// `Attribute` listeners also receive [`EntityEvent::Replaced`], since a bulk
/// refresh may have changed the attribute they watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interest {
    AnyChange,
    Attribute(String),
    Destroyed,
}

impl Interest {
    fn matches(&self, event: &EntityEvent) -> bool {
        match (self, event) {
            (Interest::AnyChange, EntityEvent::Changed { .. }) => true,
            (Interest::AnyChange, EntityEvent::Replaced) => true,
            (Interest::Attribute(watched), EntityEvent::Changed { name }) => watched == name,
            (Interest::Attribute(_), EntityEvent::Replaced) => true,
            (Interest::Destroyed, EntityEvent::Destroyed) => true,
            _ => false,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&EntityEvent)>;

/// Listener registry owned by the entity.
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Interest, Callback)>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Subscribers {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn subscribe(
        &mut self,
        interest: Interest,
        callback: impl FnMut(&EntityEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, interest, Box::new(callback)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    /// Takes effect for every notification after this call returns.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &EntityEvent) {
        for (_, interest, callback) in &mut self.entries {
            if interest.matches(event) {
                callback(event);
            }
        }
    }
}
