//! Event registry.
//!
//! Definitions and the trigger index live in [`EventRegistry`]; they change
//! only at load time. Per-game runtime state (disabled and occurred sets)
//! lives in [`EventFlags`] so a reset never touches registrations.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::event::Event;

/// Registered events indexed by id and by trigger.
#[derive(Clone, Debug, Default)]
pub struct EventRegistry {
    events: FxHashMap<String, Arc<Event>>,
    /// Trigger id to event ids, in registration order.
    by_trigger: FxHashMap<String, Vec<String>>,
    dedupe: bool,
}

impl EventRegistry {
    /// Create an empty registry.
    ///
    /// With `dedupe` set, re-registering an id replaces the definition in
    /// place; otherwise every registration appends another index entry.
    #[must_use]
    pub fn new(dedupe: bool) -> Self {
        Self {
            dedupe,
            ..Self::default()
        }
    }

    /// Register an event, returning the definition it replaced.
    pub fn register(&mut self, event: Event) -> Option<Arc<Event>> {
        let id = event.id.clone();
        let trigger = event.trigger.clone();
        let previous = self.events.insert(id.clone(), Arc::new(event));

        if self.dedupe {
            if let Some(old) = &previous {
                if old.trigger == trigger {
                    return previous;
                }
                self.remove_from_index(&old.trigger, &id);
            }
        }

        self.by_trigger.entry(trigger).or_default().push(id);
        previous
    }

    /// Remove an event and all of its index entries.
    pub fn unregister(&mut self, event_id: &str) -> Option<Arc<Event>> {
        let removed = self.events.remove(event_id)?;
        self.remove_from_index(&removed.trigger, event_id);
        Some(removed)
    }

    fn remove_from_index(&mut self, trigger: &str, event_id: &str) {
        if let Some(ids) = self.by_trigger.get_mut(trigger) {
            ids.retain(|id| id != event_id);
            if ids.is_empty() {
                self.by_trigger.remove(trigger);
            }
        }
    }

    #[must_use]
    pub fn get(&self, event_id: &str) -> Option<&Arc<Event>> {
        self.events.get(event_id)
    }

    /// Event ids listening for a trigger, in scan order.
    #[must_use]
    pub fn events_for_trigger(&self, trigger: &str) -> &[String] {
        self.by_trigger.get(trigger).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate all registered definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Event>> {
        self.events.values()
    }
}

/// Runtime flags: which events are disabled and which have fired.
#[derive(Clone, Debug, Default)]
pub struct EventFlags {
    disabled: FxHashSet<String>,
    occurred: FxHashSet<String>,
}

impl EventFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, event_id: &str) {
        self.disabled.remove(event_id);
    }

    pub fn disable(&mut self, event_id: &str) {
        self.disabled.insert(event_id.to_string());
    }

    #[must_use]
    pub fn is_enabled(&self, event_id: &str) -> bool {
        !self.disabled.contains(event_id)
    }

    #[must_use]
    pub fn has_occurred(&self, event_id: &str) -> bool {
        self.occurred.contains(event_id)
    }

    pub fn mark_occurred(&mut self, event_id: &str) {
        self.occurred.insert(event_id.to_string());
    }

    /// The set of fired event ids.
    #[must_use]
    pub fn occurred(&self) -> &FxHashSet<String> {
        &self.occurred
    }

    /// Forget everything: all events enabled, none occurred.
    pub fn clear(&mut self) {
        self.disabled.clear();
        self.occurred.clear();
    }
}
