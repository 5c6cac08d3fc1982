//! The event engine: trigger queue, registry and dispatcher in one place.
//!
//! The engine advances only when the host calls it. A typical game loop:
//!
//! ```
//! use quest_rules::core::EngineConfig;
//! use quest_rules::events::{ActionContext, Event, EventAction, EventEngine};
//!
//! let mut engine: EventEngine = EventEngine::from_config(EngineConfig::default());
//! engine.register_action_fn("Say", |action: &EventAction, ctx: &mut ActionContext<'_>| {
//!     ctx.display_message(action.text("message", ""));
//! });
//! engine
//!     .register_event(
//!         Event::new("Intro", "GameStart")
//!             .with_action(EventAction::new("Say").with_param("message", "Welcome"))
//!             .once(),
//!     )
//!     .unwrap();
//!
//! engine.trigger("GameStart", 1.0, 0).unwrap();
//! let waiting = engine.process_next_trigger().unwrap();
//! assert_eq!(waiting.pending_message(), Some("Welcome"));
//!
//! let done = engine.continue_event(waiting, None);
//! assert!(!done.is_waiting());
//! assert!(engine.has_event_occurred("Intro"));
//! ```

use std::sync::Arc;

use crate::core::{roll, EngineConfig, GameRng, RandomSource, ValueStore, VariableStore};
use crate::error::{check_probability, Result};
use crate::expr::{ExprError, Value};

use super::context::{ActionContext, ActionExecution, EngineQuery};
use super::event::{Event, EventAction};
use super::handler::{ActionHandler, HandlerTable};
use super::queue::TriggerQueue;
use super::registry::{EventFlags, EventRegistry};

/// Data-driven event engine over a value store `S`.
///
/// Each engine owns its queue, registry, flags, store and random source.
/// Hosting several sessions means building several engines.
pub struct EventEngine<S: ValueStore = VariableStore> {
    config: EngineConfig,
    store: S,
    rng: Box<dyn RandomSource>,
    queue: TriggerQueue,
    registry: EventRegistry,
    flags: EventFlags,
    handlers: HandlerTable,
}

impl<S: ValueStore> EventEngine<S> {
    /// Create an engine with an injected random source and default config.
    pub fn new(store: S, rng: impl RandomSource + 'static) -> Self {
        Self::build(store, Box::new(rng), EngineConfig::default())
    }

    /// Create an engine seeded from `config`.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::build(store, Box::new(rng), config)
    }

    /// Create an engine with both an injected random source and a config.
    /// The config seed is ignored.
    pub fn with_config_and_rng(
        store: S,
        config: EngineConfig,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self::build(store, Box::new(rng), config)
    }

    fn build(store: S, rng: Box<dyn RandomSource>, config: EngineConfig) -> Self {
        Self {
            registry: EventRegistry::new(config.dedupe_reregistration),
            config,
            store,
            rng,
            queue: TriggerQueue::new(),
            flags: EventFlags::new(),
            handlers: HandlerTable::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Triggers ===

    /// Queue a trigger signal. Nothing is evaluated until it is popped.
    pub fn trigger(&mut self, trigger_id: &str, probability: f64, priority: i32) -> Result<()> {
        let sequence = self.queue.enqueue(trigger_id, probability, priority)?;
        log::trace!("queued trigger '{trigger_id}' (priority {priority}, sequence {sequence})");
        Ok(())
    }

    #[must_use]
    pub fn has_pending_triggers(&self) -> bool {
        !self.queue.is_empty()
    }

    #[must_use]
    pub fn pending_trigger_count(&self) -> usize {
        self.queue.len()
    }

    /// Pop one trigger and fire every qualifying event for it.
    ///
    /// Returns the execution of the first event that waits for input; the
    /// rest of that trigger's events are not scanned. Returns `None` if the
    /// queue was empty or nothing waited.
    pub fn process_next_trigger(&mut self) -> Option<ActionExecution> {
        let entry = self.queue.pop()?;
        log::debug!("processing trigger '{}'", entry.trigger_id);

        if !roll(&mut *self.rng, entry.probability) {
            log::trace!("trigger '{}' failed its probability gate", entry.trigger_id);
            return None;
        }

        let event_ids = self.registry.events_for_trigger(&entry.trigger_id).to_vec();
        for event_id in event_ids {
            let Some(event) = self.registry.get(&event_id).map(Arc::clone) else {
                continue;
            };
            if !self.should_fire(&event) {
                continue;
            }

            let execution = self.fire(event);
            if execution.is_waiting() {
                return Some(execution);
            }
        }
        None
    }

    fn should_fire(&mut self, event: &Event) -> bool {
        if !self.flags.is_enabled(&event.id) {
            log::trace!("event '{}' skipped: disabled", event.id);
            return false;
        }
        if event.once && self.flags.has_occurred(&event.id) {
            log::trace!("event '{}' skipped: already fired", event.id);
            return false;
        }

        let query = EngineQuery {
            store: &self.store,
            flags: &self.flags,
        };
        if !event.conditions_hold(&query, &mut *self.rng) {
            log::trace!("event '{}' skipped: conditions not met", event.id);
            return false;
        }
        if !roll(&mut *self.rng, event.probability) {
            log::trace!("event '{}' skipped: probability gate", event.id);
            return false;
        }
        true
    }

    fn fire(&mut self, event: Arc<Event>) -> ActionExecution {
        log::debug!("firing event '{}'", event.id);
        let mut execution = ActionExecution::new(Arc::clone(&event));
        self.run_actions(&mut execution);

        self.flags.mark_occurred(&event.id);
        for excluded in &event.exclusions {
            self.flags.disable(excluded);
        }
        if event.once {
            self.flags.disable(&event.id);
        }
        execution
    }

    fn run_actions(&mut self, execution: &mut ActionExecution) {
        let mut ctx = ActionContext::new(
            execution,
            &mut self.store,
            &mut *self.rng,
            &mut self.queue,
            &mut self.flags,
            &self.handlers,
        );
        ctx.run();
    }

    /// Resume a waiting execution with the host's choice.
    ///
    /// Runs from the action after the one that waited. An execution that is
    /// not waiting is returned untouched.
    pub fn continue_event(
        &mut self,
        mut execution: ActionExecution,
        choice: Option<usize>,
    ) -> ActionExecution {
        if !execution.is_waiting() {
            log::warn!(
                "continue_event called for event '{}' which is not waiting",
                execution.event_id()
            );
            return execution;
        }

        log::debug!(
            "resuming event '{}' at action {} with choice {:?}",
            execution.event_id(),
            execution.next_action_index(),
            choice
        );
        execution.resume(choice);
        self.run_actions(&mut execution);
        execution
    }

    /// Process triggers until one waits, the queue drains, or the configured
    /// cap is hit.
    pub fn process_pending_triggers(&mut self) -> Option<ActionExecution> {
        for _ in 0..self.config.max_triggers_per_run {
            if self.queue.is_empty() {
                return None;
            }
            if let Some(execution) = self.process_next_trigger() {
                return Some(execution);
            }
        }
        if !self.queue.is_empty() {
            log::warn!(
                "stopped after {} triggers with {} still pending",
                self.config.max_triggers_per_run,
                self.queue.len()
            );
        }
        None
    }

    // === Registration ===

    /// Register an event definition. Re-registering an id replaces it,
    /// including its enabled state.
    pub fn register_event(&mut self, event: Event) -> Result<()> {
        check_probability(&format!("event '{}'", event.id), event.probability)?;
        let id = event.id.clone();
        let enabled = event.enabled;
        log::debug!("registered event '{}' on trigger '{}'", id, event.trigger);

        let replaced = self.registry.register(event).is_some();
        if !enabled {
            self.flags.disable(&id);
        } else if replaced {
            self.flags.enable(&id);
        }
        Ok(())
    }

    /// Remove an event definition and its index entries.
    pub fn unregister_event(&mut self, event_id: &str) -> Option<Event> {
        let removed = self.registry.unregister(event_id)?;
        self.flags.enable(event_id);
        Some(Arc::unwrap_or_clone(removed))
    }

    /// Register the handler for an action id.
    pub fn register_action_handler(
        &mut self,
        action_id: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) {
        self.handlers.insert(action_id, Box::new(handler));
    }

    /// Register a closure as the handler for an action id.
    pub fn register_action_fn<F>(&mut self, action_id: impl Into<String>, handler: F)
    where
        F: Fn(&EventAction, &mut ActionContext<'_>) + 'static,
    {
        self.handlers.insert(action_id, Box::new(handler));
    }

    #[must_use]
    pub fn get_event(&self, event_id: &str) -> Option<&Event> {
        self.registry.get(event_id).map(AsRef::as_ref)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.registry.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.registry.len()
    }

    // === Runtime flags ===

    pub fn enable_event(&mut self, event_id: &str) {
        self.flags.enable(event_id);
    }

    pub fn disable_event(&mut self, event_id: &str) {
        self.flags.disable(event_id);
    }

    #[must_use]
    pub fn is_event_enabled(&self, event_id: &str) -> bool {
        self.flags.is_enabled(event_id)
    }

    #[must_use]
    pub fn has_event_occurred(&self, event_id: &str) -> bool {
        self.flags.has_occurred(event_id)
    }

    /// Start a new game: every event enabled, nothing occurred, queue empty.
    /// Registrations, handlers and the store are kept.
    pub fn reset(&mut self) {
        log::debug!("resetting engine state");
        self.flags.clear();
        self.queue.clear();
    }

    // === Store ===

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Evaluate an expression against the store and fired-event set.
    pub fn evaluate(&mut self, expression: &str) -> std::result::Result<Value, ExprError> {
        let query = EngineQuery {
            store: &self.store,
            flags: &self.flags,
        };
        crate::expr::evaluate(expression, &query, &mut *self.rng)
    }
}

impl<S: ValueStore + Default> EventEngine<S> {
    /// Create an engine with an empty store seeded from `config`.
    pub fn from_config(config: EngineConfig) -> Self {
        Self::with_config(S::default(), config)
    }
}

impl<S: ValueStore + Default> Default for EventEngine<S> {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

impl<S: ValueStore + std::fmt::Debug> std::fmt::Debug for EventEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEngine")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("pending", &self.queue.len())
            .field("events", &self.registry.len())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
