//! Per-firing action execution.
//!
//! An [`ActionExecution`] is the state machine for one event run:
//! `Continue` keeps going, `Stop` aborts the remaining actions, `Wait`
//! suspends until the host supplies input. It records the index of the next
//! action so a resumed run picks up exactly after the action that waited.
//!
//! [`ActionContext`] is what handlers see while an action runs: the
//! execution plus mutable access to the engine's store, randomness, queue
//! and event flags.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ParamValue, RandomSource, ValueStore};
use crate::error::Result;
use crate::expr::{evaluate, ExprError, QueryContext, Value};

use super::event::{Event, EventAction};
use super::handler::HandlerTable;
use super::queue::TriggerQueue;
use super::registry::EventFlags;

/// State of an event run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionResult {
    #[default]
    Continue,
    Stop,
    Wait,
}

/// The state of one event firing, handed back to the host while waiting.
#[derive(Clone, Debug)]
pub struct ActionExecution {
    event: Arc<Event>,
    result: ActionResult,
    pending_message: Option<String>,
    pending_choices: Vec<ParamValue>,
    user_choice: Option<usize>,
    next_action: usize,
}

impl ActionExecution {
    pub(crate) fn new(event: Arc<Event>) -> Self {
        Self {
            event,
            result: ActionResult::Continue,
            pending_message: None,
            pending_choices: Vec::new(),
            user_choice: None,
            next_action: 0,
        }
    }

    /// The event being run.
    #[must_use]
    pub fn event(&self) -> &Event {
        &self.event
    }

    #[must_use]
    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    #[must_use]
    pub fn result(&self) -> ActionResult {
        self.result
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.result == ActionResult::Wait
    }

    /// Message to show the player while waiting.
    #[must_use]
    pub fn pending_message(&self) -> Option<&str> {
        self.pending_message.as_deref()
    }

    /// Choice descriptors to offer while waiting. Empty for plain messages.
    #[must_use]
    pub fn pending_choices(&self) -> &[ParamValue] {
        &self.pending_choices
    }

    /// The choice supplied on the last resume.
    #[must_use]
    pub fn user_choice(&self) -> Option<usize> {
        self.user_choice
    }

    /// Index of the next action to run.
    #[must_use]
    pub fn next_action_index(&self) -> usize {
        self.next_action
    }

    /// Actions not yet executed.
    #[must_use]
    pub fn remaining_actions(&self) -> &[EventAction] {
        self.event.actions.get(self.next_action..).unwrap_or(&[])
    }

    pub(crate) fn resume(&mut self, choice: Option<usize>) {
        self.user_choice = choice;
        self.pending_message = None;
        self.pending_choices.clear();
        self.result = ActionResult::Continue;
    }
}

/// Read-only view of engine state for expressions.
pub(crate) struct EngineQuery<'a> {
    pub(crate) store: &'a dyn ValueStore,
    pub(crate) flags: &'a EventFlags,
}

impl QueryContext for EngineQuery<'_> {
    fn variable(&self, name: &str) -> f64 {
        self.store.var(name).unwrap_or(0.0)
    }

    fn count_of(&self, item: &str) -> i64 {
        self.store.item_count(item)
    }

    fn status_active(&self, status: &str) -> bool {
        self.store.has_status(status)
    }

    fn event_occurred(&self, event_id: &str) -> bool {
        self.flags.has_occurred(event_id)
    }
}

/// Capabilities available to a handler while its action runs.
pub struct ActionContext<'a> {
    execution: &'a mut ActionExecution,
    store: &'a mut dyn ValueStore,
    rng: &'a mut dyn RandomSource,
    queue: &'a mut TriggerQueue,
    flags: &'a mut EventFlags,
    handlers: &'a HandlerTable,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        execution: &'a mut ActionExecution,
        store: &'a mut dyn ValueStore,
        rng: &'a mut dyn RandomSource,
        queue: &'a mut TriggerQueue,
        flags: &'a mut EventFlags,
        handlers: &'a HandlerTable,
    ) -> Self {
        Self {
            execution,
            store,
            rng,
            queue,
            flags,
            handlers,
        }
    }

    /// Run actions from the resume point until the list ends, a handler
    /// stops the event, or a handler asks to wait.
    pub(crate) fn run(&mut self) {
        let event = Arc::clone(&self.execution.event);
        while let Some(action) = event.actions.get(self.execution.next_action) {
            if self.execution.result == ActionResult::Stop {
                break;
            }
            self.execution.next_action += 1;
            self.dispatch(action);
            if self.execution.result == ActionResult::Wait {
                log::debug!(
                    "event '{}' waiting after action {} ('{}')",
                    event.id,
                    self.execution.next_action - 1,
                    action.id
                );
                return;
            }
        }
    }

    /// Suspend the event and show a message.
    pub fn display_message(&mut self, message: impl Into<String>) {
        self.execution.pending_message = Some(message.into());
        self.execution.result = ActionResult::Wait;
    }

    /// Suspend the event and offer choices. The host resumes with the
    /// selected index.
    pub fn display_choices(&mut self, message: Option<String>, choices: Vec<ParamValue>) {
        self.execution.pending_message = message;
        self.execution.pending_choices = choices;
        self.execution.result = ActionResult::Wait;
    }

    /// Abort the remaining actions of this run.
    pub fn stop_event(&mut self) {
        self.execution.result = ActionResult::Stop;
    }

    /// Choice supplied when the event was last resumed.
    #[must_use]
    pub fn user_choice(&self) -> Option<usize> {
        self.execution.user_choice
    }

    #[must_use]
    pub fn event(&self) -> &Event {
        self.execution.event()
    }

    #[must_use]
    pub fn result(&self) -> ActionResult {
        self.execution.result
    }

    #[must_use]
    pub fn store(&self) -> &dyn ValueStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn ValueStore {
        &mut *self.store
    }

    /// Draw a uniform value in `[0, 1)` from the engine's source.
    pub fn random(&mut self) -> f64 {
        self.rng.next_f64()
    }

    /// Evaluate an expression against the engine's current state.
    pub fn evaluate(&mut self, expression: &str) -> std::result::Result<Value, ExprError> {
        let query = EngineQuery {
            store: &*self.store,
            flags: &*self.flags,
        };
        evaluate(expression, &query, &mut *self.rng)
    }

    /// Queue a follow-up trigger. It runs on a later pop, never inline.
    pub fn trigger(&mut self, trigger_id: &str, probability: f64, priority: i32) -> Result<u64> {
        self.queue.enqueue(trigger_id, probability, priority)
    }

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

    /// Run another action through the handler table, for composite actions.
    /// Returns `false` if no handler is registered for it.
    pub fn dispatch(&mut self, action: &EventAction) -> bool {
        let handlers = self.handlers;
        handlers.dispatch(action, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedRandom, VariableStore};

    struct Harness {
        store: VariableStore,
        rng: FixedRandom,
        queue: TriggerQueue,
        flags: EventFlags,
        handlers: HandlerTable,
    }

    impl Harness {
        fn new() -> Self {
            let mut handlers = HandlerTable::new();
            handlers.insert(
                "Add",
                Box::new(|action: &EventAction, ctx: &mut ActionContext<'_>| {
                    let var = action.text("var", "x").to_string();
                    ctx.store_mut().add_var(&var, action.number("by", 1.0));
                }),
            );
            handlers.insert(
                "Message",
                Box::new(|action: &EventAction, ctx: &mut ActionContext<'_>| {
                    ctx.display_message(action.text("message", ""));
                }),
            );
            handlers.insert(
                "Stop",
                Box::new(|_: &EventAction, ctx: &mut ActionContext<'_>| ctx.stop_event()),
            );
            Self {
                store: VariableStore::new(),
                rng: FixedRandom(0.5),
                queue: TriggerQueue::new(),
                flags: EventFlags::new(),
                handlers,
            }
        }

        fn run(&mut self, execution: &mut ActionExecution) {
            let mut ctx = ActionContext::new(
                execution,
                &mut self.store,
                &mut self.rng,
                &mut self.queue,
                &mut self.flags,
                &self.handlers,
            );
            ctx.run();
        }
    }

    fn add(by: f64) -> EventAction {
        EventAction::new("Add").with_param("by", by)
    }

    #[test]
    fn test_runs_all_actions() {
        let mut harness = Harness::new();
        let event = Event::new("E", "T").with_action(add(1.0)).with_action(add(2.0));
        let mut execution = ActionExecution::new(Arc::new(event));

        harness.run(&mut execution);

        assert_eq!(harness.store.var("x"), Some(3.0));
        assert_eq!(execution.result(), ActionResult::Continue);
        assert!(execution.remaining_actions().is_empty());
    }

    #[test]
    fn test_stop_skips_rest() {
        let mut harness = Harness::new();
        let event = Event::new("E", "T")
            .with_action(add(1.0))
            .with_action(EventAction::new("Stop"))
            .with_action(add(10.0));
        let mut execution = ActionExecution::new(Arc::new(event));

        harness.run(&mut execution);

        assert_eq!(harness.store.var("x"), Some(1.0));
        assert_eq!(execution.result(), ActionResult::Stop);
    }

    #[test]
    fn test_wait_then_resume() {
        let mut harness = Harness::new();
        let event = Event::new("E", "T")
            .with_action(add(1.0))
            .with_action(EventAction::new("Message").with_param("message", "Hello"))
            .with_action(add(5.0));
        let mut execution = ActionExecution::new(Arc::new(event));

        harness.run(&mut execution);
        assert!(execution.is_waiting());
        assert_eq!(execution.pending_message(), Some("Hello"));
        assert_eq!(execution.next_action_index(), 2);
        assert_eq!(execution.remaining_actions().len(), 1);
        assert_eq!(harness.store.var("x"), Some(1.0));

        execution.resume(Some(0));
        harness.run(&mut execution);
        assert_eq!(harness.store.var("x"), Some(6.0));
        assert_eq!(execution.pending_message(), None);
        assert_eq!(execution.user_choice(), Some(0));
        assert!(!execution.is_waiting());
    }

    #[test]
    fn test_unregistered_action_skipped() {
        let mut harness = Harness::new();
        let event = Event::new("E", "T")
            .with_action(EventAction::new("Nope"))
            .with_action(add(1.0));
        let mut execution = ActionExecution::new(Arc::new(event));

        harness.run(&mut execution);

        assert_eq!(harness.store.var("x"), Some(1.0));
    }

    #[test]
    fn test_context_capabilities() {
        let mut harness = Harness::new();
        harness.store.set_var("gold", 12.0);
        harness.flags.mark_occurred("Intro");
        let mut execution = ActionExecution::new(Arc::new(Event::new("E", "T")));
        let mut ctx = ActionContext::new(
            &mut execution,
            &mut harness.store,
            &mut harness.rng,
            &mut harness.queue,
            &mut harness.flags,
            &harness.handlers,
        );

        assert_eq!(ctx.evaluate("gold * 2"), Ok(Value::Number(24.0)));
        assert_eq!(ctx.evaluate("eventOccurred('Intro')"), Ok(Value::Bool(true)));
        assert_eq!(ctx.random(), 0.5);
        assert!(ctx.trigger("Later", 1.0, 0).is_ok());
        ctx.disable_event("Other");
        assert!(!ctx.is_event_enabled("Other"));
        assert!(ctx.dispatch(&add(3.0)));
        assert!(!ctx.dispatch(&EventAction::new("Nope")));
        assert_eq!(ctx.store().var("x"), Some(3.0));

        assert_eq!(harness.queue.len(), 1);
    }
}
