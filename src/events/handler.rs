//! Action handler capabilities.
//!
//! Actions are opaque to the dispatcher: each action id names a handler
//! registered by the host game. Unregistered ids are skipped without error.

use rustc_hash::FxHashMap;

use super::context::ActionContext;
use super::event::EventAction;

/// Performs one kind of action.
///
/// Handlers may suspend the running event through
/// [`ActionContext::display_message`] / [`ActionContext::display_choices`],
/// abort it with [`ActionContext::stop_event`], or leave it running.
pub trait ActionHandler {
    fn execute(&self, action: &EventAction, ctx: &mut ActionContext<'_>);
}

impl<F> ActionHandler for F
where
    F: Fn(&EventAction, &mut ActionContext<'_>),
{
    fn execute(&self, action: &EventAction, ctx: &mut ActionContext<'_>) {
        self(action, ctx);
    }
}

/// Action id to handler.
#[derive(Default)]
pub struct HandlerTable {
    handlers: FxHashMap<String, Box<dyn ActionHandler>>,
}

impl HandlerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the same id.
    pub fn insert(&mut self, action_id: impl Into<String>, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(action_id.into(), handler);
    }

    #[must_use]
    pub fn contains(&self, action_id: &str) -> bool {
        self.handlers.contains_key(action_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for `action`. Returns `false` if none is registered.
    pub fn dispatch(&self, action: &EventAction, ctx: &mut ActionContext<'_>) -> bool {
        match self.handlers.get(&action.id) {
            Some(handler) => {
                handler.execute(action, ctx);
                true
            }
            None => {
                log::debug!("no handler registered for action '{}', skipping", action.id);
                false
            }
        }
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
