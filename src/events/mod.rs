//! Data-driven event system.
//!
//! Game code emits named triggers; events registered against a trigger
//! fire when their conditions hold and their probability gate passes.
//! Each firing runs the event's actions through host-registered handlers,
//! and a handler may suspend the run to wait for player input.
//!
//! ## Key Components
//!
//! - [`Event`], [`EventAction`], [`Condition`]: immutable definitions
//! - [`TriggerQueue`]: pending trigger signals, priority then FIFO
//! - [`EventRegistry`] / [`EventFlags`]: definitions and runtime state
//! - [`ActionHandler`] / [`HandlerTable`]: the host's action capabilities
//! - [`ActionExecution`] / [`ActionContext`]: one event run and what its
//!   handlers may touch
//! - [`EventEngine`]: the dispatcher tying them together
//!
//! ## Flow
//!
//! 1. `trigger("MonthBegin", 1.0, 0)` queues a signal. Nothing runs yet.
//! 2. `process_next_trigger()` pops the signal, scans the trigger's events
//!    in registration order and fires each one that qualifies.
//! 3. If a handler waits, the execution comes back to the host, which shows
//!    the message or choices and later calls `continue_event`.

mod context;
mod engine;
mod event;
mod handler;
mod queue;
mod registry;

pub use context::{ActionContext, ActionExecution, ActionResult};
pub use engine::EventEngine;
pub use event::{Condition, Event, EventAction};
pub use handler::{ActionHandler, HandlerTable};
pub use queue::{TriggerEntry, TriggerQueue};
pub use registry::{EventFlags, EventRegistry};
