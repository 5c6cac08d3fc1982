//! # quest-rules
//!
//! A data-driven event engine for narrative simulation games.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven**: Events, conditions and actions are plain data.
//!    Games load them from whatever format they like and register them.
//!
//! 2. **Deferred Triggers**: Emitting a trigger only queues a signal. The
//!    engine resolves which events respond when the signal is popped.
//!
//! 3. **Injected Randomness**: Every probability gate and `randi(...)` draws
//!    from a [`RandomSource`] owned by the engine, so seeded runs replay
//!    exactly.
//!
//! ## Modules
//!
//! - `core`: RNG, parameter values, value store, configuration
//! - `expr`: The condition expression language
//! - `events`: Event definitions, trigger queue, registry and dispatcher
//! - `error`: Engine errors

pub mod core;
pub mod error;
pub mod events;
pub mod expr;

// Re-export commonly used types
pub use crate::core::{
    roll, EngineConfig, FixedRandom, GameRng, ParamValue, Params, RandomSource,
    SequenceRandom, ValueStore, VariableStore,
};

pub use crate::error::{EngineError, Result};

pub use crate::events::{
    ActionContext, ActionExecution, ActionHandler, ActionResult, Condition, Event, EventAction,
    EventEngine, EventFlags, EventRegistry, HandlerTable, TriggerEntry, TriggerQueue,
};

pub use crate::expr::{evaluate, EmptyContext, ErrorKind, ExprError, QueryContext, Value};
