//! The embedded expression language.
//!
//! A small, side-effect-free language for event conditions and action
//! parameters: arithmetic, comparison, logical operators and a closed set of
//! game-query builtins. There is no way to define functions, assign
//! variables or loop.
//!
//! ## Key Components
//!
//! - [`tokenize`]: source string to [`Token`] stream
//! - [`evaluate`]: precedence-climbing interpreter producing a [`Value`]
//! - [`QueryContext`]: read-only view of the game the builtins consult
//! - [`ExprError`]: lex, syntax and evaluation failures
//!
//! ## Precedence (higher binds tighter)
//!
//! | level | operators |
//! |---|---|
//! | 1 | `\|\|` |
//! | 2 | `&&` |
//! | 3 | `===` `!==` |
//! | 4 | `<` `>` `<=` `>=` |
//! | 5 | `+` `-` |
//! | 6 | `*` `/` `%` |
//! | 7 | unary `!` `-` |
//!
//! ## Builtins
//!
//! `itemCount(item)`, `hasStatus(status)`, `randi(max)`, `min(a, b)`,
//! `max(a, b)`, `floor(x)`, `clip(x, lo, hi)`, `eventOccurred(id)`,
//! `getAttributeValue(name)`.

mod builtins;
mod error;
mod interpreter;
mod token;
mod value;

pub use error::{ErrorKind, ExprError};
pub use interpreter::evaluate;
pub use token::{tokenize, Operator, Token, TokenKind};
pub use value::Value;

use crate::core::{ValueStore, VariableStore};

/// Read-only game queries available to expressions.
pub trait QueryContext {
    /// Numeric variable value; unset variables read as 0.
    fn variable(&self, name: &str) -> f64;

    /// Inventory count of an item.
    fn count_of(&self, item: &str) -> i64;

    /// Is a status active?
    fn status_active(&self, status: &str) -> bool;

    /// Has the named event fired since the last reset?
    fn event_occurred(&self, _event_id: &str) -> bool {
        false
    }
}

/// A context where every query returns its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyContext;

impl QueryContext for EmptyContext {
    fn variable(&self, _name: &str) -> f64 {
        0.0
    }

    fn count_of(&self, _item: &str) -> i64 {
        0
    }

    fn status_active(&self, _status: &str) -> bool {
        false
    }
}

impl QueryContext for VariableStore {
    fn variable(&self, name: &str) -> f64 {
        self.var(name).unwrap_or(0.0)
    }

    fn count_of(&self, item: &str) -> i64 {
        self.item_count(item)
    }

    fn status_active(&self, status: &str) -> bool {
        self.has_status(status)
    }
}
