//! Event definitions.
//!
//! An [`Event`] binds a bundle of [`EventAction`]s to one trigger, gated by
//! AND-ed [`Condition`]s and a probability. Definitions are immutable once
//! registered; runtime state (disabled, occurred) lives in the engine.
//!
//! Definitions deserialize with the same defaults the builders use, so a
//! loader can hand them straight from its file format to the engine.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ParamValue, Params, RandomSource};
use crate::expr::{evaluate, QueryContext};

/// A boolean expression gating an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Label for debugging.
    #[serde(default = "default_condition_id")]
    pub id: String,

    /// Expression source.
    #[serde(default = "default_condition_expression")]
    pub expression: String,
}

fn default_condition_id() -> String {
    "Expression".to_string()
}

fn default_condition_expression() -> String {
    "true".to_string()
}

impl Condition {
    /// Create a condition from an expression.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            id: default_condition_id(),
            expression: expression.into(),
        }
    }

    /// Set the label (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Evaluate the condition. Any evaluation failure counts as false.
    pub fn check(&self, ctx: &dyn QueryContext, rng: &mut dyn RandomSource) -> bool {
        match evaluate(&self.expression, ctx, rng) {
            Ok(value) => value.truthy(),
            Err(err) => {
                log::debug!(
                    "condition '{}' failed to evaluate ({}), treating as false: {}",
                    self.id,
                    self.expression,
                    err
                );
                false
            }
        }
    }
}

/// One step of an event: a handler id plus opaque parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventAction {
    /// Name of the handler to invoke.
    pub id: String,

    /// Handler parameters.
    #[serde(default)]
    pub params: Params,
}

impl EventAction {
    /// Create an action with no parameters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: Params::new(),
        }
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Raw parameter lookup.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Numeric parameter, or `default` if missing or not a number.
    #[must_use]
    pub fn number(&self, key: &str, default: f64) -> f64 {
        self.param(key).and_then(ParamValue::as_number).unwrap_or(default)
    }

    /// Text parameter, or `default` if missing or not text.
    #[must_use]
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).and_then(ParamValue::as_text).unwrap_or(default)
    }

    /// Boolean parameter, or `default` if missing or not a bool.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.param(key).and_then(ParamValue::as_bool).unwrap_or(default)
    }
}

/// A named, conditioned, probabilistic bundle of actions bound to one trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique key.
    pub id: String,

    /// Trigger this event listens for.
    #[serde(default = "default_trigger")]
    pub trigger: String,

    /// Actions, executed strictly in order.
    #[serde(default)]
    pub actions: Vec<EventAction>,

    /// AND-ed conditions. Empty means always satisfied.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Chance of firing once conditions pass, within `[0, 1]`.
    #[serde(default = "default_probability")]
    pub probability: f64,

    /// Fire at most once until the engine is reset.
    #[serde(default)]
    pub once: bool,

    /// Ordering hint carried for loaders and tooling. Events within one
    /// trigger are scanned in registration order regardless of this value.
    #[serde(default)]
    pub priority: i32,

    /// Events disabled when this one fires.
    #[serde(default)]
    pub exclusions: SmallVec<[String; 2]>,

    /// Initial enabled state.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_trigger() -> String {
    "Manual".to_string()
}

fn default_probability() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

impl Event {
    /// Create an event listening for `trigger`.
    pub fn new(id: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trigger: trigger.into(),
            actions: Vec::new(),
            conditions: Vec::new(),
            probability: default_probability(),
            once: false,
            priority: 0,
            exclusions: SmallVec::new(),
            enabled: default_enabled(),
        }
    }

    /// Add an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: EventAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a condition from an expression (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, expression: impl Into<String>) -> Self {
        self.conditions.push(Condition::new(expression));
        self
    }

    /// Set the probability (builder pattern).
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Mark as a once-event (builder pattern).
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Set priority (builder pattern).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Disable another event when this one fires (builder pattern).
    #[must_use]
    pub fn excludes(mut self, event_id: impl Into<String>) -> Self {
        self.exclusions.push(event_id.into());
        self
    }

    /// Start disabled (builder pattern).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check all conditions against a context (AND, short-circuiting).
    pub fn conditions_hold(&self, ctx: &dyn QueryContext, rng: &mut dyn RandomSource) -> bool {
        self.conditions.iter().all(|condition| condition.check(ctx, rng))
    }
}
