//! The numeric/item/status value store.
//!
//! The engine only consumes the [`ValueStore`] surface: the expression
//! evaluator reads through it and action handlers mutate through it. The
//! evaluator never writes. [`VariableStore`] is a complete in-memory
//! implementation with per-variable limits.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Query and mutation surface of a simulation's value store.
pub trait ValueStore {
    /// Get a numeric variable, `None` if unset.
    fn var(&self, name: &str) -> Option<f64>;

    /// Set a numeric variable. Implementations apply any configured limits.
    fn set_var(&mut self, name: &str, value: f64);

    /// Add `delta` to a variable (unset counts as 0).
    fn add_var(&mut self, name: &str, delta: f64) {
        let current = self.var(name).unwrap_or(0.0);
        self.set_var(name, current + delta);
    }

    /// Add `delta` and clamp the result into the optional bounds.
    fn add_var_clamped(&mut self, name: &str, delta: f64, min: Option<f64>, max: Option<f64>) {
        let mut value = self.var(name).unwrap_or(0.0) + delta;
        if let Some(lo) = min {
            value = value.max(lo);
        }
        if let Some(hi) = max {
            value = value.min(hi);
        }
        self.set_var(name, value);
    }

    /// Count of an item (0 if never added).
    fn item_count(&self, item: &str) -> i64;

    /// Add items. Counts never drop below zero.
    fn add_item(&mut self, item: &str, count: i64);

    /// Remove items. Returns `false` and changes nothing if there are too few.
    fn remove_item(&mut self, item: &str, count: i64) -> bool;

    /// Is a status active?
    fn has_status(&self, status: &str) -> bool;

    /// Activate a status.
    fn add_status(&mut self, status: &str);

    /// Deactivate a status.
    fn remove_status(&mut self, status: &str);
}

/// In-memory value store.
///
/// ## Example
///
/// ```
/// use quest_rules::core::{ValueStore, VariableStore};
///
/// let mut store = VariableStore::new();
/// store.set_limits("player.hope", 0.0, 100.0);
/// store.set_var("player.hope", 140.0);
/// assert_eq!(store.var("player.hope"), Some(100.0));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VariableStore {
    vars: FxHashMap<String, f64>,
    limits: FxHashMap<String, (f64, f64)>,
    items: FxHashMap<String, i64>,
    status: FxHashSet<String>,
}

impl VariableStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `[min, max]` limits for a variable, re-clamping any current value.
    pub fn set_limits(&mut self, name: &str, min: f64, max: f64) {
        self.limits.insert(name.to_string(), (min, max));
        if let Some(&current) = self.vars.get(name) {
            self.set_var(name, current);
        }
    }

    /// Limits configured for a variable.
    #[must_use]
    pub fn limits(&self, name: &str) -> Option<(f64, f64)> {
        self.limits.get(name).copied()
    }

    /// Is the variable set?
    #[must_use]
    pub fn has_var(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// All items with a non-zero count.
    pub fn items(&self) -> impl Iterator<Item = (&str, i64)> {
        self.items
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, &count)| (name.as_str(), count))
    }

    /// All active statuses.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.status.iter().map(String::as_str)
    }

    /// Clear values, items and statuses. Limits are part of the rules and stay.
    pub fn reset(&mut self) {
        self.vars.clear();
        self.items.clear();
        self.status.clear();
    }
}

impl ValueStore for VariableStore {
    fn var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    fn set_var(&mut self, name: &str, value: f64) {
        let value = match self.limits.get(name) {
            Some(&(lo, hi)) => value.max(lo).min(hi),
            None => value,
        };
        self.vars.insert(name.to_string(), value);
    }

    fn item_count(&self, item: &str) -> i64 {
        self.items.get(item).copied().unwrap_or(0)
    }

    fn add_item(&mut self, item: &str, count: i64) {
        let entry = self.items.entry(item.to_string()).or_insert(0);
        *entry = entry.saturating_add(count).max(0);
    }

    fn remove_item(&mut self, item: &str, count: i64) -> bool {
        if self.item_count(item) < count {
            return false;
        }
        self.add_item(item, count.saturating_neg());
        true
    }

    fn has_status(&self, status: &str) -> bool {
        self.status.contains(status)
    }

    fn add_status(&mut self, status: &str) {
        self.status.insert(status.to_string());
    }

    fn remove_status(&mut self, status: &str) {
        self.status.remove(status);
    }
}
