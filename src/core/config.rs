//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the engine's own RNG when no random source is injected.
    /// Same seed produces identical runs.
    pub seed: u64,

    /// Whether re-registering an event id replaces its trigger-index entry
    /// (`true`) or appends a second entry next to the stale one (`false`).
    pub dedupe_reregistration: bool,

    /// Upper bound on triggers processed by one
    /// `process_pending_triggers` call. Stops runaway trigger chains.
    pub max_triggers_per_run: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dedupe_reregistration: true,
            max_triggers_per_run: 1_000,
        }
    }
}

impl EngineConfig {
    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom re-registration policy.
    #[must_use]
    pub fn with_dedupe_reregistration(mut self, dedupe: bool) -> Self {
        self.dedupe_reregistration = dedupe;
        self
    }

    /// Create a new config with a custom run cap.
    #[must_use]
    pub fn with_max_triggers_per_run(mut self, max: usize) -> Self {
        self.max_triggers_per_run = max;
        self
    }
}
