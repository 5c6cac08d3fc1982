//! Core engine types: randomness, parameter values, the value store, configuration.
//!
//! Everything here is independent of the expression language and the
//! dispatcher; both build on these pieces.

pub mod rng;
pub mod value;
pub mod store;
pub mod config;

pub use rng::{roll, FixedRandom, GameRng, RandomSource, SequenceRandom};
pub use value::{ParamValue, Params};
pub use store::{ValueStore, VariableStore};
pub use config::EngineConfig;
