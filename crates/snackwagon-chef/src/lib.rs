//! Special-dish and narrative-event generation for the snack wagon.
//!
//! The run controller asks this crate for one special dish before each
//! day and, sometimes, one narrative event after it. Both calls are
//! async, resolve exactly once, and are guaranteed to return a valid
//! value: backend failures and malformed responses are swallowed at this
//! boundary and replaced with documented fallback literals, so the game
//! plays identically offline.

pub mod error;
pub mod generate;
pub mod llm;

pub use error::ChefError;
pub use generate::{Chef, fallback_special, quiet_day, sudden_rain};
pub use llm::{BackendKind, BackendSettings, ChefBackend};
