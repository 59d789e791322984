//! The service-loop engine for the traveling snack wagon.
//!
//! One day of service is a tick-driven simulation: customers arrive,
//! their patience decays, and the player cooks, serves, or trashes
//! dishes against a single-slot station until the clock or their stamina
//! runs out. This crate owns that loop end to end:
//!
//! - [`config`] — typed YAML configuration with named tuning presets
//! - [`clock`] — wall-clock day timing
//! - [`station`] — the cook/serve/trash state machine
//! - [`service`] — the per-tick day state: spawning, decay, actions,
//!   settlement
//! - [`driver`] — the async single-writer task wrapping a day
//! - [`run`] — meta-progression carried across days
//!
//! Everything temporal measures wall-clock instants rather than counting
//! ticks, so behavior stays correct at any frame cadence.

pub mod clock;
pub mod config;
pub mod driver;
pub mod run;
pub mod service;
pub mod station;

pub use clock::DayClock;
pub use config::{ConfigError, RunConfig, ServiceConfig, ServicePreset, WagonConfig};
pub use driver::{DayResult, DaySnapshot, StallCommand, run_service_day};
pub use run::{DayRecord, RunOutcome, RunState, Upgrade};
pub use service::{ActionOutcome, DaySetup, RejectReason, ServiceDay, TickReport};
pub use station::Station;
