//! Shared type definitions for the Snack Wagon service-loop engine.
//!
//! This crate holds the data model every other crate agrees on: typed
//! identifiers, dishes and menus, customers, biomes, narrative events with
//! their state patches, and the day settlement. It carries no simulation
//! logic beyond small pure helpers (tip math, patience decay) that belong
//! with their data.

pub mod biome;
pub mod customer;
pub mod dish;
pub mod event;
pub mod ids;
pub mod outcome;

pub use biome::{Biome, BiomeKind};
pub use customer::{Customer, SPECIES, tip_multiplier_for_decor};
pub use dish::{Dish, Menu};
pub use event::{EventChoice, RandomEvent, StatePatch};
pub use ids::{CustomerId, DishId, EventId};
pub use outcome::{DayEndReason, Settlement};
