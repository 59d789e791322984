//! Biomes: the themed routes a day of service can take place in.
//!
//! A biome is a static descriptor selected once per day before the
//! service loop starts. Its difficulty (1-5) linearly scales the patience
//! decay rate during service.

use serde::{Deserialize, Serialize};

/// The kinds of biome the wagon can travel to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BiomeKind {
    /// Calm woodland routes.
    Forest,
    /// Busy urban stops.
    Town,
    /// Harsh, hot routes.
    Desert,
    /// Cold mountain passes.
    Snow,
}

impl core::fmt::Display for BiomeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Forest => "Forest",
            Self::Town => "Town",
            Self::Desert => "Desert",
            Self::Snow => "Snow",
        };
        write!(f, "{name}")
    }
}

/// A themed route descriptor, fixed for one day of service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biome {
    /// Which kind of biome this is.
    pub kind: BiomeKind,
    /// Display name of the route.
    pub name: String,
    /// Short flavor text.
    pub description: String,
    /// Difficulty from 1 (easy) to 5; scales patience decay linearly.
    pub difficulty: u32,
    /// Weather label shown on the route card.
    pub weather: String,
}

impl Biome {
    fn new(kind: BiomeKind, name: &str, description: &str, difficulty: u32, weather: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            description: description.to_owned(),
            difficulty,
            weather: weather.to_owned(),
        }
    }
}

/// The full catalog of routes the wagon knows about.
pub fn catalog() -> Vec<Biome> {
    vec![
        Biome::new(
            BiomeKind::Forest,
            "Whispering Woods",
            "A path less traveled. Good opportunities for sales.",
            1,
            "Clear",
        ),
        Biome::new(
            BiomeKind::Town,
            "Catnip City",
            "Crowded streets and hungry regulars.",
            2,
            "Crowded",
        ),
        Biome::new(
            BiomeKind::Desert,
            "Sunbaked Dunes",
            "Scorching sands; customers run short on patience.",
            3,
            "Heatwave",
        ),
        Biome::new(
            BiomeKind::Snow,
            "Frosty Peaks",
            "Icy winds and icier tempers.",
            4,
            "Blizzard",
        ),
    ]
}
