//! Narrative events and the state patches they produce.
//!
//! Events come from the external generator after a day settles. A choice
//! is pure data: a [`StatePatch`] of clamped deltas that the run
//! controller applies to gold, stamina, and reputation. The service core
//! never applies patches itself; attrition also reports reputation
//! decrements through the same patch type so the surrounding layer can
//! reflect them live.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::EventId;

/// A partial update to top-level run state, expressed as signed deltas.
///
/// Application order and clamping are the run controller's concern:
/// stamina clamps to `[0, max_stamina]`, reputation to `[0, 100]`, gold
/// floors at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatePatch {
    /// Gold delta (may be negative).
    pub gold: Decimal,
    /// Stamina delta (may be negative).
    pub stamina: i32,
    /// Reputation delta (may be negative).
    pub reputation: i32,
}

impl StatePatch {
    /// A patch that changes nothing.
    pub const NONE: Self = Self {
        gold: Decimal::ZERO,
        stamina: 0,
        reputation: 0,
    };

    /// A pure reputation delta.
    pub const fn reputation(delta: i32) -> Self {
        Self {
            gold: Decimal::ZERO,
            stamina: 0,
            reputation: delta,
        }
    }

    /// A pure stamina delta.
    pub const fn stamina(delta: i32) -> Self {
        Self {
            gold: Decimal::ZERO,
            stamina: delta,
            reputation: 0,
        }
    }

    /// A pure gold delta.
    pub const fn gold(delta: Decimal) -> Self {
        Self {
            gold: delta,
            stamina: 0,
            reputation: 0,
        }
    }
}

/// One selectable option within a narrative event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    /// Button text presented to the player.
    pub text: String,
    /// Narration shown after the choice is taken.
    pub outcome_text: String,
    /// The mechanical effect of taking this choice.
    pub effect: StatePatch,
}

/// A narrative event offered between days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomEvent {
    /// Unique identity of this event instance.
    pub id: EventId,
    /// Event headline.
    pub title: String,
    /// Event body text.
    pub description: String,
    /// The options the player may pick from (always at least one).
    pub choices: Vec<EventChoice>,
}
