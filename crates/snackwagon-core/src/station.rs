//! Single-slot cooking station state machine.
//!
//! The stall has exactly one burner. A dish moves Idle -> Cooking ->
//! Ready, and leaves the Ready slot either by being served or by being
//! trashed. Cook completion arrives asynchronously, so completion is
//! keyed by dish id and stale notifications (for a dish no longer on the
//! burner) are ignored.

use snackwagon_types::{Dish, DishId};
use tokio::time::Instant;

/// What the burner is doing right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Station {
    /// Nothing cooking, nothing plated.
    #[default]
    Idle,
    /// A dish is on the burner until `ready_at`.
    Cooking {
        /// The dish being prepared.
        dish: Dish,
        /// When preparation completes.
        ready_at: Instant,
    },
    /// A finished dish is plated and waiting to be served or trashed.
    Ready {
        /// The plated dish.
        dish: Dish,
    },
}

impl Station {
    /// True when the burner is free and nothing is plated.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The dish currently plated, if any.
    pub const fn ready_dish(&self) -> Option<&Dish> {
        match self {
            Self::Ready { dish } => Some(dish),
            _ => None,
        }
    }

    /// Put a dish on the burner. Returns `false` without changing state
    /// when the station is already occupied.
    pub fn begin_cook(&mut self, dish: Dish, ready_at: Instant) -> bool {
        if self.is_idle() {
            *self = Self::Cooking { dish, ready_at };
            true
        } else {
            false
        }
    }

    /// Move the named dish from the burner to the plate.
    ///
    /// Returns `true` only when the station was cooking exactly that
    /// dish. A completion for any other dish id is stale (the day was
    /// torn down and restarted, or the slot was already resolved) and is
    /// ignored.
    pub fn finish_cook(&mut self, dish_id: &DishId) -> bool {
        match self {
            Self::Cooking { dish, .. } if dish.id == *dish_id => {
                let dish = dish.clone();
                *self = Self::Ready { dish };
                true
            }
            _ => false,
        }
    }

    /// Take the plated dish off the station, freeing the burner.
    pub fn take_ready(&mut self) -> Option<Dish> {
        if let Self::Ready { dish } = self {
            let dish = dish.clone();
            *self = Self::Idle;
            Some(dish)
        } else {
            None
        }
    }
}
