//! Customers and patience mechanics.
//!
//! A customer is created by the spawner with full patience and a single
//! order drawn from the active menu, and is destroyed when served, when
//! patience runs out, or when the day ends. Patience is monotonically
//! non-increasing; nothing heals it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dish::Dish;
use crate::ids::CustomerId;

/// Cosmetic species markers, drawn uniformly at spawn time.
pub const SPECIES: &[&str] = &["🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐸"];

/// A customer queued at the stall, waiting for their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identity of this customer.
    pub id: CustomerId,
    /// Cosmetic species emoji.
    pub species: String,
    /// The one dish this customer wants, cloned from the active menu.
    pub order: Dish,
    /// Remaining patience, between 0 and `max_patience`.
    pub patience: Decimal,
    /// Patience at spawn time.
    pub max_patience: Decimal,
    /// Tip multiplier fixed at spawn time from the stall's decor level.
    pub tip_multiplier: Decimal,
}

impl Customer {
    /// Create a customer with full patience.
    pub fn new(species: &str, order: Dish, max_patience: u32, tip_multiplier: Decimal) -> Self {
        let max = Decimal::from(max_patience);
        Self {
            id: CustomerId::new(),
            species: species.to_owned(),
            order,
            patience: max,
            max_patience: max,
            tip_multiplier,
        }
    }

    /// Age the customer by one decay step, flooring patience at zero.
    ///
    /// Returns `true` when patience has just reached zero, meaning the
    /// customer leaves angry and must be evicted this tick.
    pub fn apply_decay(&mut self, amount: Decimal) -> bool {
        self.patience = self.patience.saturating_sub(amount).max(Decimal::ZERO);
        self.patience == Decimal::ZERO
    }

    /// Tip earned if served right now.
    ///
    /// `floor(patience / 10) * tip_multiplier` — the patience credit is
    /// floored to an integer decile before multiplying, so late serves
    /// always yield strictly less than early ones, in discrete steps of
    /// `tip_multiplier` units.
    pub fn tip(&self) -> Decimal {
        let deciles = self
            .patience
            .checked_div(Decimal::TEN)
            .unwrap_or(Decimal::ZERO)
            .floor();
        deciles.checked_mul(self.tip_multiplier).unwrap_or(Decimal::ZERO)
    }

    /// Total payout if served right now: base price plus tip.
    pub fn payout(&self) -> Decimal {
        self.order.base_price.saturating_add(self.tip())
    }
}

/// Tip multiplier for a stall with the given decor level: `1 + level * 0.1`.
pub fn tip_multiplier_for_decor(decor_level: u32) -> Decimal {
    let bonus = Decimal::from(decor_level)
        .checked_mul(Decimal::new(1, 1))
        .unwrap_or(Decimal::ZERO);
    Decimal::ONE.saturating_add(bonus)
}
