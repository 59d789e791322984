//! The terminal settlement a day of service emits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why the day ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayEndReason {
    /// The day clock ran out; a normal, successful close.
    TimeUp,
    /// Stamina hit zero before the clock did.
    Exhausted,
}

/// The payload emitted exactly once when a day of service ends.
///
/// Consumed by the run controller: on `exhausted` the run terminates;
/// otherwise `earned` is added to gold and `reputation_change` is applied
/// with clamping to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Gold earned during the day (tips included).
    pub earned: Decimal,
    /// Reputation delta: +5 on a timed-out day, -10 on exhaustion.
    pub reputation_change: i32,
    /// Whether the day ended in exhaustion.
    pub exhausted: bool,
}

impl Settlement {
    /// Settlement for a day that ran its full duration.
    pub const fn time_up(earned: Decimal) -> Self {
        Self {
            earned,
            reputation_change: 5,
            exhausted: false,
        }
    }

    /// Settlement for a day cut short by exhaustion.
    pub const fn exhausted(earned: Decimal) -> Self {
        Self {
            earned,
            reputation_change: -10,
            exhausted: true,
        }
    }

    /// The end reason implied by this settlement.
    pub const fn reason(&self) -> DayEndReason {
        if self.exhausted {
            DayEndReason::Exhausted
        } else {
            DayEndReason::TimeUp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_up_settlement_awards_reputation() {
        let s = Settlement::time_up(Decimal::from(42));
        assert_eq!(s.reputation_change, 5);
        assert!(!s.exhausted);
        assert_eq!(s.reason(), DayEndReason::TimeUp);
    }

    #[test]
    fn exhaustion_settlement_costs_reputation() {
        let s = Settlement::exhausted(Decimal::ZERO);
        assert_eq!(s.reputation_change, -10);
        assert!(s.exhausted);
        assert_eq!(s.reason(), DayEndReason::Exhausted);
    }
}
