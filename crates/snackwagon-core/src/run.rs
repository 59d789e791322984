//! Run controller: the state that outlives a single day.
//!
//! Gold, stamina, reputation, and upgrade levels carry across days; the
//! run controller applies settlements and incremental patches with
//! clamping at every mutation site, offers routes and upgrades between
//! days, and decides when the run is over. Clamping here is deliberate
//! even when callers look well behaved: a negative stamina or an
//! out-of-range reputation is a defect, never a crash.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use snackwagon_types::{Biome, BiomeKind, Menu, Settlement, StatePatch, biome};
use tracing::info;

use crate::config::RunConfig;

/// Reputation is clamped to this ceiling at every mutation.
const MAX_REPUTATION: u32 = 100;
/// How many routes are offered each morning.
const ROUTES_OFFERED: usize = 3;
/// Gold cost of a night's rest.
const REST_COST: u32 = 50;
/// Stamina restored by a night's rest.
const REST_STAMINA: u32 = 50;

/// One settled day, kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    /// Day number within the run.
    pub day: u32,
    /// When the day settled.
    pub settled_at: DateTime<Utc>,
    /// The route the day ran on.
    pub biome: BiomeKind,
    /// Gold earned that day.
    pub earned: Decimal,
    /// Reputation delta from the settlement.
    pub reputation_change: i32,
    /// Whether the day ended in exhaustion.
    pub exhausted: bool,
}

/// Whether the run continues after a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Move on to the post-day flow and the next morning.
    Continue,
    /// Exhaustion ended the run.
    GameOver {
        /// The day the run ended on.
        final_day: u32,
    },
}

/// Purchasable upgrades offered between days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    /// Shortens prep times by 200 ms per level.
    Kitchen,
    /// Meta progression only; has no effect on the service loop.
    Marketing,
    /// A night's rest: flat cost, restores stamina.
    Rest,
}

/// The top-level state of one run, carried across days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Current day number, starting at 1.
    pub day: u32,
    /// Gold on hand. Floors at zero.
    pub gold: Decimal,
    /// Stamina carried between days, clamped to `[0, max_stamina]`.
    pub stamina: u32,
    /// Stamina ceiling.
    pub max_stamina: u32,
    /// Reputation, clamped to `[0, 100]`.
    pub reputation: u32,
    /// Kitchen upgrade level.
    pub kitchen_level: u32,
    /// Marketing upgrade level.
    pub marketing_level: u32,
    /// Decor upgrade level; sets the tip multiplier at customer spawn.
    pub decor_level: u32,
    /// Settled days, oldest first.
    pub history: Vec<DayRecord>,
}

impl RunState {
    /// A fresh run with the configured starting values.
    pub fn new(config: &RunConfig, max_stamina: u32) -> Self {
        Self {
            day: 1,
            gold: Decimal::from(config.starting_gold),
            stamina: config.starting_stamina.min(max_stamina),
            max_stamina,
            reputation: config.starting_reputation.min(MAX_REPUTATION),
            kitchen_level: config.kitchen_level,
            marketing_level: config.marketing_level,
            decor_level: config.decor_level,
            history: Vec::new(),
        }
    }

    /// Apply a partial state patch, clamping every field.
    pub fn apply_patch(&mut self, patch: StatePatch) {
        self.gold = self
            .gold
            .saturating_add(patch.gold)
            .max(Decimal::ZERO);
        self.stamina = clamped_add(self.stamina, patch.stamina, self.max_stamina);
        self.reputation = clamped_add(self.reputation, patch.reputation, MAX_REPUTATION);
    }

    /// Fold a day's settlement into the run.
    ///
    /// `stamina_after` is the stamina the day closed with; `biome` names
    /// the route the day ran on. On exhaustion the run is over and the
    /// caller must start a fresh run to keep playing.
    pub fn apply_settlement(
        &mut self,
        settlement: &Settlement,
        stamina_after: u32,
        biome: BiomeKind,
    ) -> RunOutcome {
        self.history.push(DayRecord {
            day: self.day,
            settled_at: Utc::now(),
            biome,
            earned: settlement.earned,
            reputation_change: settlement.reputation_change,
            exhausted: settlement.exhausted,
        });
        self.gold = self
            .gold
            .saturating_add(settlement.earned)
            .max(Decimal::ZERO);
        self.reputation = clamped_add(
            self.reputation,
            settlement.reputation_change,
            MAX_REPUTATION,
        );
        self.stamina = stamina_after.min(self.max_stamina);
        if settlement.exhausted {
            info!(day = self.day, gold = %self.gold, "run over: collapsed from exhaustion");
            return RunOutcome::GameOver {
                final_day: self.day,
            };
        }
        info!(
            day = self.day,
            earned = %settlement.earned,
            gold = %self.gold,
            reputation = self.reputation,
            "day folded into run"
        );
        RunOutcome::Continue
    }

    /// Move to the next morning.
    pub fn advance_day(&mut self) {
        self.day = self.day.saturating_add(1);
    }

    /// Gold cost of an upgrade at the current levels.
    ///
    /// Kitchen and marketing scale as `(level + 1) * 100`; rest is a
    /// flat 50.
    pub fn upgrade_cost(&self, upgrade: Upgrade) -> Decimal {
        let cost = match upgrade {
            Upgrade::Kitchen => level_cost(self.kitchen_level),
            Upgrade::Marketing => level_cost(self.marketing_level),
            Upgrade::Rest => REST_COST,
        };
        Decimal::from(cost)
    }

    /// Buy an upgrade, returning `false` without spending when the
    /// price exceeds the gold on hand.
    pub fn purchase(&mut self, upgrade: Upgrade) -> bool {
        let cost = self.upgrade_cost(upgrade);
        if cost > self.gold {
            return false;
        }
        self.gold = self.gold.saturating_sub(cost).max(Decimal::ZERO);
        match upgrade {
            Upgrade::Kitchen => self.kitchen_level = self.kitchen_level.saturating_add(1),
            Upgrade::Marketing => self.marketing_level = self.marketing_level.saturating_add(1),
            Upgrade::Rest => {
                self.stamina = self
                    .stamina
                    .saturating_add(REST_STAMINA)
                    .min(self.max_stamina);
            }
        }
        info!(?upgrade, %cost, gold = %self.gold, "upgrade purchased");
        true
    }

    /// The morning's route offer: three routes drawn from the catalog
    /// in shuffled order.
    pub fn offer_routes(&self, rng: &mut impl Rng) -> Vec<Biome> {
        let mut routes = biome::catalog();
        routes.shuffle(rng);
        routes.truncate(ROUTES_OFFERED);
        routes
    }

    /// The menu a new day starts from, before the special is prepended.
    pub fn fresh_menu() -> Menu {
        Menu::base()
    }
}

fn level_cost(level: u32) -> u32 {
    level.saturating_add(1).saturating_mul(100)
}

/// Add a signed delta to an unsigned stat, clamping to `[0, max]`.
fn clamped_add(value: u32, delta: i32, max: u32) -> u32 {
    let result = i64::from(value).saturating_add(i64::from(delta));
    let clamped = result.clamp(0, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn fresh() -> RunState {
        RunState::new(&RunConfig::default(), 100)
    }

    #[test]
    fn fresh_run_uses_configured_starting_values() {
        let run = fresh();
        assert_eq!(run.day, 1);
        assert_eq!(run.gold, Decimal::from(100));
        assert_eq!(run.stamina, 100);
        assert_eq!(run.reputation, 50);
        assert_eq!(run.kitchen_level, 1);
        assert!(run.history.is_empty());
    }

    #[test]
    fn patches_clamp_at_both_ends() {
        let mut run = fresh();
        run.apply_patch(StatePatch::stamina(50));
        assert_eq!(run.stamina, 100);
        run.apply_patch(StatePatch::stamina(-200));
        assert_eq!(run.stamina, 0);
        run.apply_patch(StatePatch::reputation(200));
        assert_eq!(run.reputation, 100);
        run.apply_patch(StatePatch::gold(Decimal::from(-500)));
        assert_eq!(run.gold, Decimal::ZERO);
    }

    #[test]
    fn successful_settlement_accumulates_and_continues() {
        let mut run = fresh();
        let outcome = run.apply_settlement(
            &Settlement::time_up("42.6".parse().unwrap()),
            80,
            BiomeKind::Forest,
        );
        assert_eq!(outcome, RunOutcome::Continue);
        assert_eq!(run.gold, "142.6".parse::<Decimal>().unwrap());
        assert_eq!(run.reputation, 55);
        assert_eq!(run.stamina, 80);
        assert_eq!(run.history.len(), 1);
    }

    #[test]
    fn exhaustion_settlement_ends_the_run() {
        let mut run = fresh();
        let outcome =
            run.apply_settlement(&Settlement::exhausted(Decimal::from(5)), 0, BiomeKind::Snow);
        assert_eq!(outcome, RunOutcome::GameOver { final_day: 1 });
        // Earnings and the reputation hit still land before the run ends.
        assert_eq!(run.gold, Decimal::from(105));
        assert_eq!(run.reputation, 40);
    }

    #[test]
    fn reputation_floors_at_zero_across_settlements() {
        let mut run = fresh();
        run.reputation = 4;
        run.apply_settlement(&Settlement::exhausted(Decimal::ZERO), 0, BiomeKind::Town);
        assert_eq!(run.reputation, 0);
    }

    #[test]
    fn upgrade_costs_scale_with_level() {
        let mut run = fresh();
        assert_eq!(run.upgrade_cost(Upgrade::Kitchen), Decimal::from(200));
        run.gold = Decimal::from(1_000);
        assert!(run.purchase(Upgrade::Kitchen));
        assert_eq!(run.kitchen_level, 2);
        assert_eq!(run.upgrade_cost(Upgrade::Kitchen), Decimal::from(300));
        assert_eq!(run.gold, Decimal::from(800));
    }

    #[test]
    fn unaffordable_upgrade_is_rejected_without_spending() {
        let mut run = fresh();
        run.gold = Decimal::from(150);
        assert!(!run.purchase(Upgrade::Kitchen));
        assert_eq!(run.gold, Decimal::from(150));
        assert_eq!(run.kitchen_level, 1);
    }

    #[test]
    fn rest_restores_stamina_up_to_the_cap() {
        let mut run = fresh();
        run.stamina = 30;
        assert!(run.purchase(Upgrade::Rest));
        assert_eq!(run.stamina, 80);
        assert_eq!(run.gold, Decimal::from(50));
        assert!(run.purchase(Upgrade::Rest));
        assert_eq!(run.stamina, 100);
        assert_eq!(run.gold, Decimal::ZERO);
        assert!(!run.purchase(Upgrade::Rest));
    }

    #[test]
    fn route_offer_is_three_distinct_catalog_routes() {
        let run = fresh();
        let mut rng = SmallRng::seed_from_u64(7);
        let offer = run.offer_routes(&mut rng);
        assert_eq!(offer.len(), 3);
        let mut kinds: Vec<BiomeKind> = offer.iter().map(|b| b.kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn advancing_the_day_increments() {
        let mut run = fresh();
        run.advance_day();
        assert_eq!(run.day, 2);
    }
}
