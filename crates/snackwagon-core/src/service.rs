//! One day of service: the tick-driven simulation state.
//!
//! [`ServiceDay`] owns everything that exists only while the stall is
//! open: the day clock, the customer queue, the single-slot station, the
//! earnings accumulator, and the day's stamina. It is a plain state
//! machine with no timers of its own; the loop driver calls [`tick`]
//! at the frame cadence and forwards player actions and cook-completion
//! notifications. One task owns the whole struct, so no field needs a
//! lock.
//!
//! Per-tick order is fixed: settlement guard, time-out check, exhaustion
//! check, spawn, decay with batch eviction. The time-out check runs
//! before the exhaustion check, so a tick where both the clock and
//! stamina hit zero settles as a normal close, not an exhaustion.
//!
//! [`tick`]: ServiceDay::tick

use rand::Rng;
use rust_decimal::Decimal;
use snackwagon_types::{
    Biome, Customer, CustomerId, Dish, DishId, Menu, SPECIES, Settlement, StatePatch,
    tip_multiplier_for_decor,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::DayClock;
use crate::config::ServiceConfig;
use crate::station::Station;

/// Per-customer stamina cost when a customer leaves angry.
const ANGRY_STAMINA_COST: u32 = 10;
/// Reputation cost of an attrition tick, applied once regardless of how
/// many customers left.
const ANGRY_REPUTATION_COST: i32 = -5;
/// Stamina cost of a wrong-order serve or a trashed dish.
const WASTE_STAMINA_COST: u32 = 5;
/// Stamina refunded for serving a customer whose patience is still high.
const HIGH_PATIENCE_REFUND: u32 = 2;
/// Patience threshold (exclusive) above which a serve refunds stamina.
const HIGH_PATIENCE_THRESHOLD: u32 = 80;

/// Everything the run controller hands over when a day opens.
#[derive(Debug, Clone)]
pub struct DaySetup {
    /// Day number within the run, starting at 1.
    pub day: u32,
    /// The menu for the day, base dishes plus the generated special.
    pub menu: Menu,
    /// The route chosen for the day; its difficulty scales decay.
    pub biome: Biome,
    /// Kitchen upgrade level, shortens prep times.
    pub kitchen_level: u32,
    /// Decor upgrade level, raises the tip multiplier at spawn time.
    pub decor_level: u32,
    /// Stamina carried in from the run.
    pub stamina: u32,
}

/// What one call to [`ServiceDay::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The day's terminal settlement, present on exactly one tick.
    pub settlement: Option<Settlement>,
    /// Customer spawned this tick, if any.
    pub spawned: Option<CustomerId>,
    /// Customers evicted this tick for running out of patience.
    pub evicted: Vec<CustomerId>,
    /// Incremental run-state patch (attrition reputation debits), pushed
    /// live rather than batched into the settlement.
    pub patch: StatePatch,
}

impl TickReport {
    const fn empty() -> Self {
        Self {
            settlement: None,
            spawned: None,
            evicted: Vec::new(),
            patch: StatePatch::NONE,
        }
    }
}

/// Result of a player action against the stall.
///
/// Invalid actions are rejections, not errors: the stall ignores them
/// and nothing in the day state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A dish went on the burner.
    CookStarted {
        /// The dish being prepared.
        dish: Dish,
        /// When preparation will complete.
        ready_at: Instant,
    },
    /// The plated dish matched the customer's order.
    Served {
        /// Who was served.
        customer: CustomerId,
        /// Gold added to the day's earnings (price plus tip).
        payout: Decimal,
        /// The tip portion of the payout.
        tip: Decimal,
        /// Stamina refunded for a high-patience serve (0 or 2).
        stamina_refund: u32,
    },
    /// The plated dish did not match; the dish is gone, the customer
    /// stays, and stamina dropped.
    WrongOrder {
        /// The customer who was offered the wrong dish.
        customer: CustomerId,
    },
    /// The plated dish was discarded at a stamina cost.
    Trashed {
        /// The dish that was thrown away.
        dish: DishId,
    },
    /// Nothing happened; the action was invalid in the current state.
    Rejected(RejectReason),
}

/// Why an action was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A cook was requested while a dish is cooking or plated.
    StationBusy,
    /// Serve or trash was requested with nothing plated.
    NothingPrepared,
    /// The requested dish is not on today's menu.
    UnknownDish,
    /// The targeted customer is not in the queue.
    UnknownCustomer,
    /// The day has already settled.
    DayOver,
}

/// The state of one day of service.
#[derive(Debug)]
pub struct ServiceDay {
    config: ServiceConfig,
    clock: DayClock,
    day: u32,
    menu: Menu,
    decay_per_tick: Decimal,
    tip_multiplier: Decimal,
    kitchen_level: u32,
    customers: Vec<Customer>,
    station: Station,
    earnings: Decimal,
    stamina: u32,
    last_spawn_at: Option<Instant>,
    settled: bool,
}

impl ServiceDay {
    /// Open the stall for one day.
    ///
    /// Earnings start at zero and the queue starts empty; only stamina
    /// and upgrade levels carry in from the run.
    pub fn open(config: ServiceConfig, setup: DaySetup, now: Instant) -> Self {
        let stamina = setup.stamina.min(config.max_stamina);
        let decay_per_tick = config.decay_per_tick(setup.biome.difficulty);
        info!(
            day = setup.day,
            biome = %setup.biome.name,
            difficulty = setup.biome.difficulty,
            stamina,
            menu_size = setup.menu.len(),
            "stall open"
        );
        Self {
            clock: DayClock::start(now, config.day_duration()),
            day: setup.day,
            menu: setup.menu,
            decay_per_tick,
            tip_multiplier: tip_multiplier_for_decor(setup.decor_level),
            kitchen_level: setup.kitchen_level,
            customers: Vec::new(),
            station: Station::Idle,
            earnings: Decimal::ZERO,
            stamina,
            last_spawn_at: None,
            settled: false,
            config,
        }
    }

    /// Advance the day by one tick.
    ///
    /// After the day settles, further ticks are no-ops returning an
    /// empty report, so the settlement is emitted exactly once.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> TickReport {
        let mut report = TickReport::empty();
        if self.settled {
            return report;
        }
        if self.clock.is_over(now) {
            report.settlement = Some(self.settle(Settlement::time_up(self.earnings)));
            return report;
        }
        if self.stamina == 0 {
            report.settlement = Some(self.settle(Settlement::exhausted(self.earnings)));
            return report;
        }
        report.spawned = self.try_spawn(now, rng);
        report.evicted = self.decay_and_evict();
        if !report.evicted.is_empty() {
            let angry = u32::try_from(report.evicted.len()).unwrap_or(u32::MAX);
            self.stamina = self
                .stamina
                .saturating_sub(angry.saturating_mul(ANGRY_STAMINA_COST));
            report.patch = StatePatch::reputation(ANGRY_REPUTATION_COST);
            warn!(
                day = self.day,
                angry,
                stamina = self.stamina,
                "customers left angry"
            );
        }
        report
    }

    /// Put a dish from today's menu on the burner.
    ///
    /// Returns the instant the dish will be ready so the driver can
    /// schedule the completion notification.
    pub fn cook(&mut self, dish_id: &DishId, now: Instant) -> ActionOutcome {
        if self.settled {
            return ActionOutcome::Rejected(RejectReason::DayOver);
        }
        let Some(dish) = self.menu.get(dish_id).cloned() else {
            return ActionOutcome::Rejected(RejectReason::UnknownDish);
        };
        let prep = self
            .config
            .effective_prep_time(dish.prep_time_ms, self.kitchen_level);
        let ready_at = now.checked_add(prep).unwrap_or(now);
        if self.station.begin_cook(dish.clone(), ready_at) {
            debug!(dish = %dish.id, prep_ms = prep.as_millis(), "cook started");
            ActionOutcome::CookStarted { dish, ready_at }
        } else {
            ActionOutcome::Rejected(RejectReason::StationBusy)
        }
    }

    /// Notify the day that a cook timer fired.
    ///
    /// Returns `true` when the named dish moved to the plate; stale
    /// notifications are ignored.
    pub fn finish_cook(&mut self, dish_id: &DishId) -> bool {
        if self.settled {
            return false;
        }
        let plated = self.station.finish_cook(dish_id);
        if plated {
            debug!(dish = %dish_id, "dish ready");
        }
        plated
    }

    /// Offer the plated dish to a customer.
    ///
    /// Matching is by dish identity, never by name. A mismatch costs
    /// the dish and stamina; the customer stays queued.
    pub fn serve(&mut self, customer_id: &CustomerId) -> ActionOutcome {
        if self.settled {
            return ActionOutcome::Rejected(RejectReason::DayOver);
        }
        if self.station.ready_dish().is_none() {
            return ActionOutcome::Rejected(RejectReason::NothingPrepared);
        }
        let Some(pos) = self.customers.iter().position(|c| &c.id == customer_id) else {
            return ActionOutcome::Rejected(RejectReason::UnknownCustomer);
        };
        let Some(dish) = self.station.take_ready() else {
            return ActionOutcome::Rejected(RejectReason::NothingPrepared);
        };
        let matches = self
            .customers
            .get(pos)
            .is_some_and(|c| c.order.id == dish.id);
        if !matches {
            self.stamina = self.stamina.saturating_sub(WASTE_STAMINA_COST);
            debug!(customer = %customer_id, dish = %dish.id, "wrong order");
            return ActionOutcome::WrongOrder {
                customer: *customer_id,
            };
        }
        let customer = self.customers.swap_remove(pos);
        let tip = customer.tip();
        let payout = customer.payout();
        self.earnings = self.earnings.saturating_add(payout);
        let stamina_refund = if customer.patience > Decimal::from(HIGH_PATIENCE_THRESHOLD) {
            HIGH_PATIENCE_REFUND
        } else {
            0
        };
        self.stamina = self
            .stamina
            .saturating_add(stamina_refund)
            .min(self.config.max_stamina);
        info!(
            customer = %customer.id,
            dish = %dish.id,
            %payout,
            %tip,
            earnings = %self.earnings,
            "order served"
        );
        ActionOutcome::Served {
            customer: customer.id,
            payout,
            tip,
            stamina_refund,
        }
    }

    /// Throw away the plated dish at a stamina cost.
    pub fn trash(&mut self) -> ActionOutcome {
        if self.settled {
            return ActionOutcome::Rejected(RejectReason::DayOver);
        }
        match self.station.take_ready() {
            Some(dish) => {
                self.stamina = self.stamina.saturating_sub(WASTE_STAMINA_COST);
                debug!(dish = %dish.id, stamina = self.stamina, "dish trashed");
                ActionOutcome::Trashed { dish: dish.id }
            }
            None => ActionOutcome::Rejected(RejectReason::NothingPrepared),
        }
    }

    /// The customers currently queued.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The station's current state.
    pub const fn station(&self) -> &Station {
        &self.station
    }

    /// Gold earned so far today. Never decreases within a day.
    pub const fn earnings(&self) -> Decimal {
        self.earnings
    }

    /// Stamina remaining, clamped to `[0, max_stamina]`.
    pub const fn stamina(&self) -> u32 {
        self.stamina
    }

    /// Day time left on the clock.
    pub fn remaining(&self, now: Instant) -> std::time::Duration {
        self.clock.remaining(now)
    }

    /// Whether the day has settled.
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// The menu the stall is serving from today.
    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    fn settle(&mut self, settlement: Settlement) -> Settlement {
        self.settled = true;
        self.customers.clear();
        self.station = Station::Idle;
        info!(
            day = self.day,
            earned = %settlement.earned,
            reputation_change = settlement.reputation_change,
            exhausted = settlement.exhausted,
            "day settled"
        );
        settlement
    }

    fn try_spawn(&mut self, now: Instant, rng: &mut impl Rng) -> Option<CustomerId> {
        if self.customers.len() >= self.config.max_concurrent_customers || self.menu.is_empty() {
            return None;
        }
        // The first spawn of the day is immediate; afterwards the
        // day-accelerated interval gates arrivals.
        let due = self.last_spawn_at.is_none_or(|at| {
            now.saturating_duration_since(at) >= self.config.spawn_interval_for_day(self.day)
        });
        if !due {
            return None;
        }
        let order = self.menu.get_index(rng.random_range(0..self.menu.len()))?.clone();
        let species = SPECIES
            .get(rng.random_range(0..SPECIES.len()))
            .copied()
            .unwrap_or("🐰");
        let customer = Customer::new(
            species,
            order,
            self.config.max_patience,
            self.tip_multiplier,
        );
        let id = customer.id;
        debug!(
            customer = %id,
            species,
            order = %customer.order.id,
            queued = self.customers.len().saturating_add(1),
            "customer arrived"
        );
        self.customers.push(customer);
        self.last_spawn_at = Some(now);
        Some(id)
    }

    fn decay_and_evict(&mut self) -> Vec<CustomerId> {
        let amount = self.decay_per_tick;
        let mut evicted = Vec::new();
        self.customers.retain_mut(|customer| {
            if customer.apply_decay(amount) {
                evicted.push(customer.id);
                false
            } else {
                true
            }
        });
        evicted
    }

    #[cfg(test)]
    fn customers_mut(&mut self) -> &mut Vec<Customer> {
        &mut self.customers
    }
}
