//! Scripted player for headless runs.
//!
//! The real game is played by a human; the headless binary plays itself
//! with a small greedy policy so the full loop can run end to end. The
//! policy is deliberately simple: cook for whoever is closest to walking
//! away, serve when the plate matches someone, trash a plate nobody
//! wants, and spend evenings and gold conservatively.

use rust_decimal::Decimal;
use snackwagon_core::{DaySnapshot, RunState, StallCommand, Station, Upgrade};
use snackwagon_types::{Customer, RandomEvent};
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Stamina level below which the policy rests instead of upgrading.
const TIRED_THRESHOLD: u32 = 50;
/// Gold the policy keeps in reserve before buying a kitchen upgrade.
const GOLD_RESERVE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Drive one day of service from snapshots.
///
/// Watches the day and issues commands until the day settles or the
/// driver goes away. Duplicate commands are harmless; the stall rejects
/// anything invalid.
pub async fn play_day(
    mut snapshots: watch::Receiver<DaySnapshot>,
    commands: mpsc::Sender<StallCommand>,
) {
    while snapshots.changed().await.is_ok() {
        let snap = snapshots.borrow_and_update().clone();
        if snap.settled {
            return;
        }
        let Some(command) = next_command(&snap) else {
            continue;
        };
        debug!(?command, "autoplay");
        if commands.send(command).await.is_err() {
            return;
        }
    }
}

/// The next command the policy would issue for a snapshot, if any.
fn next_command(snap: &DaySnapshot) -> Option<StallCommand> {
    match &snap.station {
        Station::Idle => {
            let target = most_urgent(&snap.customers)?;
            Some(StallCommand::Cook(target.order.id.clone()))
        }
        Station::Ready { dish } => {
            let served = snap
                .customers
                .iter()
                .filter(|c| c.order.id == dish.id)
                .min_by_key(|c| c.patience);
            match served {
                Some(customer) => Some(StallCommand::Serve(customer.id)),
                // Whoever wanted this left; the plate is a sunk cost.
                None => Some(StallCommand::Trash),
            }
        }
        Station::Cooking { .. } => None,
    }
}

fn most_urgent(customers: &[Customer]) -> Option<&Customer> {
    customers.iter().min_by_key(|c| c.patience)
}

/// Pick an event choice: the first one, unless it would flatten the
/// run's stamina and another option exists.
pub fn choose_event_choice(run: &RunState, event: &RandomEvent) -> usize {
    let Some(first) = event.choices.first() else {
        return 0;
    };
    let cost = first.effect.stamina.min(0).unsigned_abs();
    if cost >= run.stamina && event.choices.len() > 1 {
        1
    } else {
        0
    }
}

/// Evening shopping: rest when tired, otherwise put spare gold into the
/// kitchen.
pub fn shop(run: &mut RunState) {
    if run.stamina < TIRED_THRESHOLD && run.purchase(Upgrade::Rest) {
        return;
    }
    let kitchen = run.upgrade_cost(Upgrade::Kitchen);
    if run.gold >= kitchen.saturating_add(GOLD_RESERVE) {
        run.purchase(Upgrade::Kitchen);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use snackwagon_core::RunConfig;
    use snackwagon_types::{Dish, EventChoice, EventId, Menu, StatePatch};

    use super::*;

    fn customer(patience: u32, order: Dish) -> Customer {
        let mut c = Customer::new("🦊", order, 100, Decimal::ONE);
        c.patience = Decimal::from(patience);
        c
    }

    fn menu_dish(index: usize) -> Dish {
        Menu::base().get_index(index).unwrap().clone()
    }

    #[test]
    fn idle_station_cooks_for_the_most_urgent_customer() {
        let snap = DaySnapshot {
            customers: vec![customer(90, menu_dish(0)), customer(30, menu_dish(1))],
            station: Station::Idle,
            ..DaySnapshot::default()
        };
        assert_eq!(
            next_command(&snap),
            Some(StallCommand::Cook(menu_dish(1).id))
        );
    }

    #[test]
    fn ready_dish_goes_to_a_matching_customer() {
        let dish = menu_dish(0);
        let wanted = customer(40, dish.clone());
        let target = wanted.id;
        let snap = DaySnapshot {
            customers: vec![customer(90, menu_dish(1)), wanted],
            station: Station::Ready { dish },
            ..DaySnapshot::default()
        };
        assert_eq!(next_command(&snap), Some(StallCommand::Serve(target)));
    }

    #[test]
    fn orphaned_plate_is_trashed() {
        let snap = DaySnapshot {
            customers: vec![customer(50, menu_dish(1))],
            station: Station::Ready {
                dish: menu_dish(0),
            },
            ..DaySnapshot::default()
        };
        assert_eq!(next_command(&snap), Some(StallCommand::Trash));
    }

    #[test]
    fn waits_while_cooking_or_queue_is_empty() {
        let empty = DaySnapshot::default();
        assert_eq!(next_command(&empty), None);
    }

    #[test]
    fn event_choice_avoids_flattening_stamina() {
        let mut run = RunState::new(&RunConfig::default(), 100);
        let event = RandomEvent {
            id: EventId::new(),
            title: "Sudden Rain".to_owned(),
            description: String::new(),
            choices: vec![
                EventChoice {
                    text: String::new(),
                    outcome_text: String::new(),
                    effect: StatePatch::stamina(-20),
                },
                EventChoice {
                    text: String::new(),
                    outcome_text: String::new(),
                    effect: StatePatch::gold(Decimal::from(-30)),
                },
            ],
        };
        assert_eq!(choose_event_choice(&run, &event), 0);
        run.stamina = 15;
        assert_eq!(choose_event_choice(&run, &event), 1);
    }

    #[test]
    fn shop_rests_when_tired() {
        let mut run = RunState::new(&RunConfig::default(), 100);
        run.stamina = 20;
        shop(&mut run);
        assert_eq!(run.stamina, 70);
        assert_eq!(run.gold, Decimal::from(50));
    }

    #[test]
    fn shop_buys_kitchen_with_spare_gold() {
        let mut run = RunState::new(&RunConfig::default(), 100);
        run.gold = Decimal::from(320);
        shop(&mut run);
        assert_eq!(run.kitchen_level, 2);
        assert_eq!(run.gold, Decimal::from(120));
    }

    #[test]
    fn shop_holds_gold_below_the_reserve() {
        let mut run = RunState::new(&RunConfig::default(), 100);
        run.gold = Decimal::from(250);
        shop(&mut run);
        assert_eq!(run.kitchen_level, 1);
        assert_eq!(run.gold, Decimal::from(250));
    }
}
