//! Async loop driver for one day of service.
//!
//! [`run_service_day`] is the single writer for a [`ServiceDay`]: a
//! `select!` loop serializes the frame tick, player commands, and cook
//! completions, so the customer queue, stamina, and station are only
//! ever touched from one task. Cook completion is a spawned one-shot
//! sleep that reports back through a channel; its handle is aborted when
//! the day ends so a late timer can never touch a day the player has
//! already left.
//!
//! Observers get two outbound surfaces: a [`watch`] channel carrying a
//! [`DaySnapshot`] after every mutation, and an [`mpsc`] channel pushing
//! incremental [`StatePatch`]es (attrition reputation debits) as they
//! happen rather than batched into the settlement.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_decimal::Decimal;
use snackwagon_types::{Customer, CustomerId, DishId, Settlement, StatePatch};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::service::{ActionOutcome, DaySetup, ServiceDay};
use crate::station::Station;

/// Player actions sent into a running day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StallCommand {
    /// Start cooking the named dish.
    Cook(DishId),
    /// Offer the plated dish to the named customer.
    Serve(CustomerId),
    /// Throw the plated dish away.
    Trash,
}

/// A read-only view of the day, published after every mutation.
#[derive(Debug, Clone, Default)]
pub struct DaySnapshot {
    /// Customers currently queued.
    pub customers: Vec<Customer>,
    /// Current station state.
    pub station: Station,
    /// Stamina remaining.
    pub stamina: u32,
    /// Gold earned so far today.
    pub earnings: Decimal,
    /// Day time left on the clock.
    pub remaining: Duration,
    /// Whether the day has settled.
    pub settled: bool,
}

/// What the driver hands back when the day ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayResult {
    /// The day's terminal settlement.
    pub settlement: Settlement,
    /// Stamina left at close, carried back into the run.
    pub stamina: u32,
}

/// Run one day of service to completion.
///
/// Ticks at `config.frame_interval_ms`, consuming commands from
/// `commands` until the day settles. Dropping the command sender does
/// not end the day; the clock or exhaustion does. Send errors on the
/// outbound channels are ignored so a departed observer never stalls
/// the simulation.
pub async fn run_service_day(
    config: ServiceConfig,
    setup: DaySetup,
    mut commands: mpsc::Receiver<StallCommand>,
    patches: mpsc::Sender<StatePatch>,
    snapshots: watch::Sender<DaySnapshot>,
) -> DayResult {
    let mut rng = SmallRng::from_os_rng();
    let frame = Duration::from_millis(config.frame_interval_ms);
    let mut day = ServiceDay::open(config, setup, Instant::now());
    let mut ticker = time::interval(frame);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    let (done_tx, mut done_rx) = mpsc::channel::<DishId>(4);
    let mut cook_task: Option<JoinHandle<()>> = None;

    let settlement = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = day.tick(Instant::now(), &mut rng);
                if report.patch != StatePatch::NONE {
                    let _ = patches.send(report.patch).await;
                }
                publish(&snapshots, &day);
                if let Some(settlement) = report.settlement {
                    break settlement;
                }
            }
            Some(command) = commands.recv() => {
                handle_command(&mut day, command, &done_tx, &mut cook_task);
                publish(&snapshots, &day);
            }
            Some(dish_id) = done_rx.recv() => {
                day.finish_cook(&dish_id);
                cook_task = None;
                publish(&snapshots, &day);
            }
        }
    };

    // The day is over; a dish still on the burner must not fire into
    // whatever phase comes next.
    if let Some(task) = cook_task.take() {
        task.abort();
    }

    DayResult {
        settlement,
        stamina: day.stamina(),
    }
}

fn handle_command(
    day: &mut ServiceDay,
    command: StallCommand,
    done_tx: &mpsc::Sender<DishId>,
    cook_task: &mut Option<JoinHandle<()>>,
) {
    let outcome = match command {
        StallCommand::Cook(dish_id) => {
            let outcome = day.cook(&dish_id, Instant::now());
            if let ActionOutcome::CookStarted { ref dish, ready_at } = outcome {
                let dish_id = dish.id.clone();
                let done_tx = done_tx.clone();
                *cook_task = Some(tokio::spawn(async move {
                    time::sleep_until(ready_at).await;
                    let _ = done_tx.send(dish_id).await;
                }));
            }
            outcome
        }
        StallCommand::Serve(customer_id) => day.serve(&customer_id),
        StallCommand::Trash => day.trash(),
    };
    if let ActionOutcome::Rejected(reason) = outcome {
        debug!(?reason, "command ignored");
    }
}

fn publish(snapshots: &watch::Sender<DaySnapshot>, day: &ServiceDay) {
    let _ = snapshots.send(DaySnapshot {
        customers: day.customers().to_vec(),
        station: day.station().clone(),
        stamina: day.stamina(),
        earnings: day.earnings(),
        remaining: day.remaining(Instant::now()),
        settled: day.is_settled(),
    });
}
