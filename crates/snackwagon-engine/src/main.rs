//! Snack Wagon binary: the headless run loop.
//!
//! Wires the pieces together and plays a full run end to end: each
//! morning a route is chosen and the chef invents a special, the service
//! day runs under the async driver with the scripted player at the
//! counter, and each evening the settlement is folded into the run,
//! a narrative event may fire, and the shop policy spends the take.
//!
//! # Startup sequence
//!
//! 1. Load configuration from `snackwagon-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the chef from the generator settings
//! 4. Start a fresh run and loop days until game over or the
//!    configured day limit
//! 5. Log the run summary

mod autoplay;
mod error;

use std::path::Path;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use snackwagon_core::{
    DaySetup, DaySnapshot, RunOutcome, RunState, WagonConfig, run_service_day,
};
use snackwagon_chef::{BackendKind, BackendSettings, Chef};
use snackwagon_types::Biome;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("snackwagon-engine starting");
    let service = config.service_config();
    info!(
        preset = ?config.preset,
        day_duration_ms = service.day_duration_ms,
        max_customers = service.max_concurrent_customers,
        max_days = config.simulation.max_days,
        "configuration loaded"
    );

    let chef = Chef::new(&BackendSettings {
        kind: BackendKind::from_name(&config.generator.backend),
        api_url: config.generator.api_url.clone(),
        model: config.generator.model.clone(),
        api_key: config.generator.api_key.clone(),
        timeout: Duration::from_millis(config.generator.request_timeout_ms),
    });

    let mut rng = SmallRng::from_os_rng();
    let mut run = RunState::new(&config.run, service.max_stamina);

    loop {
        if config.simulation.max_days > 0 && run.day > config.simulation.max_days {
            info!(days = config.simulation.max_days, "day limit reached");
            break;
        }

        let biome = pick_route(&run, &mut rng);
        info!(day = run.day, route = %biome.name, weather = %biome.weather, "route chosen");

        let special = chef.special_dish(&biome).await;
        let mut menu = RunState::fresh_menu();
        if !menu.prepend_special(special.clone()) {
            warn!(dish = %special.id, "special collided with the base menu, skipping");
        }

        let setup = DaySetup {
            day: run.day,
            menu,
            biome: biome.clone(),
            kitchen_level: run.kitchen_level,
            decor_level: run.decor_level,
            stamina: run.stamina,
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (patch_tx, mut patch_rx) = mpsc::channel(64);
        let (snap_tx, snap_rx) = watch::channel(DaySnapshot::default());

        let driver = tokio::spawn(run_service_day(
            service.clone(),
            setup,
            cmd_rx,
            patch_tx,
            snap_tx,
        ));
        let player = tokio::spawn(autoplay::play_day(snap_rx, cmd_tx));

        // Attrition patches stream in live; the driver dropping its
        // sender ends this loop when the day settles.
        while let Some(patch) = patch_rx.recv().await {
            run.apply_patch(patch);
        }

        let result = driver.await.map_err(|e| EngineError::Driver {
            message: format!("service day task failed: {e}"),
        })?;
        player.abort();

        let outcome = run.apply_settlement(&result.settlement, result.stamina, biome.kind);
        if let RunOutcome::GameOver { final_day } = outcome {
            info!(final_day, gold = %run.gold, "the wagon closes for good");
            break;
        }

        if rng.random_range(0..100) < config.run.event_chance_pct {
            let event = chef.random_event(&biome).await;
            let pick = autoplay::choose_event_choice(&run, &event);
            if let Some(choice) = event.choices.get(pick) {
                info!(event = %event.title, choice = %choice.text, "evening event");
                run.apply_patch(choice.effect);
            }
        }

        autoplay::shop(&mut run);
        run.advance_day();
    }

    info!(
        days_played = run.history.len(),
        gold = %run.gold,
        reputation = run.reputation,
        kitchen_level = run.kitchen_level,
        "snackwagon-engine shutdown complete"
    );
    Ok(())
}

/// Choose the morning's route: the easiest of the offered three. The
/// scripted player has no taste for adventure.
fn pick_route(run: &RunState, rng: &mut impl Rng) -> Biome {
    let offered = run.offer_routes(rng);
    offered
        .iter()
        .min_by_key(|b| b.difficulty)
        .cloned()
        .unwrap_or_else(|| {
            // The catalog is static and non-empty; this is unreachable
            // in practice but the route offer API returns a Vec.
            snackwagon_types::biome::catalog().swap_remove(0)
        })
}

/// Load configuration from `snackwagon-config.yaml` in the working
/// directory, falling back to defaults when the file is absent.
fn load_config() -> Result<WagonConfig, EngineError> {
    let config_path = Path::new("snackwagon-config.yaml");
    if config_path.exists() {
        Ok(WagonConfig::from_file(config_path)?)
    } else {
        Ok(WagonConfig::default())
    }
}
