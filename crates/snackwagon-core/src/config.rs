//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `snackwagon-config.yaml` at the
//! project root. This module defines strongly-typed structs mirroring the
//! YAML structure, with per-field defaults, and a loader that reads and
//! validates the file.
//!
//! Two near-identical tunings of the service loop exist as named presets
//! rather than duplicated logic: `standard` (the canonical tuning) and
//! `gentle`. An explicit `service:` section overrides the preset.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A config value is outside its valid range.
    #[error("invalid config: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the whole engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WagonConfig {
    /// Named service-loop tuning preset (`standard` or `gentle`).
    #[serde(default)]
    pub preset: ServicePreset,

    /// Explicit service-loop tuning; overrides the preset when present.
    #[serde(default)]
    pub service: Option<ServiceConfig>,

    /// Run-level starting values (gold, stamina, reputation, levels).
    #[serde(default)]
    pub run: RunConfig,

    /// Simulation boundary parameters for headless runs.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Dish/event generator backend settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WagonConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `LLM_API_KEY` environment variable overrides
    /// `generator.api_key` so deployments never need to write secrets
    /// into the YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.generator.apply_env_overrides();
        Ok(config)
    }

    /// Resolve the effective service-loop tuning: an explicit `service:`
    /// section wins, otherwise the named preset.
    pub fn service_config(&self) -> ServiceConfig {
        self.service
            .clone()
            .unwrap_or_else(|| self.preset.config())
    }
}

/// Named service-loop tuning presets.
///
/// The presets differ only in constants, never in logic; one
/// parameterized engine serves both. `standard` is canonical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServicePreset {
    /// Spawn cap 4, decay 0.1/tick, spawn floor 1000ms. Canonical.
    #[default]
    Standard,
    /// Spawn cap 3, decay 0.05/tick, spawn floor 1500ms.
    Gentle,
}

impl ServicePreset {
    /// The full tuning this preset names.
    pub fn config(self) -> ServiceConfig {
        match self {
            Self::Standard => ServiceConfig::default(),
            Self::Gentle => ServiceConfig {
                max_concurrent_customers: 3,
                min_spawn_interval_ms: 1500,
                patience_decay_rate: Decimal::new(5, 2),
                ..ServiceConfig::default()
            },
        }
    }
}

/// Tuning constants the service loop consumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// Length of one day of service in milliseconds.
    #[serde(default = "default_day_duration_ms")]
    pub day_duration_ms: u64,

    /// Tick cadence of the loop driver in milliseconds (~60 Hz).
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Maximum customers queued at once; spawning pauses at the cap.
    #[serde(default = "default_max_concurrent_customers")]
    pub max_concurrent_customers: usize,

    /// Spawn interval on day zero, before acceleration.
    #[serde(default = "default_base_spawn_interval_ms")]
    pub base_spawn_interval_ms: u64,

    /// How much the spawn interval shrinks per elapsed day.
    #[serde(default = "default_spawn_acceleration_per_day_ms")]
    pub spawn_acceleration_per_day_ms: u64,

    /// Floor on the spawn interval regardless of day.
    #[serde(default = "default_min_spawn_interval_ms")]
    pub min_spawn_interval_ms: u64,

    /// Patience lost per tick per point of biome difficulty.
    #[serde(default = "default_patience_decay_rate")]
    pub patience_decay_rate: Decimal,

    /// Floor on prep time regardless of kitchen level.
    #[serde(default = "default_min_prep_time_ms")]
    pub min_prep_time_ms: u64,

    /// Prep time removed per kitchen level.
    #[serde(default = "default_prep_time_reduction_per_level_ms")]
    pub prep_time_reduction_per_level_ms: u64,

    /// Patience every customer spawns with.
    #[serde(default = "default_max_patience")]
    pub max_patience: u32,

    /// Stamina cap for the day (overridable per run).
    #[serde(default = "default_max_stamina")]
    pub max_stamina: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            day_duration_ms: default_day_duration_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            max_concurrent_customers: default_max_concurrent_customers(),
            base_spawn_interval_ms: default_base_spawn_interval_ms(),
            spawn_acceleration_per_day_ms: default_spawn_acceleration_per_day_ms(),
            min_spawn_interval_ms: default_min_spawn_interval_ms(),
            patience_decay_rate: default_patience_decay_rate(),
            min_prep_time_ms: default_min_prep_time_ms(),
            prep_time_reduction_per_level_ms: default_prep_time_reduction_per_level_ms(),
            max_patience: default_max_patience(),
            max_stamina: default_max_stamina(),
        }
    }
}

impl ServiceConfig {
    /// Spawn interval for the given day:
    /// `max(min, base - day * acceleration)`.
    pub fn spawn_interval_for_day(&self, day: u32) -> Duration {
        let accelerated = self
            .spawn_acceleration_per_day_ms
            .saturating_mul(u64::from(day));
        let interval = self
            .base_spawn_interval_ms
            .saturating_sub(accelerated)
            .max(self.min_spawn_interval_ms);
        Duration::from_millis(interval)
    }

    /// Effective prep time for a dish at the given kitchen level:
    /// `max(min_prep, prep - level * reduction)`.
    pub fn effective_prep_time(&self, prep_time_ms: u64, kitchen_level: u32) -> Duration {
        let reduction = self
            .prep_time_reduction_per_level_ms
            .saturating_mul(u64::from(kitchen_level));
        let effective = prep_time_ms
            .saturating_sub(reduction)
            .max(self.min_prep_time_ms);
        Duration::from_millis(effective)
    }

    /// Patience lost per tick in the given biome difficulty.
    pub fn decay_per_tick(&self, biome_difficulty: u32) -> Decimal {
        self.patience_decay_rate
            .checked_mul(Decimal::from(biome_difficulty))
            .unwrap_or(Decimal::ZERO)
    }

    /// The day length as a [`Duration`].
    pub const fn day_duration(&self) -> Duration {
        Duration::from_millis(self.day_duration_ms)
    }
}

/// Run-level starting values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Gold at the start of a fresh run.
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,

    /// Stamina at the start of a fresh run.
    #[serde(default = "default_starting_stamina")]
    pub starting_stamina: u32,

    /// Reputation at the start of a fresh run.
    #[serde(default = "default_starting_reputation")]
    pub starting_reputation: u32,

    /// Kitchen level at the start of a fresh run.
    #[serde(default = "default_starting_level")]
    pub kitchen_level: u32,

    /// Marketing level at the start of a fresh run.
    #[serde(default = "default_starting_level")]
    pub marketing_level: u32,

    /// Decor level at the start of a fresh run.
    #[serde(default = "default_starting_level")]
    pub decor_level: u32,

    /// Percent chance (0-100) of a narrative event after a settled day.
    #[serde(default = "default_event_chance_pct")]
    pub event_chance_pct: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            starting_gold: default_starting_gold(),
            starting_stamina: default_starting_stamina(),
            starting_reputation: default_starting_reputation(),
            kitchen_level: default_starting_level(),
            marketing_level: default_starting_level(),
            decor_level: default_starting_level(),
            event_chance_pct: default_event_chance_pct(),
        }
    }
}

/// Boundaries for headless simulation runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Maximum days to simulate before stopping (0 = until game over).
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
        }
    }
}

/// Dish/event generator backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Backend name: `offline` or `openai`.
    #[serde(default = "default_generator_backend")]
    pub backend: String,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_generator_api_url")]
    pub api_url: String,

    /// Model identifier sent with each request.
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// API key; normally supplied via the `LLM_API_KEY` env var.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_generator_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl GeneratorConfig {
    /// Override the API key from the `LLM_API_KEY` environment variable
    /// when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LLM_API_KEY") {
            self.api_key = val;
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: default_generator_backend(),
            api_url: default_generator_api_url(),
            model: default_generator_model(),
            api_key: String::new(),
            request_timeout_ms: default_generator_timeout_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_day_duration_ms() -> u64 {
    60_000
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_max_concurrent_customers() -> usize {
    4
}

const fn default_base_spawn_interval_ms() -> u64 {
    4_000
}

const fn default_spawn_acceleration_per_day_ms() -> u64 {
    200
}

const fn default_min_spawn_interval_ms() -> u64 {
    1_000
}

fn default_patience_decay_rate() -> Decimal {
    Decimal::new(1, 1)
}

const fn default_min_prep_time_ms() -> u64 {
    500
}

const fn default_prep_time_reduction_per_level_ms() -> u64 {
    200
}

const fn default_max_patience() -> u32 {
    100
}

const fn default_max_stamina() -> u32 {
    100
}

const fn default_starting_gold() -> u32 {
    100
}

const fn default_starting_stamina() -> u32 {
    100
}

const fn default_starting_reputation() -> u32 {
    50
}

const fn default_starting_level() -> u32 {
    1
}

const fn default_event_chance_pct() -> u32 {
    50
}

const fn default_max_days() -> u32 {
    7
}

fn default_generator_backend() -> String {
    "offline".to_owned()
}

fn default_generator_api_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_generator_model() -> String {
    "gpt-4o-mini".to_owned()
}

const fn default_generator_timeout_ms() -> u64 {
    7_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_standard_preset() {
        let config = WagonConfig::default();
        let service = config.service_config();
        assert_eq!(service.day_duration_ms, 60_000);
        assert_eq!(service.max_concurrent_customers, 4);
        assert_eq!(service.min_spawn_interval_ms, 1_000);
        assert_eq!(service.patience_decay_rate, Decimal::new(1, 1));
    }

    #[test]
    fn gentle_preset_differs_only_in_documented_constants() {
        let gentle = ServicePreset::Gentle.config();
        let standard = ServicePreset::Standard.config();
        assert_eq!(gentle.max_concurrent_customers, 3);
        assert_eq!(gentle.min_spawn_interval_ms, 1_500);
        assert_eq!(gentle.patience_decay_rate, Decimal::new(5, 2));
        assert_eq!(gentle.day_duration_ms, standard.day_duration_ms);
        assert_eq!(gentle.base_spawn_interval_ms, standard.base_spawn_interval_ms);
    }

    #[test]
    fn parse_preset_from_yaml() {
        let config = WagonConfig::parse("preset: gentle\n").unwrap();
        assert_eq!(config.preset, ServicePreset::Gentle);
        assert_eq!(config.service_config().max_concurrent_customers, 3);
    }

    #[test]
    fn explicit_service_section_overrides_preset() {
        let yaml = "preset: gentle\nservice:\n  max_concurrent_customers: 6\n";
        let config = WagonConfig::parse(yaml).unwrap();
        assert_eq!(config.service_config().max_concurrent_customers, 6);
        // Unspecified fields fall back to standard defaults, not gentle.
        assert_eq!(config.service_config().min_spawn_interval_ms, 1_000);
    }

    #[test]
    fn parse_empty_mapping_uses_defaults() {
        let config = WagonConfig::parse("{}").unwrap();
        assert_eq!(config.run.starting_gold, 100);
        assert_eq!(config.simulation.max_days, 7);
    }

    #[test]
    fn spawn_interval_accelerates_then_floors() {
        let service = ServiceConfig::default();
        assert_eq!(service.spawn_interval_for_day(0), Duration::from_millis(4_000));
        assert_eq!(service.spawn_interval_for_day(5), Duration::from_millis(3_000));
        // Day 15 would be 1000ms exactly; day 100 clamps to the floor.
        assert_eq!(service.spawn_interval_for_day(100), Duration::from_millis(1_000));
    }

    #[test]
    fn prep_time_shrinks_with_kitchen_level_to_floor() {
        let service = ServiceConfig::default();
        assert_eq!(service.effective_prep_time(2_000, 1), Duration::from_millis(1_800));
        assert_eq!(service.effective_prep_time(2_000, 5), Duration::from_millis(1_000));
        assert_eq!(service.effective_prep_time(2_000, 50), Duration::from_millis(500));
    }

    #[test]
    fn decay_scales_linearly_with_difficulty() {
        let service = ServiceConfig::default();
        assert_eq!(service.decay_per_tick(1), Decimal::new(1, 1));
        assert_eq!(service.decay_per_tick(4), Decimal::new(4, 1));
    }

    #[test]
    fn decay_rate_parses_from_yaml_number() {
        let yaml = "service:\n  patience_decay_rate: 0.05\n";
        let config = WagonConfig::parse(yaml).unwrap();
        assert_eq!(config.service_config().patience_decay_rate, Decimal::new(5, 2));
    }
}
