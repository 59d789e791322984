//! Dish and event generation with guaranteed resolution.
//!
//! The service core requires that `special_dish` and `random_event`
//! always resolve to a valid, fully-populated value: one call, one
//! resolution, no retry, no timeout beyond the HTTP client's own. Any
//! backend failure or malformed response is caught here and replaced by
//! a documented fallback literal; nothing error-shaped ever escapes this
//! module.
//!
//! Generated events carry fixed mechanical effects regardless of their
//! narrative text: the first choice is +50 gold / -10 stamina, the
//! second is -10 reputation. The model only writes the words.

use rust_decimal::Decimal;
use serde::Deserialize;
use snackwagon_types::{Biome, Dish, EventChoice, EventId, RandomEvent, StatePatch};
use tracing::{info, warn};

use crate::error::ChefError;
use crate::llm::{BackendSettings, ChefBackend};

/// Prep time bounds applied to generated dishes, in milliseconds.
const PREP_TIME_BOUNDS: (u64, u64) = (500, 10_000);

const SPECIAL_SYSTEM_PROMPT: &str = "You are the head chef of a traveling cat food \
stall. Reply with a single JSON object: {\"name\": string, \"icon\": one emoji, \
\"basePrice\": number 8-40, \"prepTime\": milliseconds 500-10000, \"description\": \
one short sentence}. No other text.";

const EVENT_SYSTEM_PROMPT: &str = "You narrate small roadside events for a traveling \
cat food stall. Reply with a single JSON object: {\"title\": string, \"description\": \
one or two sentences, \"choice1Text\": string, \"choice1Outcome\": string, \
\"choice2Text\": string, \"choice2Outcome\": string}. No other text.";

/// The generator the run controller calls between and before days.
pub struct Chef {
    backend: ChefBackend,
}

impl Chef {
    /// Build a chef against the configured backend.
    pub fn new(settings: &BackendSettings) -> Self {
        let backend = ChefBackend::from_settings(settings);
        info!(backend = backend.name(), "chef ready");
        Self { backend }
    }

    /// A chef that never makes network calls.
    pub const fn offline() -> Self {
        Self {
            backend: ChefBackend::Offline,
        }
    }

    /// Generate the day's special dish for the given route.
    ///
    /// Never fails: an offline backend, a failed call, or a malformed
    /// response all resolve to the documented fallback special.
    pub async fn special_dish(&self, biome: &Biome) -> Dish {
        let user = format!(
            "Invent today's special for a stop in {} ({} weather, difficulty {}).",
            biome.name, biome.weather, biome.difficulty
        );
        match self.backend.complete(SPECIAL_SYSTEM_PROMPT, &user).await {
            Ok(raw) => parse_special(&raw).unwrap_or_else(|e| {
                warn!(error = %e, raw, "malformed special dish response, using fallback");
                fallback_special()
            }),
            Err(e) => {
                if !matches!(self.backend, ChefBackend::Offline) {
                    warn!(error = %e, "special dish generation failed, using fallback");
                }
                fallback_special()
            }
        }
    }

    /// Generate a post-day narrative event for the given route.
    ///
    /// Never fails: the offline backend yields the calm "Quiet Day"
    /// event; a failed call or malformed response yields "Sudden Rain".
    pub async fn random_event(&self, biome: &Biome) -> RandomEvent {
        let user = format!(
            "Narrate a small event after a day of service near {} ({}).",
            biome.name, biome.weather
        );
        match self.backend.complete(EVENT_SYSTEM_PROMPT, &user).await {
            Ok(raw) => parse_event(&raw).unwrap_or_else(|e| {
                warn!(error = %e, raw, "malformed event response, using failure event");
                sudden_rain()
            }),
            Err(e) => {
                if matches!(self.backend, ChefBackend::Offline) {
                    quiet_day()
                } else {
                    warn!(error = %e, "event generation failed, using failure event");
                    sudden_rain()
                }
            }
        }
    }
}

/// The raw JSON shape the model produces for a special dish.
#[derive(Debug, Deserialize)]
struct RawSpecial {
    name: String,
    icon: String,
    #[serde(rename = "basePrice")]
    base_price: Decimal,
    #[serde(rename = "prepTime")]
    prep_time_ms: u64,
    #[serde(default)]
    description: String,
}

/// The raw JSON shape the model produces for an event.
#[derive(Debug, Deserialize)]
struct RawEvent {
    title: String,
    description: String,
    #[serde(rename = "choice1Text")]
    choice1_text: String,
    #[serde(rename = "choice1Outcome")]
    choice1_outcome: String,
    #[serde(rename = "choice2Text")]
    choice2_text: String,
    #[serde(rename = "choice2Outcome")]
    choice2_outcome: String,
}

/// Parse a special dish from raw response text.
fn parse_special(raw: &str) -> Result<Dish, ChefError> {
    let raw: RawSpecial = serde_json::from_str(clean_json(raw))?;
    if raw.name.trim().is_empty() || raw.icon.trim().is_empty() {
        return Err(ChefError::Parse("special dish missing name or icon".to_owned()));
    }
    if raw.base_price <= Decimal::ZERO {
        return Err(ChefError::Parse(format!(
            "special dish price {} is not positive",
            raw.base_price
        )));
    }
    let (min_prep, max_prep) = PREP_TIME_BOUNDS;
    Ok(Dish::special(
        raw.name.trim(),
        raw.icon.trim(),
        raw.base_price,
        raw.prep_time_ms.clamp(min_prep, max_prep),
        raw.description.trim(),
    ))
}

/// Parse a narrative event from raw response text, attaching the fixed
/// mechanical effects.
fn parse_event(raw: &str) -> Result<RandomEvent, ChefError> {
    let raw: RawEvent = serde_json::from_str(clean_json(raw))?;
    if raw.title.trim().is_empty() {
        return Err(ChefError::Parse("event missing title".to_owned()));
    }
    Ok(RandomEvent {
        id: EventId::new(),
        title: raw.title.trim().to_owned(),
        description: raw.description.trim().to_owned(),
        choices: vec![
            EventChoice {
                text: raw.choice1_text,
                outcome_text: raw.choice1_outcome,
                effect: StatePatch {
                    gold: Decimal::from(50),
                    stamina: -10,
                    reputation: 0,
                },
            },
            EventChoice {
                text: raw.choice2_text,
                outcome_text: raw.choice2_outcome,
                effect: StatePatch::reputation(-10),
            },
        ],
    })
}

/// Strip a markdown code fence when the model wraps its JSON in one.
fn clean_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

/// The documented fallback special: always on hand when the generator
/// is unreachable.
pub fn fallback_special() -> Dish {
    Dish::special(
        "Traveler's Stew",
        "🥘",
        Decimal::from(20),
        3_000,
        "A hearty stew that warms the road-weary.",
    )
}

/// The offline event: nothing happened, pick how to spend the evening.
pub fn quiet_day() -> RandomEvent {
    RandomEvent {
        id: EventId::new(),
        title: "Quiet Day".to_owned(),
        description: "The road is calm tonight. The wagon creaks softly as you decide \
            how to spend the evening."
            .to_owned(),
        choices: vec![
            EventChoice {
                text: "Relax by the fire".to_owned(),
                outcome_text: "You feel rested and ready for tomorrow.".to_owned(),
                effect: StatePatch::stamina(10),
            },
            EventChoice {
                text: "Clean up the wagon".to_owned(),
                outcome_text: "A tidy stall leaves a good impression.".to_owned(),
                effect: StatePatch::reputation(5),
            },
        ],
    }
}

/// The failure event, substituted when a generation call goes wrong.
pub fn sudden_rain() -> RandomEvent {
    RandomEvent {
        id: EventId::new(),
        title: "Sudden Rain".to_owned(),
        description: "A storm rolls in without warning. You scramble to cover the \
            wagon before everything is soaked."
            .to_owned(),
        choices: vec![
            EventChoice {
                text: "Haul everything inside".to_owned(),
                outcome_text: "You save the stock, but the effort leaves you drained.".to_owned(),
                effect: StatePatch::stamina(-20),
            },
            EventChoice {
                text: "Let the rain fall".to_owned(),
                outcome_text: "Some supplies are ruined and must be replaced.".to_owned(),
                effect: StatePatch::gold(Decimal::from(-30)),
            },
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use snackwagon_types::BiomeKind;

    use super::*;

    fn biome() -> Biome {
        Biome {
            kind: BiomeKind::Desert,
            name: "Sunbaked Dunes".to_owned(),
            description: String::new(),
            difficulty: 3,
            weather: "Heatwave".to_owned(),
        }
    }

    #[test]
    fn parse_special_valid() {
        let raw = r#"{"name": "Starlight Ramen", "icon": "🍜", "basePrice": 24, "prepTime": 2500, "description": "Noodles under the night sky."}"#;
        let dish = parse_special(raw).unwrap();
        assert_eq!(dish.name, "Starlight Ramen");
        assert_eq!(dish.base_price, Decimal::from(24));
        assert_eq!(dish.prep_time_ms, 2_500);
        assert!(dish.special);
        assert!(dish.id.as_str().starts_with("special-"));
    }

    #[test]
    fn parse_special_strips_code_fence() {
        let raw = "```json\n{\"name\": \"Dune Dumplings\", \"icon\": \"🥟\", \"basePrice\": 12, \"prepTime\": 1500}\n```";
        let dish = parse_special(raw).unwrap();
        assert_eq!(dish.name, "Dune Dumplings");
    }

    #[test]
    fn parse_special_clamps_prep_time() {
        let raw = r#"{"name": "Instant Snack", "icon": "🍙", "basePrice": 9, "prepTime": 1}"#;
        assert_eq!(parse_special(raw).unwrap().prep_time_ms, 500);
        let raw = r#"{"name": "Slow Roast", "icon": "🍖", "basePrice": 30, "prepTime": 99999}"#;
        assert_eq!(parse_special(raw).unwrap().prep_time_ms, 10_000);
    }

    #[test]
    fn parse_special_rejects_bad_values() {
        assert!(parse_special("not json at all").is_err());
        assert!(parse_special(r#"{"name": "", "icon": "🍜", "basePrice": 10, "prepTime": 2000}"#).is_err());
        assert!(parse_special(r#"{"name": "Free Lunch", "icon": "🍜", "basePrice": 0, "prepTime": 2000}"#).is_err());
    }

    #[test]
    fn parsed_events_carry_fixed_effects() {
        let raw = r#"{"title": "A Stray Follows", "description": "A kitten trails the wagon.",
            "choice1Text": "Feed it", "choice1Outcome": "It purrs.",
            "choice2Text": "Shoo it away", "choice2Outcome": "It slinks off."}"#;
        let event = parse_event(raw).unwrap();
        assert_eq!(event.choices.len(), 2);
        let first = event.choices.first().unwrap();
        assert_eq!(first.effect.gold, Decimal::from(50));
        assert_eq!(first.effect.stamina, -10);
        let second = event.choices.get(1).unwrap();
        assert_eq!(second.effect, StatePatch::reputation(-10));
    }

    #[test]
    fn fallback_special_matches_documented_literal() {
        let dish = fallback_special();
        assert_eq!(dish.name, "Traveler's Stew");
        assert_eq!(dish.icon, "🥘");
        assert_eq!(dish.base_price, Decimal::from(20));
        assert_eq!(dish.prep_time_ms, 3_000);
        assert!(dish.special);
    }

    #[tokio::test]
    async fn offline_chef_serves_the_fallback_special() {
        let chef = Chef::offline();
        let dish = chef.special_dish(&biome()).await;
        assert_eq!(dish.name, "Traveler's Stew");
    }

    #[tokio::test]
    async fn offline_chef_narrates_a_quiet_day() {
        let chef = Chef::offline();
        let event = chef.random_event(&biome()).await;
        assert_eq!(event.title, "Quiet Day");
        assert_eq!(event.choices.first().unwrap().effect, StatePatch::stamina(10));
        assert_eq!(
            event.choices.get(1).unwrap().effect,
            StatePatch::reputation(5)
        );
    }

    #[test]
    fn failure_event_drains_resources() {
        let event = sudden_rain();
        assert_eq!(event.title, "Sudden Rain");
        assert_eq!(event.choices.first().unwrap().effect, StatePatch::stamina(-20));
        assert_eq!(
            event.choices.get(1).unwrap().effect,
            StatePatch::gold(Decimal::from(-30))
        );
    }
}
