//! In-memory catalog fixtures for unit tests.

use super::catalog::Catalogs;
use super::effect::{Effect, Polarity};
use super::ingredient::{EffectSlot, Ingredient, Rarity, Source};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn create_test_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn effect(name: &str, cost: f64, polarity: Polarity, variable_duration: bool) -> Effect {
    Effect {
        name: name.to_string(),
        id: format!("test-{}", name),
        base_magnitude: 1.0,
        base_duration: 10.0,
        base_cost: cost,
        polarity,
        is_beneficial: polarity.is_beneficial(),
        variable_duration,
        description_template: None,
    }
}

pub fn slot(name: &str, magnitude: f64, duration: f64) -> EffectSlot {
    EffectSlot {
        name: name.to_string(),
        magnitude,
        duration,
    }
}

/// An ingredient whose slots all use magnitude 10 / duration 10.
pub fn ingredient(name: &str, effects: [&str; 4], rarity: Rarity) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        id: format!("test-{}", name),
        value: 1,
        weight: 0.1,
        effects: effects.map(|e| slot(e, 10.0, 10.0)),
        dlc: "base".to_string(),
        rarity,
        source: Source::Plant,
    }
}

/// Twelve effects `A`..`L`: `A`..`F` fortify, `G`..`H` restore, `I`..`L` poison, all costing 1.
pub fn fixture_effects() -> Vec<Effect> {
    let mut effects = vec![];
    for name in ["A", "B", "C", "D", "E", "F"] {
        effects.push(effect(name, 1.0, Polarity::Fortify, false));
    }
    for name in ["G", "H"] {
        effects.push(effect(name, 1.0, Polarity::Restore, false));
    }
    for name in ["I", "J", "K", "L"] {
        effects.push(effect(name, 1.0, Polarity::Poison, false));
    }
    effects
}

/// Catalog built from `fixture_effects` and the given ingredients.
pub fn fixture_catalogs(ingredients: Vec<Ingredient>) -> Catalogs {
    Catalogs::from_records(ingredients, fixture_effects()).unwrap()
}
