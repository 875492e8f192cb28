//! Read-only ingredient and effect tables.
//!
//! Built once from the JSON files under `data/` and shared by reference
//! afterwards. Every record is validated on the way in, so later lookups can
//! rely on each ingredient carrying four distinct, known effects.

use super::effect::Effect;
use super::error::ConfigurationError;
use super::ingredient::Ingredient;
use super::paths::{open_data, EFFECTS_FILE, INGREDIENTS_FILE};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUNDLED_INGREDIENTS: &str = include_str!("../../data/ingredients.json");
const BUNDLED_EFFECTS: &str = include_str!("../../data/effects.json");

#[derive(Debug, Clone)]
pub struct Catalogs {
    ingredients: Vec<Ingredient>,
    ingredient_index: HashMap<String, usize>,
    effects: Vec<Effect>,
    effect_index: HashMap<String, usize>,
}

/// Ingredients that disagree on the magnitude or duration of a shared effect.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideConflict {
    pub effect: String,
    pub variants: Vec<OverrideVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideVariant {
    pub magnitude: f64,
    pub duration: f64,
    pub ingredients: Vec<String>,
}

impl Catalogs {
    /// Load `ingredients.json` and `effects.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigurationError> {
        let ingredients = read_records(dir, INGREDIENTS_FILE)?;
        let effects = read_records(dir, EFFECTS_FILE)?;
        Self::from_records(ingredients, effects)
    }

    /// The data files compiled into the crate.
    pub fn bundled() -> Result<Self, ConfigurationError> {
        Self::from_json(BUNDLED_INGREDIENTS, BUNDLED_EFFECTS)
    }

    pub fn from_json(ingredients: &str, effects: &str) -> Result<Self, ConfigurationError> {
        let ingredients =
            serde_json::from_str(ingredients).map_err(|source| ConfigurationError::Parse {
                what: "ingredient records".to_string(),
                source,
            })?;
        let effects =
            serde_json::from_str(effects).map_err(|source| ConfigurationError::Parse {
                what: "effect records".to_string(),
                source,
            })?;
        Self::from_records(ingredients, effects)
    }

    pub fn from_records(
        ingredients: Vec<Ingredient>,
        effects: Vec<Effect>,
    ) -> Result<Self, ConfigurationError> {
        let mut effect_index = HashMap::with_capacity(effects.len());
        for (i, e) in effects.iter().enumerate() {
            validate_effect(e)?;
            if effect_index.insert(e.name.clone(), i).is_some() {
                return Err(ConfigurationError::DuplicateEntry {
                    kind: "effect",
                    name: e.name.clone(),
                });
            }
        }

        let mut ingredient_index = HashMap::with_capacity(ingredients.len());
        for (i, ing) in ingredients.iter().enumerate() {
            validate_ingredient(ing, &effect_index)?;
            if ingredient_index.insert(ing.name.clone(), i).is_some() {
                return Err(ConfigurationError::DuplicateEntry {
                    kind: "ingredient",
                    name: ing.name.clone(),
                });
            }
        }

        debug!(
            ingredients = ingredients.len(),
            effects = effects.len(),
            "Catalogs loaded"
        );

        Ok(Self {
            ingredients,
            ingredient_index,
            effects,
            effect_index,
        })
    }

    pub fn ingredient(&self, name: &str) -> Result<&Ingredient, ConfigurationError> {
        self.ingredient_index
            .get(name)
            .map(|&i| &self.ingredients[i])
            .ok_or_else(|| ConfigurationError::UnknownIngredient(name.to_string()))
    }

    pub fn contains_ingredient(&self, name: &str) -> bool {
        self.ingredient_index.contains_key(name)
    }

    pub fn effect(&self, name: &str) -> Option<&Effect> {
        self.effect_index.get(name).map(|&i| &self.effects[i])
    }

    /// All ingredients, in file order.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Effects whose per-ingredient magnitude/duration differs between ingredients.
    ///
    /// A potion realizes a shared effect with the first listed ingredient's values,
    /// so every entry here is a place where ingredient order can change a price.
    pub fn override_conflicts(&self) -> Vec<OverrideConflict> {
        let mut conflicts = vec![];

        for e in &self.effects {
            let mut variants: Vec<OverrideVariant> = vec![];
            for ing in &self.ingredients {
                let s = match ing.slot(&e.name) {
                    Some(s) => s,
                    None => continue,
                };
                match variants
                    .iter_mut()
                    .find(|v| v.magnitude == s.magnitude && v.duration == s.duration)
                {
                    Some(v) => v.ingredients.push(ing.name.clone()),
                    None => variants.push(OverrideVariant {
                        magnitude: s.magnitude,
                        duration: s.duration,
                        ingredients: vec![ing.name.clone()],
                    }),
                }
            }

            if variants.len() > 1 {
                conflicts.push(OverrideConflict {
                    effect: e.name.clone(),
                    variants,
                });
            }
        }

        conflicts
    }
}

fn read_records<T: DeserializeOwned>(dir: &Path, filename: &str) -> Result<T, ConfigurationError> {
    serde_json::from_reader(open_data(dir, filename)?).map_err(|source| {
        ConfigurationError::Parse {
            what: dir.join(filename).display().to_string(),
            source,
        }
    })
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidEntry {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn is_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

fn validate_effect(e: &Effect) -> Result<(), ConfigurationError> {
    if !is_non_negative(e.base_cost)
        || !is_non_negative(e.base_magnitude)
        || !is_non_negative(e.base_duration)
    {
        return Err(invalid(&e.name, "base cost, magnitude and duration must be non-negative"));
    }
    if e.is_beneficial != e.polarity.is_beneficial() {
        return Err(invalid(
            &e.name,
            format!("is_beneficial = {} contradicts type {:?}", e.is_beneficial, e.polarity),
        ));
    }
    Ok(())
}

fn validate_ingredient(
    ing: &Ingredient,
    effect_index: &HashMap<String, usize>,
) -> Result<(), ConfigurationError> {
    if !is_non_negative(ing.weight) {
        return Err(invalid(&ing.name, "weight must be non-negative"));
    }

    for (i, s) in ing.effects.iter().enumerate() {
        if !effect_index.contains_key(&s.name) {
            return Err(ConfigurationError::UnknownEffect {
                ingredient: ing.name.clone(),
                effect: s.name.clone(),
            });
        }
        if ing.effects[..i].iter().any(|prev| prev.name == s.name) {
            return Err(invalid(&ing.name, format!("effect {} listed twice", s.name)));
        }
        if !is_non_negative(s.magnitude) || !is_non_negative(s.duration) {
            return Err(invalid(
                &ing.name,
                format!("{} magnitude and duration must be non-negative", s.name),
            ));
        }
    }

    Ok(())
}
