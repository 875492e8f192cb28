//! Potion construction.
//!
//! Building a potion is a short pipeline over the realized effects:
//! intersect the ingredients' effects, realize each shared effect for the
//! player, pick the dominant effect, and (with the Purity perk) drop every
//! effect of the opposite polarity before totalling the value.

use super::catalog::Catalogs;
use super::describer::EffectDescriber;
use super::effect::{realize, RealizedEffect};
use super::error::{ConfigurationError, ConstructionError, Result};
use super::player::PlayerProfile;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Potion {
    name: String,
    ingredient_names: Vec<String>,
    effects: Vec<RealizedEffect>,
    total_value: u32,
    dominant: RealizedEffect,
}

impl Potion {
    /// `"Potion of <effect>"` or `"Poison of <effect>"` after the dominant effect.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredient_names(&self) -> &[String] {
        &self.ingredient_names
    }

    pub fn effects(&self) -> &[RealizedEffect] {
        &self.effects
    }

    pub fn total_value(&self) -> u32 {
        self.total_value
    }

    pub fn dominant_effect(&self) -> &RealizedEffect {
        &self.dominant
    }

    pub fn is_poison(&self) -> bool {
        self.dominant.is_poison()
    }

    /// Ingredient names in sorted order, the key used to break ties between candidates.
    pub fn sorted_ingredient_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ingredient_names.iter().map(|n| &n[..]).collect();
        names.sort_unstable();
        names
    }

    pub fn to_record_described(&self, md: &EffectDescriber) -> PotionRecord {
        let mut record = PotionRecord::from(self);
        for (r, e) in record.effects.iter_mut().zip(&self.effects) {
            r.description = Some(md.description(e));
        }
        record
    }

    pub fn display(&self, md: &EffectDescriber, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Ingredients: {}", self.ingredient_names.join(", "))?;
        writeln!(f, "Total Value: {} gold", self.total_value)?;

        writeln!(f, "--------")?;
        for e in &self.effects {
            md.describe(e, f)?;
        }

        Ok(())
    }

    fn assemble(
        ingredient_names: Vec<String>,
        effects: Vec<RealizedEffect>,
        purity: bool,
    ) -> Option<Potion> {
        let original_dominant = dominant_effect(&effects)?.clone();

        let effects = if purity {
            retain_dominant_polarity(effects)
        } else {
            effects
        };
        let dominant = dominant_effect(&effects)
            .cloned()
            .unwrap_or(original_dominant);
        let total_value = effects
            .iter()
            .fold(0u32, |total, e| total.saturating_add(e.value));

        let prefix = if dominant.is_poison() {
            "Poison"
        } else {
            "Potion"
        };

        Some(Potion {
            name: format!("{} of {}", prefix, dominant.name),
            ingredient_names,
            effects,
            total_value,
            dominant,
        })
    }
}

/// Highest-value effect; the earliest one wins a tie.
pub fn dominant_effect(effects: &[RealizedEffect]) -> Option<&RealizedEffect> {
    let mut best: Option<&RealizedEffect> = None;
    for e in effects {
        if best.map_or(true, |b| e.value > b.value) {
            best = Some(e);
        }
    }
    best
}

/// Purity stage: keep only the effects on the dominant effect's side (poison or beneficial).
pub fn retain_dominant_polarity(effects: Vec<RealizedEffect>) -> Vec<RealizedEffect> {
    let poison = match dominant_effect(&effects) {
        Some(d) => d.is_poison(),
        None => return effects,
    };
    effects
        .into_iter()
        .filter(|e| e.is_poison() == poison)
        .collect()
}

/// Builds potions for one player against one pair of catalogs.
#[derive(Clone, Copy)]
pub struct PotionBuilder<'a> {
    catalogs: &'a Catalogs,
    player: &'a PlayerProfile,
}

impl<'a> PotionBuilder<'a> {
    pub fn new(catalogs: &'a Catalogs, player: &'a PlayerProfile) -> Self {
        Self { catalogs, player }
    }

    pub fn build<S: AsRef<str>>(&self, names: &[S]) -> Result<Potion> {
        if !(2..=3).contains(&names.len()) {
            return Err(ConstructionError::IngredientCount(names.len()).into());
        }

        let mut ingredients = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if names[..i].iter().any(|n| n.as_ref() == name) {
                return Err(ConstructionError::DuplicateIngredient(name.to_string()).into());
            }
            ingredients.push(self.catalogs.ingredient(name)?);
        }
        let ingredient_names: Vec<String> = ingredients.iter().map(|i| i.name.clone()).collect();

        let first = ingredients[0];
        let rest = &ingredients[1..];

        let mut effects = vec![];
        // shared by every ingredient, not just some pair
        for s in first
            .effects
            .iter()
            .filter(|s| rest.iter().all(|ing| ing.has_effect(&s.name)))
        {
            for other in rest {
                if let Some(o) = other.slot(&s.name) {
                    if o != s {
                        debug!(
                            effect = %s.name,
                            authoritative = %first.name,
                            ignored = %other.name,
                            "Divergent effect override"
                        );
                    }
                }
            }

            let effect =
                self.catalogs
                    .effect(&s.name)
                    .ok_or_else(|| ConfigurationError::UnknownEffect {
                        ingredient: first.name.clone(),
                        effect: s.name.clone(),
                    })?;
            effects.push(realize(effect, s, self.player));
        }

        match Potion::assemble(ingredient_names.clone(), effects, self.player.has_purity()) {
            Some(p) => Ok(p),
            None => Err(ConstructionError::NoSharedEffect(ingredient_names).into()),
        }
    }
}

/// Transport shape of a potion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PotionRecord {
    pub name: String,
    pub ingredient_names: Vec<String>,
    pub total_value: u32,
    pub effects: Vec<EffectRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub name: String,
    pub magnitude: u32,
    pub duration: u32,
    pub value: u32,
    pub is_poison: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Potion> for PotionRecord {
    fn from(p: &Potion) -> Self {
        PotionRecord {
            name: p.name.clone(),
            ingredient_names: p.ingredient_names.clone(),
            total_value: p.total_value,
            effects: p
                .effects
                .iter()
                .map(|e| EffectRecord {
                    name: e.name.clone(),
                    magnitude: e.magnitude,
                    duration: e.duration,
                    value: e.value,
                    is_poison: e.is_poison(),
                    description: None,
                })
                .collect(),
        }
    }
}

impl Serialize for Potion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        PotionRecord::from(self).serialize(serializer)
    }
}
