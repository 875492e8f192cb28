use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Unique,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::VeryRare,
        Rarity::Unique,
    ];
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Plant,
    Creature,
    Fish,
    Fungus,
    Food,
    Crafting,
    Misc,
    Drug,
}

/// One of an ingredient's four effects, with the ingredient's own magnitude and duration.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct EffectSlot {
    pub name: String,
    pub magnitude: f64,
    pub duration: f64,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct Ingredient {
    pub name: String,
    pub id: String,
    pub value: u32,
    pub weight: f64,

    pub effects: [EffectSlot; 4],

    pub dlc: String,
    pub rarity: Rarity,
    pub source: Source,
}

impl Ingredient {
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().map(|s| &s.name[..])
    }

    pub fn slot(&self, effect_name: &str) -> Option<&EffectSlot> {
        self.effects.iter().find(|s| s.name == effect_name)
    }

    pub fn has_effect(&self, effect_name: &str) -> bool {
        self.slot(effect_name).is_some()
    }
}
