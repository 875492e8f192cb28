use super::ingredient::EffectSlot;
use super::player::PlayerProfile;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Fortify,
    Restore,
    Poison,
}

impl Polarity {
    pub fn is_poison(self) -> bool {
        self == Polarity::Poison
    }

    pub fn is_beneficial(self) -> bool {
        !self.is_poison()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Effect {
    pub name: String,
    pub id: String,
    pub base_magnitude: f64,
    pub base_duration: f64,
    pub base_cost: f64,

    #[serde(rename = "type")]
    pub polarity: Polarity,
    pub is_beneficial: bool,

    // when set, the player's scale lengthens the effect instead of strengthening it
    pub variable_duration: bool,

    #[serde(default)]
    pub description_template: Option<String>,
}

/// An effect scaled for one player, as it appears in a finished potion.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RealizedEffect {
    pub name: String,
    pub polarity: Polarity,
    pub magnitude: u32,
    pub duration: u32,
    pub value: u32,
}

impl RealizedEffect {
    pub fn is_poison(&self) -> bool {
        self.polarity.is_poison()
    }
}

/// Scale `effect` for `player`, starting from the ingredient's own magnitude and duration.
pub fn realize(effect: &Effect, slot: &EffectSlot, player: &PlayerProfile) -> RealizedEffect {
    let scale = player.scale(effect.polarity);

    let (magnitude, duration) = if effect.variable_duration {
        (slot.magnitude, slot.duration * scale)
    } else {
        (slot.magnitude * scale, slot.duration)
    };
    let magnitude = magnitude.round().max(0.0) as u32;
    let duration = duration.round().max(0.0) as u32;

    RealizedEffect {
        name: effect.name.clone(),
        polarity: effect.polarity,
        magnitude,
        duration,
        value: gold_value(effect.base_cost, magnitude, duration),
    }
}

/// `floor(cost * mag^1.1 * (dur/10)^1.1)`. A zero magnitude or duration is worth nothing.
pub fn gold_value(base_cost: f64, magnitude: u32, duration: u32) -> u32 {
    let magnitude_factor = (magnitude as f64).powf(1.1);
    let duration_factor = (duration as f64 / 10.0).powf(1.1);

    // float-to-int casts saturate: negative floors to 0, overflow to u32::MAX
    (base_cost * magnitude_factor * duration_factor).floor() as u32
}
