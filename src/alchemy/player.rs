use super::effect::Polarity;
use super::error::ConfigurationError;
use serde::{Deserialize, Serialize};

pub const MAX_SKILL: u32 = 100;
pub const MAX_ALCHEMIST_PERK_LEVEL: u32 = 5;

const ALCHEMIST_BONUS_PER_LEVEL: f64 = 20.0;
const PHYSICIAN_MULTIPLIER: f64 = 1.25;
const BENEFACTOR_MULTIPLIER: f64 = 1.25;
const POISONER_MULTIPLIER: f64 = 1.25;
const SEEKER_MULTIPLIER: f64 = 1.10;

/// Flat player record as it arrives from a caller.
///
/// Missing fields fall back to the base player: skill 15, no enchantments, no perks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub alchemy_skill: u32,
    pub fortify_alchemy: u32,
    pub alchemist_perk_level: u32,
    pub is_physician: bool,
    pub is_benefactor: bool,
    pub is_poisoner: bool,
    pub is_seeker: bool,
    pub has_purity: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            alchemy_skill: 15,
            fortify_alchemy: 0,
            alchemist_perk_level: 0,
            is_physician: false,
            is_benefactor: false,
            is_poisoner: false,
            is_seeker: false,
            has_purity: false,
        }
    }
}

/// Validated, immutable player stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerProfile {
    config: PlayerConfig,
}

impl PlayerProfile {
    pub fn new(config: PlayerConfig) -> Result<Self, ConfigurationError> {
        if config.alchemy_skill > MAX_SKILL {
            return Err(ConfigurationError::StatOutOfRange {
                stat: "alchemy_skill",
                min: 0,
                max: MAX_SKILL,
                got: config.alchemy_skill,
            });
        }
        if config.alchemist_perk_level > MAX_ALCHEMIST_PERK_LEVEL {
            return Err(ConfigurationError::StatOutOfRange {
                stat: "alchemist_perk_level",
                min: 0,
                max: MAX_ALCHEMIST_PERK_LEVEL,
                got: config.alchemist_perk_level,
            });
        }
        Ok(Self { config })
    }

    /// Skill 15, no perks.
    pub fn base() -> Self {
        Self {
            config: PlayerConfig::default(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn has_purity(&self) -> bool {
        self.config.has_purity
    }

    /// Product of the perk bonuses that apply to an effect of the given polarity.
    pub fn perk_multiplier(&self, polarity: Polarity) -> f64 {
        let c = &self.config;
        let mut multiplier =
            1.0 + c.alchemist_perk_level as f64 * ALCHEMIST_BONUS_PER_LEVEL / 100.0;

        if c.is_physician && polarity == Polarity::Restore {
            multiplier *= PHYSICIAN_MULTIPLIER;
        }
        if c.is_benefactor && polarity.is_beneficial() {
            multiplier *= BENEFACTOR_MULTIPLIER;
        }
        if c.is_poisoner && polarity.is_poison() {
            multiplier *= POISONER_MULTIPLIER;
        }
        if c.is_seeker {
            multiplier *= SEEKER_MULTIPLIER;
        }

        multiplier
    }

    /// Factor applied to the scaled quantity (magnitude or duration) of an effect.
    pub fn scale(&self, polarity: Polarity) -> f64 {
        let c = &self.config;
        4.0 * (1.0 + c.alchemy_skill as f64 / 200.0)
            * (1.0 + c.fortify_alchemy as f64 / 100.0)
            * self.perk_multiplier(polarity)
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::base()
    }
}
