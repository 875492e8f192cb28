pub mod alembic;
pub mod catalog;
pub mod combinations;
pub mod describer;
pub mod effect;
pub mod error;
pub mod generation;
pub mod ingredient;
pub mod inventory;
pub mod paths;
pub mod player;
pub mod potion;
pub mod simulation;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use alembic::{Alembic, Recompute};
pub use catalog::Catalogs;
pub use describer::EffectDescriber;
pub use error::{Error, Result};
pub use generation::{GenerationConfig, GenerationStrategy};
pub use inventory::Inventory;
pub use player::{PlayerConfig, PlayerProfile};
pub use potion::{Potion, PotionBuilder};
pub use simulation::{run_simulation, RunRecord, SimConfig};
