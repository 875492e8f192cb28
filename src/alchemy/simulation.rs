//! Repeated generate-then-exhaust runs.

use super::catalog::Catalogs;
use super::error::Result;
use super::generation::{self, GenerationConfig, GenerationStrategy};
use super::inventory::Inventory;
use super::player::{PlayerConfig, PlayerProfile};
use super::potion::Potion;
use super::strategy::{self, strategy_by_name};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for a batch of simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of independent runs
    pub num_runs: u32,

    /// Run `i` is seeded with `seed + i` (None = random)
    pub seed: Option<u64>,

    /// `normal`, `random_weighted` or `vendor`
    pub inventory_strategy: String,

    /// Exhaustion strategy name
    pub strategy: String,

    /// Fixed number of distinct ingredients (None = sampled; ignored by `vendor`)
    pub inventory_size: Option<usize>,

    pub player: PlayerConfig,

    pub generation: GenerationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            inventory_strategy: "normal".to_string(),
            strategy: "basic-greedy".to_string(),
            inventory_size: None,
            player: PlayerConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub run_idx: u32,
    pub inventory_before: Inventory,
    pub inventory_after: Inventory,
    pub potions: Vec<Potion>,
}

impl RunRecord {
    pub fn total_value(&self) -> u64 {
        self.potions.iter().map(|p| p.total_value() as u64).sum()
    }
}

/// Run every simulation in `config`. All names and parameters are checked
/// before the first run.
pub fn run_simulation(catalogs: &Catalogs, config: &SimConfig) -> Result<Vec<RunRecord>> {
    let inventory_strategy: GenerationStrategy = config.inventory_strategy.parse()?;
    strategy_by_name(&config.strategy)?;
    config.generation.validate()?;
    let player = PlayerProfile::new(config.player)?;

    info!(
        runs = config.num_runs,
        seed = ?config.seed,
        inventory = inventory_strategy.name(),
        strategy = %config.strategy,
        "Starting simulation"
    );

    let mut runs = Vec::with_capacity(config.num_runs as usize);
    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let record = simulate_single_run(
            run_idx,
            catalogs,
            &player,
            inventory_strategy,
            config,
            &mut rng,
        )?;
        debug!(
            run = run_idx,
            potions = record.potions.len(),
            gold = record.total_value(),
            "Run finished"
        );
        runs.push(record);
    }

    info!(
        runs = runs.len(),
        gold = runs.iter().map(|r| r.total_value()).sum::<u64>(),
        "Simulation finished"
    );
    Ok(runs)
}

fn simulate_single_run(
    run_idx: u32,
    catalogs: &Catalogs,
    player: &PlayerProfile,
    inventory_strategy: GenerationStrategy,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Result<RunRecord> {
    let inventory_before = generation::generate(
        inventory_strategy,
        catalogs,
        config.inventory_size,
        &config.generation,
        rng,
    )?;

    let mut inventory_after = inventory_before.copy();
    let potions = strategy::exhaust(&mut inventory_after, &config.strategy, catalogs, player)?;

    Ok(RunRecord {
        run_idx,
        inventory_before,
        inventory_after,
        potions,
    })
}
