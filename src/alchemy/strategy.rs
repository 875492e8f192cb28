//! Inventory exhaustion: craft potions until nothing more can be made.

use super::catalog::Catalogs;
use super::combinations;
use super::error::{Result, StrategyError};
use super::inventory::Inventory;
use super::player::PlayerProfile;
use super::potion::Potion;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Everything a strategy may look at when scoring a candidate.
pub struct ScoringContext<'a> {
    pub catalogs: &'a Catalogs,
    pub player: &'a PlayerProfile,
    pub inventory: &'a Inventory,
    /// Every potion craftable from `inventory` this step, most valuable first.
    pub candidates: &'a [Potion],
}

/// Order candidates the way [`ScoringContext::candidates`] expects.
pub fn sort_by_value(candidates: &mut [Potion]) {
    candidates.sort_by(|a, b| b.total_value().cmp(&a.total_value()));
}

/// Ranks candidate potions; the highest score is crafted next.
pub trait ScoringStrategy {
    fn name(&self) -> &'static str;
    fn score(&self, potion: &Potion, ctx: &ScoringContext) -> Result<f64>;
}

/// Most valuable potion first.
pub struct BasicGreedy;

impl ScoringStrategy for BasicGreedy {
    fn name(&self) -> &'static str {
        "basic-greedy"
    }

    fn score(&self, potion: &Potion, _ctx: &ScoringContext) -> Result<f64> {
        Ok(potion.total_value() as f64)
    }
}

/// Gold per ingredient spent.
pub struct EfficiencyWeighted;

impl ScoringStrategy for EfficiencyWeighted {
    fn name(&self) -> &'static str {
        "efficiency-weighted"
    }

    fn score(&self, potion: &Potion, _ctx: &ScoringContext) -> Result<f64> {
        Ok(potion.total_value() as f64 / potion.ingredient_names().len() as f64)
    }
}

/// Value of the potion plus the best potion still craftable after it.
pub struct LookaheadWeighted;

impl ScoringStrategy for LookaheadWeighted {
    fn name(&self) -> &'static str {
        "lookahead-weighted"
    }

    fn score(&self, potion: &Potion, ctx: &ScoringContext) -> Result<f64> {
        // anything craftable after `potion` is among this step's candidates, at the same value
        let used = potion.ingredient_names();
        let best_next = ctx
            .candidates
            .iter()
            .find(|next| {
                next.ingredient_names().iter().all(|n| {
                    let spent = used.contains(n) as u32;
                    ctx.inventory.quantity(n) > spent
                })
            })
            .map_or(0, |next| next.total_value());

        Ok(potion.total_value() as f64 + best_next as f64)
    }
}

/// Names accepted by [`strategy_by_name`].
pub const STRATEGY_NAMES: [&str; 4] = [
    "basic-greedy",
    "greedy-basic",
    "efficiency-weighted",
    "lookahead-weighted",
];

pub fn strategy_by_name(name: &str) -> std::result::Result<Box<dyn ScoringStrategy>, StrategyError> {
    match name {
        "basic-greedy" | "greedy-basic" => Ok(Box::new(BasicGreedy)),
        "efficiency-weighted" => Ok(Box::new(EfficiencyWeighted)),
        "lookahead-weighted" => Ok(Box::new(LookaheadWeighted)),
        _ => Err(StrategyError::UnknownStrategy(name.to_string())),
    }
}

/// Highest scoring candidate. Equal scores go to the candidate whose sorted
/// ingredient names come first lexicographically.
pub fn select<'p>(
    candidates: &'p [Potion],
    strategy: &dyn ScoringStrategy,
    ctx: &ScoringContext,
) -> Result<Option<&'p Potion>> {
    let mut best: Option<(f64, &Potion)> = None;

    for p in candidates {
        let score = strategy.score(p, ctx)?;
        let better = match best {
            None => true,
            Some((s, b)) => match score.total_cmp(&s) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => p.sorted_ingredient_names() < b.sorted_ingredient_names(),
            },
        };
        if better {
            best = Some((score, p));
        }
    }

    Ok(best.map(|(_, p)| p))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionState {
    Running,
    Exhausted,
}

/// Crafts one potion per step from a borrowed inventory, consuming its ingredients.
pub struct Exhaustion<'a> {
    catalogs: &'a Catalogs,
    player: &'a PlayerProfile,
    inventory: &'a mut Inventory,
    strategy: Box<dyn ScoringStrategy>,
    state: ExhaustionState,
    crafted: Vec<Potion>,
}

impl<'a> Exhaustion<'a> {
    pub fn new(
        catalogs: &'a Catalogs,
        player: &'a PlayerProfile,
        inventory: &'a mut Inventory,
        strategy: Box<dyn ScoringStrategy>,
    ) -> Self {
        Self {
            catalogs,
            player,
            inventory,
            strategy,
            state: ExhaustionState::Running,
            crafted: vec![],
        }
    }

    pub fn state(&self) -> ExhaustionState {
        self.state
    }

    pub fn crafted(&self) -> &[Potion] {
        &self.crafted
    }

    /// Craft the next potion, or `None` once nothing more can be made.
    pub fn step(&mut self) -> Result<Option<&Potion>> {
        if self.state == ExhaustionState::Exhausted {
            return Ok(None);
        }
        if self.inventory.is_empty() {
            self.finish();
            return Ok(None);
        }

        let mut candidates = combinations::generate(
            &self.inventory.available_ingredients(),
            self.catalogs,
            self.player,
        )?;
        sort_by_value(&mut candidates);

        let ctx = ScoringContext {
            catalogs: self.catalogs,
            player: self.player,
            inventory: &*self.inventory,
            candidates: &candidates,
        };
        let chosen = match select(&candidates, self.strategy.as_ref(), &ctx)? {
            Some(p) => p.clone(),
            None => {
                self.finish();
                return Ok(None);
            }
        };

        if !self.inventory.consume_recipe(chosen.ingredient_names()) {
            warn!(
                potion = chosen.name(),
                ingredients = ?chosen.ingredient_names(),
                "Candidate potion could not be paid for, stopping"
            );
            self.finish();
            return Ok(None);
        }

        debug!(
            step = self.crafted.len(),
            potion = chosen.name(),
            value = chosen.total_value(),
            candidates = candidates.len(),
            remaining = self.inventory.total_items(),
            "Crafted"
        );
        self.crafted.push(chosen);
        Ok(self.crafted.last())
    }

    /// Step until exhausted and hand back every crafted potion in order.
    pub fn run(mut self) -> Result<Vec<Potion>> {
        while self.step()?.is_some() {}
        Ok(self.crafted)
    }

    fn finish(&mut self) {
        self.state = ExhaustionState::Exhausted;
        info!(
            strategy = self.strategy.name(),
            potions = self.crafted.len(),
            gold = self.crafted.iter().map(|p| p.total_value() as u64).sum::<u64>(),
            leftover = self.inventory.total_items(),
            "Inventory exhausted"
        );
    }
}

/// Run `strategy_name` over `inventory` until nothing more can be crafted.
pub fn exhaust(
    inventory: &mut Inventory,
    strategy_name: &str,
    catalogs: &Catalogs,
    player: &PlayerProfile,
) -> Result<Vec<Potion>> {
    let strategy = strategy_by_name(strategy_name)?;
    Exhaustion::new(catalogs, player, inventory, strategy).run()
}
