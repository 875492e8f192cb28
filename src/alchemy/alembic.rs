use super::catalog::Catalogs;
use super::combinations;
use super::describer::EffectDescriber;
use super::error::{Result, StrategyError};
use super::inventory::Inventory;
use super::player::{PlayerConfig, PlayerProfile};
use super::potion::Potion;
use super::strategy;
use std::fmt;
use tracing::debug;

/// When the potion list is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recompute {
    /// After every change to the player, ingredients or inventory.
    #[default]
    Eager,
    /// Only on an explicit `recompute()`.
    Manual,
}

/// Stateful simulator: a player, a working set of ingredient names, an
/// optional inventory, and the potions the ingredients can make.
pub struct Alembic<'a> {
    catalogs: &'a Catalogs,
    player: PlayerProfile,
    ingredients: Option<Vec<String>>,
    inventory: Option<Inventory>,
    potions: Vec<Potion>,
    mode: Recompute,
}

impl<'a> Alembic<'a> {
    pub fn new(
        catalogs: &'a Catalogs,
        config: PlayerConfig,
        ingredients: Option<Vec<String>>,
    ) -> Result<Self> {
        if let Some(names) = &ingredients {
            for n in names {
                catalogs.ingredient(n)?;
            }
        }

        let mut alembic = Self {
            catalogs,
            player: PlayerProfile::new(config)?,
            ingredients,
            inventory: None,
            potions: vec![],
            mode: Recompute::default(),
        };
        alembic.changed()?;
        Ok(alembic)
    }

    /// Skill 15, no fortification, no perks.
    pub fn from_base_player(catalogs: &'a Catalogs, ingredients: Option<Vec<String>>) -> Result<Self> {
        Self::new(catalogs, PlayerConfig::default(), ingredients)
    }

    pub fn with_recompute(mut self, mode: Recompute) -> Self {
        self.mode = mode;
        self
    }

    pub fn player(&self) -> &PlayerProfile {
        &self.player
    }

    pub fn ingredients(&self) -> Option<&[String]> {
        self.ingredients.as_deref()
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    /// In generation order: pairs first, then triples.
    pub fn potions(&self) -> &[Potion] {
        &self.potions
    }

    /// Most valuable first; equal values keep generation order.
    pub fn potions_by_value(&self) -> Vec<&Potion> {
        let mut sorted: Vec<&Potion> = self.potions.iter().collect();
        sorted.sort_by(|a, b| b.total_value().cmp(&a.total_value()));
        sorted
    }

    pub fn update_player(&mut self, config: PlayerConfig) -> Result<()> {
        self.player = PlayerProfile::new(config)?;
        self.changed()
    }

    /// Adding a name already in the working set does nothing.
    pub fn add_ingredient(&mut self, name: &str) -> Result<()> {
        self.catalogs.ingredient(name)?;

        let names = self.ingredients.get_or_insert_with(Vec::new);
        if names.iter().any(|n| n == name) {
            return Ok(());
        }
        names.push(name.to_string());
        self.changed()
    }

    /// Returns false if `name` was not in the working set.
    pub fn remove_ingredient(&mut self, name: &str) -> Result<bool> {
        let names = match &mut self.ingredients {
            Some(names) => names,
            None => return Ok(false),
        };
        let len = names.len();
        names.retain(|n| n != name);
        if names.len() == len {
            return Ok(false);
        }
        self.changed()?;
        Ok(true)
    }

    /// Replaces the working set with the inventory's available ingredients.
    pub fn set_inventory(&mut self, inventory: Inventory) -> Result<()> {
        for (name, _) in inventory.iter() {
            self.catalogs.ingredient(name)?;
        }
        self.ingredients = Some(inventory.available_ingredients());
        self.inventory = Some(inventory);
        self.changed()
    }

    /// Drops the inventory and the working set, keeping the player.
    pub fn delete_inventory(&mut self) {
        self.inventory = None;
        self.ingredients = None;
        self.potions.clear();
    }

    /// Regenerate the potion list from the working set.
    pub fn recompute(&mut self) -> Result<()> {
        self.potions = match &self.ingredients {
            Some(names) => combinations::generate(names, self.catalogs, &self.player)?,
            None => vec![],
        };
        debug!(potions = self.potions.len(), "Recomputed potions");
        Ok(())
    }

    /// Craft from the inventory with the named strategy until nothing more can be made.
    ///
    /// Afterwards the working set is whatever is left in the inventory.
    pub fn exhaust_inventory(&mut self, strategy_name: &str) -> Result<Vec<Potion>> {
        let inventory = self.inventory.as_mut().ok_or(StrategyError::NoInventory)?;
        let crafted = strategy::exhaust(inventory, strategy_name, self.catalogs, &self.player)?;

        self.ingredients = Some(inventory.available_ingredients());
        self.changed()?;
        Ok(crafted)
    }

    pub fn display(&self, md: &EffectDescriber, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Potions: {}", self.potions.len())?;
        for (i, p) in self.potions_by_value().into_iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "--- Potion {} ---", i + 1)?;
            p.display(md, f)?;
        }
        Ok(())
    }

    fn changed(&mut self) -> Result<()> {
        match self.mode {
            Recompute::Eager => self.recompute(),
            Recompute::Manual => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alchemy::error::{ConfigurationError, Error};

    fn names(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn eager_generation() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic =
            Alembic::from_base_player(&catalogs, names(&["Blue Mountain Flower", "Wheat"])).unwrap();
        assert_eq!(alembic.potions().len(), 1);

        alembic.add_ingredient("Hanging Moss").unwrap();
        assert!(alembic.potions().len() > 1);
        alembic.add_ingredient("Hanging Moss").unwrap();
        assert_eq!(alembic.ingredients().unwrap().len(), 3);

        assert!(alembic.remove_ingredient("Hanging Moss").unwrap());
        assert!(!alembic.remove_ingredient("Hanging Moss").unwrap());
        assert_eq!(alembic.potions().len(), 1);
    }

    #[test]
    fn manual_generation_waits_for_recompute() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic = Alembic::from_base_player(&catalogs, None)
            .unwrap()
            .with_recompute(Recompute::Manual);
        assert!(alembic.potions().is_empty());

        alembic.add_ingredient("Blue Mountain Flower").unwrap();
        alembic.add_ingredient("Wheat").unwrap();
        assert!(alembic.potions().is_empty());

        alembic.recompute().unwrap();
        assert_eq!(alembic.potions().len(), 1);
    }

    #[test]
    fn rejects_unknown_names_and_bad_players() {
        let catalogs = Catalogs::bundled().unwrap();
        assert!(matches!(
            Alembic::from_base_player(&catalogs, names(&["Wheat", "Moon Sugar Cookie"])),
            Err(Error::Configuration(ConfigurationError::UnknownIngredient(_)))
        ));

        let mut alembic = Alembic::from_base_player(&catalogs, None).unwrap();
        assert!(alembic.add_ingredient("Moon Sugar Cookie").is_err());
        assert!(alembic.ingredients().is_none());

        let bad = PlayerConfig {
            alchemy_skill: 101,
            ..Default::default()
        };
        assert!(alembic.update_player(bad).is_err());
        assert_eq!(alembic.player(), &PlayerProfile::base());
    }

    #[test]
    fn update_player_rescales_potions() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic =
            Alembic::from_base_player(&catalogs, names(&["Blue Mountain Flower", "Wheat"])).unwrap();
        let before = alembic.potions()[0].total_value();

        alembic
            .update_player(PlayerConfig {
                alchemy_skill: 100,
                alchemist_perk_level: 5,
                ..Default::default()
            })
            .unwrap();
        assert!(alembic.potions()[0].total_value() > before);
    }

    #[test]
    fn exhaust_needs_an_inventory() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic = Alembic::from_base_player(&catalogs, names(&["Wheat"])).unwrap();
        assert!(matches!(
            alembic.exhaust_inventory("basic-greedy"),
            Err(Error::Strategy(StrategyError::NoInventory))
        ));
    }

    #[test]
    fn inventory_lifecycle() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic = Alembic::from_base_player(&catalogs, None).unwrap();

        let inv = Inventory::from_items(vec![
            ("Blue Mountain Flower", 2),
            ("Wheat", 1),
            ("Hanging Moss", 1),
        ]);
        alembic.set_inventory(inv).unwrap();
        assert_eq!(alembic.ingredients().unwrap().len(), 3);
        assert!(!alembic.potions().is_empty());

        assert!(matches!(
            alembic.exhaust_inventory("best-guess"),
            Err(Error::Strategy(StrategyError::UnknownStrategy(_)))
        ));
        assert_eq!(alembic.inventory().unwrap().total_items(), 4);

        let crafted = alembic.exhaust_inventory("greedy-basic").unwrap();
        assert!(!crafted.is_empty());
        let left = alembic.inventory().unwrap();
        assert_eq!(alembic.ingredients().unwrap(), &left.available_ingredients()[..]);
        assert!(alembic.potions().is_empty());

        alembic.delete_inventory();
        assert!(alembic.inventory().is_none());
        assert!(alembic.ingredients().is_none());
        assert!(alembic.potions().is_empty());
    }

    #[test]
    fn set_inventory_rejects_unknown_names() {
        let catalogs = Catalogs::bundled().unwrap();
        let mut alembic = Alembic::from_base_player(&catalogs, None).unwrap();
        let inv = Inventory::from_items(vec![("Wheat", 1), ("Pixie Dust", 1)]);
        assert!(alembic.set_inventory(inv).is_err());
        assert!(alembic.inventory().is_none());
    }

    #[test]
    fn potions_by_value_descends() {
        let catalogs = Catalogs::bundled().unwrap();
        let alembic = Alembic::from_base_player(
            &catalogs,
            names(&[
                "Blue Mountain Flower",
                "Wheat",
                "Hanging Moss",
                "Nightshade",
                "Deathbell",
                "Imp Stool",
            ]),
        )
        .unwrap();

        let sorted = alembic.potions_by_value();
        assert_eq!(sorted.len(), alembic.potions().len());
        assert!(sorted
            .windows(2)
            .all(|w| w[0].total_value() >= w[1].total_value()));
    }
}
