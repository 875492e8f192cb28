//! Random inventory generation.
//!
//! Three statistical models, each driven by an explicit random source:
//! - `normal`: normally distributed size, uniform selection, chi-squared quantities
//! - `random_weighted`: same size model, rarity-weighted selection and
//!   rarity-specific chi-squared quantities
//! - `vendor`: per-rarity shop slots, each filled with a fixed probability

use super::catalog::Catalogs;
use super::error::ConfigurationError;
use super::ingredient::Rarity;
use super::inventory::Inventory;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Never stocked by vendors.
pub const VENDOR_BLACKLIST: [&str; 5] = [
    "Ancestor Moth Wing",
    "Chaurus Hunter Antennae",
    "Crimson Nirnroot",
    "Glowing Mushroom",
    "Gleamblossom",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    Normal,
    RandomWeighted,
    Vendor,
}

impl GenerationStrategy {
    pub fn name(self) -> &'static str {
        match self {
            GenerationStrategy::Normal => "normal",
            GenerationStrategy::RandomWeighted => "random_weighted",
            GenerationStrategy::Vendor => "vendor",
        }
    }
}

impl FromStr for GenerationStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.replace('-', "_")[..] {
            "normal" => Ok(GenerationStrategy::Normal),
            "random_weighted" => Ok(GenerationStrategy::RandomWeighted),
            "vendor" => Ok(GenerationStrategy::Vendor),
            _ => Err(ConfigurationError::UnknownGenerationStrategy(s.to_string())),
        }
    }
}

/// Number of distinct ingredients: `Normal(mean, std_dev)`, truncated, clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeParams {
    pub mean: f64,
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
}

/// Stock of one ingredient: `ChiSquared(df) * scale`, truncated, clamped to `[min_qty, max_qty]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantityParams {
    pub df: f64,
    pub scale: f64,
    pub min_qty: u32,
    pub max_qty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityTable<T> {
    pub common: T,
    pub uncommon: T,
    pub rare: T,
    pub very_rare: T,
    pub unique: T,
}

impl<T> RarityTable<T> {
    pub fn get(&self, rarity: Rarity) -> &T {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Uncommon => &self.uncommon,
            Rarity::Rare => &self.rare,
            Rarity::VeryRare => &self.very_rare,
            Rarity::Unique => &self.unique,
        }
    }
}

/// A vendor's shelf space for one rarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VendorTier {
    pub slots: u32,
    pub spawn_chance: f64,
    pub min_qty: u32,
    pub max_qty: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorParams {
    pub blacklist: Vec<String>,
    // rarities without a tier are never stocked
    pub tiers: RarityTable<Option<VendorTier>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub size: SizeParams,
    pub normal_quantity: QuantityParams,
    pub rarity_weights: RarityTable<f64>,
    pub weighted_quantity: RarityTable<QuantityParams>,
    pub vendor: VendorParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let chi2 = |df, scale, max_qty| QuantityParams {
            df,
            scale,
            min_qty: 1,
            max_qty,
        };
        let tier = |slots, max_qty| {
            Some(VendorTier {
                slots,
                spawn_chance: 0.75,
                min_qty: 1,
                max_qty,
            })
        };

        Self {
            size: SizeParams {
                mean: 35.0,
                std_dev: 10.0,
                min: 10,
                max: 70,
            },
            normal_quantity: chi2(5.0, 1.5, 50),
            rarity_weights: RarityTable {
                common: 1.0,
                uncommon: 0.85,
                rare: 0.7,
                very_rare: 0.5,
                unique: 0.3,
            },
            weighted_quantity: RarityTable {
                common: chi2(5.0, 1.5, 50),
                uncommon: chi2(3.0, 1.2, 30),
                rare: chi2(1.5, 0.7, 10),
                very_rare: chi2(1.0, 0.5, 5),
                unique: chi2(1.0, 0.3, 3),
            },
            vendor: VendorParams {
                blacklist: VENDOR_BLACKLIST.iter().map(|s| s.to_string()).collect(),
                tiers: RarityTable {
                    common: tier(15, 5),
                    uncommon: tier(10, 3),
                    rare: tier(5, 2),
                    very_rare: None,
                    unique: None,
                },
            },
        }
    }
}

fn invalid(reason: String) -> ConfigurationError {
    ConfigurationError::InvalidParameters(reason)
}

fn check_range(what: &str, min: u32, max: u32) -> Result<(), ConfigurationError> {
    if min == 0 || min > max {
        return Err(invalid(format!(
            "{} quantity range {}..={} must satisfy 1 <= min <= max",
            what, min, max
        )));
    }
    Ok(())
}

impl QuantityParams {
    fn validate(&self, what: &str) -> Result<(), ConfigurationError> {
        if !(self.df.is_finite() && self.df > 0.0) {
            return Err(invalid(format!("{} df must be positive, got {}", what, self.df)));
        }
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(invalid(format!(
                "{} scale must be non-negative, got {}",
                what, self.scale
            )));
        }
        check_range(what, self.min_qty, self.max_qty)
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let s = &self.size;
        if !(s.mean.is_finite() && s.std_dev.is_finite() && s.std_dev >= 0.0) || s.min > s.max {
            return Err(invalid(format!("bad size parameters {:?}", s)));
        }

        self.normal_quantity.validate("normal")?;

        for rarity in Rarity::ALL {
            let what = format!("{:?}", rarity);

            let w = *self.rarity_weights.get(rarity);
            if !(w.is_finite() && w >= 0.0) {
                return Err(invalid(format!("{} weight must be non-negative, got {}", what, w)));
            }

            self.weighted_quantity.get(rarity).validate(&what)?;

            if let Some(t) = self.vendor.tiers.get(rarity) {
                if !(0.0..=1.0).contains(&t.spawn_chance) {
                    return Err(invalid(format!(
                        "{} vendor spawn chance must be within 0..=1, got {}",
                        what, t.spawn_chance
                    )));
                }
                check_range(&format!("{} vendor", what), t.min_qty, t.max_qty)?;
            }
        }

        Ok(())
    }
}

pub fn sample_inventory_size(
    params: &SizeParams,
    rng: &mut impl Rng,
) -> Result<usize, ConfigurationError> {
    let normal = Normal::new(params.mean, params.std_dev)
        .map_err(|e| invalid(format!("size distribution: {}", e)))?;
    // negative draws saturate to 0 before clamping
    let size = normal.sample(rng).trunc() as usize;
    Ok(size.clamp(params.min, params.max))
}

pub fn sample_quantity(
    params: &QuantityParams,
    rng: &mut impl Rng,
) -> Result<u32, ConfigurationError> {
    let chi2 = ChiSquared::new(params.df)
        .map_err(|e| invalid(format!("quantity distribution: {}", e)))?;
    let raw = chi2.sample(rng) * params.scale;
    Ok((raw as u32).clamp(params.min_qty, params.max_qty))
}

fn target_size(
    catalogs: &Catalogs,
    size: Option<usize>,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<usize, ConfigurationError> {
    let size = match size {
        Some(s) => s,
        None => sample_inventory_size(&config.size, rng)?,
    };
    Ok(size.min(catalogs.ingredients().len()))
}

/// Uniformly chosen distinct ingredients with chi-squared quantities.
pub fn generate_normal(
    catalogs: &Catalogs,
    size: Option<usize>,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<Inventory, ConfigurationError> {
    config.validate()?;
    let size = target_size(catalogs, size, config, rng)?;

    let mut items = Vec::with_capacity(size);
    for ing in catalogs.ingredients().choose_multiple(rng, size) {
        let qty = sample_quantity(&config.normal_quantity, rng)?;
        items.push((ing.name.clone(), qty));
    }

    let inventory = Inventory::from_items(items);
    debug!(
        strategy = "normal",
        unique = inventory.unique_items(),
        total = inventory.total_items(),
        "Generated inventory"
    );
    Ok(inventory)
}

/// Distinct ingredients drawn with rarity weights, with rarity-specific quantities.
pub fn generate_random_weighted(
    catalogs: &Catalogs,
    size: Option<usize>,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<Inventory, ConfigurationError> {
    config.validate()?;
    let size = target_size(catalogs, size, config, rng)?;

    let selected: Vec<_> = catalogs
        .ingredients()
        .choose_multiple_weighted(&mut *rng, size, |ing| *config.rarity_weights.get(ing.rarity))
        .map_err(|e| invalid(format!("rarity weights: {}", e)))?
        .collect();

    let mut items = Vec::with_capacity(selected.len());
    for ing in selected {
        let qty = sample_quantity(config.weighted_quantity.get(ing.rarity), rng)?;
        items.push((ing.name.clone(), qty));
    }

    let inventory = Inventory::from_items(items);
    debug!(
        strategy = "random_weighted",
        unique = inventory.unique_items(),
        total = inventory.total_items(),
        "Generated inventory"
    );
    Ok(inventory)
}

/// A shop's stock: every tier slot spawns an ingredient of that rarity with its spawn chance.
pub fn generate_vendor(
    catalogs: &Catalogs,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<Inventory, ConfigurationError> {
    config.validate()?;
    let vendor = &config.vendor;

    let mut picked: BTreeMap<&str, VendorTier> = BTreeMap::new();
    for rarity in Rarity::ALL {
        let tier = match vendor.tiers.get(rarity) {
            Some(t) => t,
            None => continue,
        };

        let pool: Vec<&str> = catalogs
            .ingredients()
            .iter()
            .filter(|i| i.rarity == rarity && !vendor.blacklist.contains(&i.name))
            .map(|i| &i.name[..])
            .collect();

        for _ in 0..tier.slots {
            if rng.gen_bool(tier.spawn_chance) {
                if let Some(&name) = pool.choose(rng) {
                    picked.insert(name, *tier);
                }
            }
        }
    }

    let mut items = Vec::with_capacity(picked.len());
    for (name, tier) in picked {
        items.push((name, rng.gen_range(tier.min_qty..=tier.max_qty)));
    }

    let inventory = Inventory::from_items(items);
    debug!(
        strategy = "vendor",
        unique = inventory.unique_items(),
        total = inventory.total_items(),
        "Generated inventory"
    );
    Ok(inventory)
}

/// Dispatch by strategy. `size` is ignored by `vendor`, whose size follows from its tiers.
pub fn generate(
    strategy: GenerationStrategy,
    catalogs: &Catalogs,
    size: Option<usize>,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> Result<Inventory, ConfigurationError> {
    match strategy {
        GenerationStrategy::Normal => generate_normal(catalogs, size, config, rng),
        GenerationStrategy::RandomWeighted => generate_random_weighted(catalogs, size, config, rng),
        GenerationStrategy::Vendor => generate_vendor(catalogs, config, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alchemy::test_support::create_test_rng;
    use std::collections::{HashMap, HashSet};

    fn catalogs() -> Catalogs {
        Catalogs::bundled().unwrap()
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!(
            "random-weighted".parse::<GenerationStrategy>().unwrap(),
            GenerationStrategy::RandomWeighted
        );
        assert_eq!(
            "vendor".parse::<GenerationStrategy>().unwrap(),
            GenerationStrategy::Vendor
        );
        for s in [
            GenerationStrategy::Normal,
            GenerationStrategy::RandomWeighted,
            GenerationStrategy::Vendor,
        ] {
            assert_eq!(s.name().parse::<GenerationStrategy>().unwrap(), s);
        }
        assert!(matches!(
            "lottery".parse::<GenerationStrategy>(),
            Err(ConfigurationError::UnknownGenerationStrategy(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        GenerationConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut config = GenerationConfig::default();
        config.normal_quantity.df = 0.0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.weighted_quantity.rare.min_qty = 0;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.vendor.tiers.common = Some(VendorTier {
            slots: 3,
            spawn_chance: 1.5,
            min_qty: 1,
            max_qty: 2,
        });
        let mut rng = create_test_rng(1);
        assert!(generate_vendor(&catalogs(), &config, &mut rng).is_err());
    }

    #[test]
    fn size_is_clamped() {
        let params = SizeParams {
            mean: 500.0,
            std_dev: 10.0,
            min: 10,
            max: 70,
        };
        let mut rng = create_test_rng(3);
        for _ in 0..100 {
            assert_eq!(sample_inventory_size(&params, &mut rng).unwrap(), 70);
        }

        let params = SizeParams {
            mean: -500.0,
            ..params
        };
        assert_eq!(sample_inventory_size(&params, &mut rng).unwrap(), 10);
    }

    #[test]
    fn quantity_is_clamped() {
        let params = QuantityParams {
            df: 5.0,
            scale: 1.5,
            min_qty: 2,
            max_qty: 4,
        };
        let mut rng = create_test_rng(4);
        for _ in 0..500 {
            let q = sample_quantity(&params, &mut rng).unwrap();
            assert!((2..=4).contains(&q));
        }
    }

    #[test]
    fn normal_respects_explicit_size() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();
        let mut rng = create_test_rng(12345);

        let inv = generate_normal(&catalogs, Some(20), &config, &mut rng).unwrap();
        assert_eq!(inv.unique_items(), 20);
        assert!(inv.iter().all(|(_, q)| (1..=50).contains(&q)));
        assert!(inv.iter().all(|(n, _)| catalogs.contains_ingredient(n)));

        let everything = generate_normal(&catalogs, Some(10_000), &config, &mut rng).unwrap();
        assert_eq!(everything.unique_items(), catalogs.ingredients().len());
    }

    #[test]
    fn normal_sampled_size_within_bounds() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();
        let mut rng = create_test_rng(99);
        for _ in 0..50 {
            let inv = generate_normal(&catalogs, None, &config, &mut rng).unwrap();
            assert!((10..=70).contains(&inv.unique_items()));
        }
    }

    #[test]
    fn same_seed_same_inventory() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();
        for strategy in [
            GenerationStrategy::Normal,
            GenerationStrategy::RandomWeighted,
            GenerationStrategy::Vendor,
        ] {
            let a = generate(strategy, &catalogs, None, &config, &mut create_test_rng(42)).unwrap();
            let b = generate(strategy, &catalogs, None, &config, &mut create_test_rng(42)).unwrap();
            assert_eq!(a, b, "{} is not reproducible", strategy.name());
        }

        let a = generate_normal(&catalogs, None, &config, &mut create_test_rng(1)).unwrap();
        let b = generate_normal(&catalogs, None, &config, &mut create_test_rng(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn weighted_favours_commons() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();
        let mut rng = create_test_rng(2024);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..300 {
            let inv = generate_random_weighted(&catalogs, Some(10), &config, &mut rng).unwrap();
            assert_eq!(inv.unique_items(), 10);
            for (name, _) in inv.iter() {
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        let commons: Vec<&str> = catalogs
            .ingredients()
            .iter()
            .filter(|i| i.rarity == Rarity::Common)
            .map(|i| &i.name[..])
            .collect();
        let common_total: u32 = commons.iter().map(|n| counts.get(*n).copied().unwrap_or(0)).sum();
        let common_average = common_total as f64 / commons.len() as f64;
        let unique = counts.get("Jarrin Root").copied().unwrap_or(0) as f64;

        assert!(unique < common_average);
    }

    #[test]
    fn weighted_quantities_follow_rarity() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();
        let mut rng = create_test_rng(5);

        for _ in 0..50 {
            let inv = generate_random_weighted(&catalogs, None, &config, &mut rng).unwrap();
            for (name, qty) in inv.iter() {
                let rarity = catalogs.ingredient(name).unwrap().rarity;
                let params = config.weighted_quantity.get(rarity);
                assert!(qty >= params.min_qty && qty <= params.max_qty);
            }
        }
    }

    #[test]
    fn vendor_never_stocks_blacklisted_or_rarest() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();

        for seed in 0..200 {
            let inv = generate_vendor(&catalogs, &config, &mut create_test_rng(seed)).unwrap();
            for (name, qty) in inv.iter() {
                assert!(!VENDOR_BLACKLIST.contains(&name), "seed {} stocked {}", seed, name);

                let rarity = catalogs.ingredient(name).unwrap().rarity;
                let tier = config.vendor.tiers.get(rarity).unwrap();
                assert!(qty >= tier.min_qty && qty <= tier.max_qty);
            }
        }
    }

    #[test]
    fn vendor_seeds_vary_stock_size() {
        let catalogs = catalogs();
        let config = GenerationConfig::default();

        let sizes: HashSet<usize> = (0..20)
            .map(|seed| {
                generate_vendor(&catalogs, &config, &mut create_test_rng(seed))
                    .unwrap()
                    .unique_items()
            })
            .collect();
        assert!(sizes.len() > 1);
    }

    #[test]
    fn vendor_with_certain_spawns_fills_every_tier() {
        let catalogs = catalogs();
        let mut config = GenerationConfig::default();
        for tier in [
            &mut config.vendor.tiers.common,
            &mut config.vendor.tiers.uncommon,
            &mut config.vendor.tiers.rare,
        ] {
            if let Some(t) = tier {
                t.spawn_chance = 1.0;
            }
        }

        let inv = generate_vendor(&catalogs, &config, &mut create_test_rng(8)).unwrap();
        for rarity in [Rarity::Common, Rarity::Uncommon, Rarity::Rare] {
            assert!(inv
                .iter()
                .any(|(n, _)| catalogs.ingredient(n).unwrap().rarity == rarity));
        }
    }

    #[test]
    fn config_round_trips_through_json_with_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"size": {"mean": 12, "std_dev": 2, "min": 5, "max": 20}}"#)
                .unwrap();
        assert_eq!(config.size.max, 20);
        assert_eq!(config.normal_quantity, GenerationConfig::default().normal_quantity);
    }
}
