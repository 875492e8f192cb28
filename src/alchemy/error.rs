//! Error types for the alchemy simulator.
//!
//! Each failure class has its own enum so callers can tell a bad request
//! (`ConfigurationError`, `StrategyError`) from an expected rejection inside
//! enumeration (`ConstructionError`).

use thiserror::Error;

/// Bad input: unknown names, out-of-range stats, malformed data or parameters.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Unknown effect `{effect}` referenced by ingredient `{ingredient}`")]
    UnknownEffect { ingredient: String, effect: String },

    #[error("Duplicate {kind} in catalog: {name}")]
    DuplicateEntry { kind: &'static str, name: String },

    #[error("Invalid catalog entry `{name}`: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("{stat} must be within {min}..={max}, got {got}")]
    StatOutOfRange {
        stat: &'static str,
        min: u32,
        max: u32,
        got: u32,
    },

    #[error("Unknown inventory generation strategy: {0}")]
    UnknownGenerationStrategy(String),

    #[error("Invalid generation parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A candidate ingredient set that cannot form a potion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("A potion needs 2 or 3 ingredients, got {0}")]
    IngredientCount(usize),

    #[error("Ingredient listed more than once: {0}")]
    DuplicateIngredient(String),

    #[error("Ingredients {0:?} share no effect")]
    NoSharedEffect(Vec<String>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Quantity added for {name} must be positive, got {qty}")]
    NonPositiveQuantity { name: String, qty: u32 },

    #[error("Adding {qty} {name} to the {held} held exceeds the maximum stack")]
    QuantityOverflow { name: String, held: u32, qty: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("No inventory set, call set_inventory() first")]
    NoInventory,

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Crate error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
