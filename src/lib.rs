//! Alchemy simulator: potion enumeration, gold valuation and inventory exhaustion.

pub mod alchemy;

pub use alchemy::error::{Error, Result};
