//! Genlib Tree - relationsindex, frågor och layout för släktträd
//!
//! Läser en platt datamängd med personer och relationer och bygger
//! oföränderliga index som alla frågor och layouter arbetar mot.

pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use models::*;
pub use services::{Normalizer, TreeIndex};
pub use utils::{AppError, AppResult};

/// Läs, normalisera och indexera en datamängd i JSON-format
pub fn load_index(json: &str, normalizer: &Normalizer) -> AppResult<TreeIndex> {
    let dataset = normalizer.load_str(json)?;
    Ok(TreeIndex::build(dataset))
}
