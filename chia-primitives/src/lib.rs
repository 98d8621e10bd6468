pub mod conditions;
pub mod puzzles;

mod derive_synthetic;
mod lineage_proof;
mod primitives;
mod sign;

pub use derive_synthetic::*;
pub use lineage_proof::*;
pub use primitives::*;
pub use sign::*;
