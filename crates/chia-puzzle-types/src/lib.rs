mod derive_synthetic;
mod memos;
mod proof;
mod puzzles;

pub use derive_synthetic::*;
pub use memos::*;
pub use proof::*;
pub use puzzles::*;
