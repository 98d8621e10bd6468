pub mod allocator;
pub mod compression;
pub mod error;
pub mod fast_forward;
pub mod gen;
pub mod generator_rom;
pub mod merkle_set;

pub use chia_bls as bls;
pub use chia_protocol as protocol;
pub use chia_traits as traits;
pub use chia_wallet as wallet;
pub use clvm_derive::*;
pub use clvm_traits;
pub use clvm_utils;

pub use clvmr as clvm;

#[cfg(feature = "ssl")]
pub use chia_ssl as ssl;

#[cfg(feature = "client")]
pub use chia_client as client;
