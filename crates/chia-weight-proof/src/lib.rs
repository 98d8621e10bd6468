//! Weight proof v2 construction and validation.
//!
//! A weight proof lets a client that only trusts a genesis challenge
//! verify, without downloading the whole chain, that a peer's claimed tip
//! really does represent more accumulated proof-of-space-and-time work
//! than any chain the client already knows about. See the module-level
//! docs on [`segment`], [`sampling`], [`validator`] and [`handler`] for the
//! pieces this is built from.

pub mod error;
pub mod fork_point;
pub mod handler;
pub mod pot_iterations;
pub mod recent_chain;
pub mod sampling;
pub mod segment;
pub mod traits;
pub mod validator;

pub use error::{Error, Result};
pub use handler::WeightProofHandler;
pub use traits::{BlockchainStore, ProofOfSpaceVerifier, VdfVerifier};
