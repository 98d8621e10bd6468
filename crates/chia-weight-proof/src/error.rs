use thiserror::Error;

/// Validation and construction failures for the weight proof v2 subsystem.
///
/// The validator surfaces these as a single boolean plus a log line (see
/// `validate_weight_proof`); construction collapses any of them into
/// `Option::None` at its public boundary and logs the specific reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("streamable {0}")]
    Streamable(#[from] chia_traits::Error),

    #[error("tip not found")]
    TipUnknown,

    #[error("insufficient chain: {0}")]
    InsufficientChain(&'static str),

    #[error("reconstructed sub-epoch summary hash disagrees with recent-chain anchor")]
    SummaryMismatch,

    #[error("required sub-epoch missing from segment groups")]
    SamplingMismatch,

    #[error("reward chain sub-slot hash does not match segment boundary fields")]
    BoundaryMismatch,

    #[error("VDF verification failed")]
    VdfInvalid,

    #[error("proof-of-space quality check failed")]
    PosInvalid,

    #[error("avg_slot_iters / avg_ip_iters below WEIGHT_PROOF_THRESHOLD")]
    RatioBelowThreshold,

    #[error("recent chain validation failed")]
    RecentChainInvalid,

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
