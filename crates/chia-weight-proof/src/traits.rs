//! External collaborators (spec §6): block storage, the VDF verifier, and
//! the proof-of-space verifier are consumed as opaque interfaces. This
//! module defines the trait boundary only; no concrete backing
//! implementation (database, chiavdf, chiapos) lives in this crate, the
//! same way `chia-consensus`'s own `vdf`/`proof_of_space` modules keep the
//! real implementations behind optional `chiavdf`/`chiapos` features.

use std::collections::HashMap;

use chia_protocol::{
    BlockRecord, Bytes32, ClassgroupElement, HeaderBlock, ProofOfSpace, SubEpochSummary, VDFInfo,
    VDFProof,
};

/// Storage and chain-index lookups the builder/validator need. Mirrors
/// spec §6's `BlockchainInterface` exactly.
#[allow(async_fn_in_trait)]
pub trait BlockchainStore {
    fn try_block_record(&self, header_hash: Bytes32) -> Option<BlockRecord>;
    async fn get_block_record_from_db(&self, header_hash: Bytes32) -> Option<BlockRecord>;
    fn height_to_hash(&self, height: u32) -> Option<Bytes32>;
    fn height_to_block_record(&self, height: u32) -> Option<BlockRecord>;
    /// The farmer-signed header block at `height`, carrying the real
    /// `ProofOfSpace`, VDF proofs, and `EndOfSubSlotBundle`s that
    /// `BlockRecord` alone does not retain.
    fn height_to_header_block(&self, height: u32) -> Option<HeaderBlock>;
    fn get_ses_heights(&self) -> Vec<u32>;
    fn get_ses(&self, height: u32) -> Option<SubEpochSummary>;
    fn get_block_records_at(&self, heights: &[u32]) -> Vec<Option<BlockRecord>>;
    fn get_block_records_in_range(&self, from: u32, to: u32) -> HashMap<Bytes32, BlockRecord>;
    fn get_header_blocks_in_range(
        &self,
        from: u32,
        to: u32,
        tx_filter: bool,
    ) -> HashMap<Bytes32, HeaderBlock>;
    async fn get_sub_epoch_challenge_segments_v2(
        &self,
        ses_block_hash: Bytes32,
    ) -> Option<Vec<crate::segment::SubEpochChallengeSegmentV2>>;
    async fn persist_sub_epoch_challenge_segments_v2(
        &self,
        ses_block_hash: Bytes32,
        segments: Vec<crate::segment::SubEpochChallengeSegmentV2>,
    );
    fn get_peak_height(&self) -> Option<u32>;
}

/// VDF re-expansion/verification, consumed as `verify_compressed_vdf` and
/// `compress_output`, plus the uncompressed end-of-slot check
/// (`crates/chia-consensus/src/vdf.rs`'s `validate_vdf_proof`).
pub trait VdfVerifier {
    /// Re-expands `proof`/`info` against `input` and returns the verified
    /// full-size output, or `None` if verification fails.
    fn verify_compressed_vdf(
        &self,
        input: &ClassgroupElement,
        info: &VDFInfo,
        proof: &VDFProof,
    ) -> Option<ClassgroupElement>;

    /// Produces the short representative of a VDF output.
    fn compress_output(&self, output: &ClassgroupElement) -> Vec<u8>;

    /// Validates an (uncompressed) end-of-slot VDF proof.
    fn validate_vdf_proof(
        &self,
        proof: &VDFProof,
        input_el: &ClassgroupElement,
        info: &VDFInfo,
        discriminant_size_bits: u16,
    ) -> bool;
}

/// Proof-of-space quality check, consumed as `verify_and_get_quality_string`.
pub trait ProofOfSpaceVerifier {
    fn verify_and_get_quality_string(
        &self,
        pos: &ProofOfSpace,
        plot_id: Bytes32,
    ) -> Option<Bytes32>;
}
