//! Segment data model and builder.
//!
//! Per `spec.md` §9 "Dynamic dispatch over 'is this a block or a slot
//! boundary'": the wire form (`chia_protocol::SubSlotDataV2`) stays a record
//! of optionals for backwards compatibility, but the in-memory
//! representation used by the builder and validator is a discriminated
//! `SubSlotData` enum, eliminating the `assert field.is_some()` pattern of
//! the original Python.

use chia_protocol::{
    BlockRecord, Bytes32, ChallengeChainSubSlot, ClassgroupElement, CompressedClassgroupElement,
    HeaderBlock, ProofOfSpace, RewardChainSubSlot, VDFInfo, VDFProof,
};
use chia_bls::G2Element;

use crate::error::{Error, Result};
use crate::traits::{BlockchainStore, VdfVerifier};

/// A block-producing entry in a segment's sub-slot-data sequence.
#[derive(Debug, Clone)]
pub struct BlockSubSlotData {
    pub proof_of_space: Option<ProofOfSpace>,
    pub cc_sp_proof: Option<VDFProof>,
    pub cc_ip_proof: VDFProof,
    pub signage_point_index: u8,
    pub cc_sp_output: Option<CompressedClassgroupElement>,
    pub cc_ip_output: CompressedClassgroupElement,
    pub icc_ip_proof: Option<VDFProof>,
    pub icc_ip_output: Option<CompressedClassgroupElement>,
    pub cc_sp_signature: Option<G2Element>,
    pub ip_iters: u64,
    pub total_iters: u128,
    /// Uncompressed `VDFInfo`s, present only on a segment the sampling
    /// oracle picked to validate in full. `compress_segment` clears these
    /// back to `None` for every sub-slot-data entry strictly after the
    /// challenge marker, on every segment except the one picked.
    pub cc_sp_info: Option<VDFInfo>,
    pub cc_ip_info: Option<VDFInfo>,
    pub icc_ip_info: Option<VDFInfo>,
}

/// An end-of-slot marker in a segment's sub-slot-data sequence.
#[derive(Debug, Clone)]
pub struct EndOfSlotSubSlotData {
    pub cc_slot_end_proof: Option<VDFProof>,
    pub cc_slot_end_output: Option<ClassgroupElement>,
    pub icc_slot_end_proof: Option<VDFProof>,
    pub icc_slot_end_output: Option<ClassgroupElement>,
    pub cc_slot_end_info: Option<VDFInfo>,
    pub icc_slot_end_info: Option<VDFInfo>,
}

#[derive(Debug, Clone)]
pub enum SubSlotData {
    Block(BlockSubSlotData),
    EndOfSlot(EndOfSlotSubSlotData),
}

impl SubSlotData {
    pub fn is_challenge(&self) -> bool {
        matches!(self, SubSlotData::Block(b) if b.proof_of_space.is_some())
    }

    pub fn is_end_of_slot(&self) -> bool {
        matches!(self, SubSlotData::EndOfSlot(_))
    }
}

impl From<SubSlotData> for chia_protocol::SubSlotDataV2 {
    fn from(value: SubSlotData) -> Self {
        match value {
            SubSlotData::Block(b) => chia_protocol::SubSlotDataV2 {
                proof_of_space: b.proof_of_space,
                cc_sp_proof: b.cc_sp_proof,
                cc_ip_proof: Some(b.cc_ip_proof),
                signage_point_index: Some(b.signage_point_index),
                cc_sp_output: b.cc_sp_output,
                cc_ip_output: Some(b.cc_ip_output),
                icc_ip_proof: b.icc_ip_proof,
                icc_ip_output: b.icc_ip_output,
                cc_sp_signature: b.cc_sp_signature,
                ip_iters: Some(b.ip_iters),
                total_iters: Some(b.total_iters),
                cc_slot_end_proof: None,
                cc_slot_end_output: None,
                icc_slot_end_proof: None,
                icc_slot_end_output: None,
                cc_sp_vdf_info: b.cc_sp_info,
                cc_ip_vdf_info: b.cc_ip_info,
                icc_ip_vdf_info: b.icc_ip_info,
                cc_slot_end_vdf_info: None,
                icc_slot_end_vdf_info: None,
            },
            SubSlotData::EndOfSlot(e) => chia_protocol::SubSlotDataV2 {
                proof_of_space: None,
                cc_sp_proof: None,
                cc_ip_proof: None,
                signage_point_index: None,
                cc_sp_output: None,
                cc_ip_output: None,
                icc_ip_proof: None,
                icc_ip_output: None,
                cc_sp_signature: None,
                ip_iters: None,
                total_iters: None,
                cc_slot_end_proof: e.cc_slot_end_proof,
                cc_slot_end_output: e.cc_slot_end_output,
                icc_slot_end_proof: e.icc_slot_end_proof,
                icc_slot_end_output: e.icc_slot_end_output,
                cc_sp_vdf_info: None,
                cc_ip_vdf_info: None,
                icc_ip_vdf_info: None,
                cc_slot_end_vdf_info: e.cc_slot_end_info,
                icc_slot_end_vdf_info: e.icc_slot_end_info,
            },
        }
    }
}

impl TryFrom<chia_protocol::SubSlotDataV2> for SubSlotData {
    type Error = Error;

    fn try_from(wire: chia_protocol::SubSlotDataV2) -> Result<Self> {
        let is_end_of_slot = wire.cc_slot_end_output.is_some()
            || wire.cc_slot_end_proof.is_some()
            || wire.icc_slot_end_output.is_some()
            || wire.icc_slot_end_proof.is_some();
        if is_end_of_slot {
            return Ok(SubSlotData::EndOfSlot(EndOfSlotSubSlotData {
                cc_slot_end_proof: wire.cc_slot_end_proof,
                cc_slot_end_output: wire.cc_slot_end_output,
                icc_slot_end_proof: wire.icc_slot_end_proof,
                icc_slot_end_output: wire.icc_slot_end_output,
                cc_slot_end_info: wire.cc_slot_end_vdf_info,
                icc_slot_end_info: wire.icc_slot_end_vdf_info,
            }));
        }
        let cc_ip_proof = wire
            .cc_ip_proof
            .ok_or_else(|| Error::Custom("block sub-slot-data missing cc_ip_proof".to_string()))?;
        let cc_ip_output = wire
            .cc_ip_output
            .ok_or_else(|| Error::Custom("block sub-slot-data missing cc_ip_output".to_string()))?;
        let signage_point_index = wire.signage_point_index.ok_or_else(|| {
            Error::Custom("block sub-slot-data missing signage_point_index".to_string())
        })?;
        let ip_iters = wire
            .ip_iters
            .ok_or_else(|| Error::Custom("block sub-slot-data missing ip_iters".to_string()))?;
        let total_iters = wire
            .total_iters
            .ok_or_else(|| Error::Custom("block sub-slot-data missing total_iters".to_string()))?;
        Ok(SubSlotData::Block(BlockSubSlotData {
            proof_of_space: wire.proof_of_space,
            cc_sp_proof: wire.cc_sp_proof,
            cc_ip_proof,
            signage_point_index,
            cc_sp_output: wire.cc_sp_output,
            cc_ip_output,
            icc_ip_proof: wire.icc_ip_proof,
            icc_ip_output: wire.icc_ip_output,
            cc_sp_signature: wire.cc_sp_signature,
            ip_iters,
            total_iters,
            cc_sp_info: wire.cc_sp_vdf_info,
            cc_ip_info: wire.cc_ip_vdf_info,
            icc_ip_info: wire.icc_ip_vdf_info,
        }))
    }
}

/// In-memory counterpart of `chia_protocol::SubEpochChallengeSegmentV2`.
#[derive(Debug, Clone)]
pub struct SubEpochChallengeSegmentV2 {
    pub sub_epoch_n: u32,
    pub sub_slot_data: Vec<SubSlotData>,
    pub rc_slot_end_info: Option<VDFInfo>,
    pub cc_slot_end_info: Option<VDFInfo>,
    pub icc_sub_slot_hash: Option<Bytes32>,
    pub prev_icc_ip_iters: Option<u64>,
}

impl From<SubEpochChallengeSegmentV2> for chia_protocol::SubEpochChallengeSegmentV2 {
    fn from(value: SubEpochChallengeSegmentV2) -> Self {
        chia_protocol::SubEpochChallengeSegmentV2 {
            sub_epoch_n: value.sub_epoch_n,
            sub_slot_data: value.sub_slot_data.into_iter().map(Into::into).collect(),
            rc_slot_end_info: value.rc_slot_end_info,
            cc_slot_end_info: value.cc_slot_end_info,
            icc_sub_slot_hash: value.icc_sub_slot_hash,
            prev_icc_ip_iters: value.prev_icc_ip_iters,
        }
    }
}

impl TryFrom<chia_protocol::SubEpochChallengeSegmentV2> for SubEpochChallengeSegmentV2 {
    type Error = Error;

    fn try_from(wire: chia_protocol::SubEpochChallengeSegmentV2) -> Result<Self> {
        Ok(SubEpochChallengeSegmentV2 {
            sub_epoch_n: wire.sub_epoch_n,
            sub_slot_data: wire
                .sub_slot_data
                .into_iter()
                .map(SubSlotData::try_from)
                .collect::<Result<Vec<_>>>()?,
            rc_slot_end_info: wire.rc_slot_end_info,
            cc_slot_end_info: wire.cc_slot_end_info,
            icc_sub_slot_hash: wire.icc_sub_slot_hash,
            prev_icc_ip_iters: wire.prev_icc_ip_iters,
        })
    }
}

/// Whether a block begins a new challenge slot (its deficit has reached
/// zero). Design-level mirror of `BlockRecord::is_challenge_block`.
pub fn is_challenge_block(block: &BlockRecord, min_blocks_per_challenge_block: u8) -> bool {
    block.is_challenge_block(min_blocks_per_challenge_block)
}

/// Walks a sub-epoch from its `se_start` anchor (two slots before the
/// sub-epoch's first block) and produces one `SubEpochChallengeSegmentV2`
/// per challenge block encountered, per `spec.md` §4.2.
///
/// `vdf` compresses each block-level output via `compress_output` as the
/// segment is assembled; the heavier VDF-output recomputation this involves
/// when a proof is not `normalized_to_identity` is delegated to the caller
/// through `compress_block_outputs`, keeping this walk itself free of VDF
/// math (spec §1 treats the VDF math as an external collaborator).
pub struct SegmentBuilder<'a, S: BlockchainStore, V: VdfVerifier> {
    pub store: &'a S,
    pub vdf: &'a V,
    pub min_blocks_per_challenge_block: u8,
}

impl<'a, S: BlockchainStore, V: VdfVerifier> SegmentBuilder<'a, S, V> {
    pub fn new(store: &'a S, vdf: &'a V, min_blocks_per_challenge_block: u8) -> Self {
        Self {
            store,
            vdf,
            min_blocks_per_challenge_block,
        }
    }

    /// Builds every challenge segment for the sub-epoch that begins at
    /// `first_in_sub_epoch` (inclusive), walking forward from `se_start`.
    /// `first_sub_epoch` indicates whether this is sub-epoch 0 (no boundary
    /// fields to attach to the first segment).
    pub fn build_sub_epoch_segments(
        &self,
        sub_epoch_n: u32,
        se_start: &BlockRecord,
        sub_epoch_end_height: u32,
        first_sub_epoch: bool,
    ) -> Result<Vec<SubEpochChallengeSegmentV2>> {
        let mut segments = Vec::new();
        let mut curr = se_start.clone();
        let mut first = true;
        loop {
            if curr.height > sub_epoch_end_height {
                break;
            }
            if is_challenge_block(&curr, self.min_blocks_per_challenge_block) {
                let segment =
                    self.build_challenge_segment(sub_epoch_n, &curr, first && !first_sub_epoch)?;
                segments.push(segment);
                first = false;
            }
            let Some(next) = self.store.height_to_block_record(curr.height + 1) else {
                break;
            };
            curr = next;
        }
        Ok(segments)
    }

    /// Builds a single challenge segment anchored at `challenge_block`.
    /// `attach_boundary` indicates the segment is the first one of a
    /// non-genesis sub-epoch and must carry `rc_slot_end_info`,
    /// `cc_slot_end_info`, `icc_sub_slot_hash`, `prev_icc_ip_iters`.
    fn build_challenge_segment(
        &self,
        sub_epoch_n: u32,
        challenge_block: &BlockRecord,
        attach_boundary: bool,
    ) -> Result<SubEpochChallengeSegmentV2> {
        let sub_slot_data = self.collect_sub_slot_data(challenge_block)?;

        let (rc_slot_end_info, cc_slot_end_info, icc_sub_slot_hash, prev_icc_ip_iters) =
            if attach_boundary {
                self.boundary_fields(challenge_block)?
            } else {
                (None, None, None, None)
            };

        Ok(SubEpochChallengeSegmentV2 {
            sub_epoch_n,
            sub_slot_data,
            rc_slot_end_info,
            cc_slot_end_info,
            icc_sub_slot_hash,
            prev_icc_ip_iters,
        })
    }

    /// Accumulates the per-block VDF data and per-slot-boundary end-of-slot
    /// data from the slot start through the challenge block and on to the
    /// end of the challenge slot (`spec.md` §4.2 step 3).
    fn collect_sub_slot_data(&self, challenge_block: &BlockRecord) -> Result<Vec<SubSlotData>> {
        let mut entries = Vec::new();

        // Step back to the start of the slot: the first block whose
        // predecessor has deficit == 0, or height 0.
        let mut slot_start = challenge_block.clone();
        while slot_start.height > 0 {
            let Some(prev) = self.store.height_to_block_record(slot_start.height - 1) else {
                break;
            };
            if prev.deficit == 0 {
                break;
            }
            slot_start = prev;
        }

        let slot_start_height = slot_start.height;
        let mut curr = slot_start;
        loop {
            if curr.first_in_sub_slot() && curr.height != slot_start_height {
                entries.extend(self.handle_slot_end(&curr)?);
            }
            entries.push(self.handle_block_vdfs(&curr)?);
            if curr.height == challenge_block.height {
                break;
            }
            let Some(next) = self.store.height_to_block_record(curr.height + 1) else {
                break;
            };
            curr = next;
        }

        // Walk forward from the challenge block until the challenge slot
        // ends (a block whose deficit equals min_blocks_per_challenge_block).
        let mut height = challenge_block.height + 1;
        while let Some(block) = self.store.height_to_block_record(height) {
            if block.deficit == self.min_blocks_per_challenge_block {
                break;
            }
            if block.first_in_sub_slot() {
                entries.extend(self.handle_slot_end(&block)?);
            }
            entries.push(self.handle_block_vdfs(&block)?);
            height += 1;
        }

        Ok(entries)
    }

    /// Fetches the header block backing `block`, erroring out rather than
    /// silently fabricating data when the store doesn't have it.
    fn header_for(&self, block: &BlockRecord) -> Result<HeaderBlock> {
        self.store.height_to_header_block(block.height).ok_or_else(|| {
            Error::Custom(format!("no header block at height {}", block.height))
        })
    }

    /// Synthesizes the end-of-slot marker(s) preceding `block`, the first
    /// block of a new sub-slot: one entry per `EndOfSubSlotBundle` the
    /// header block carries (more than one when the chain skipped empty
    /// sub-slots), each populated from the bundle's real VDF proofs and
    /// `VDFInfo`s.
    fn handle_slot_end(&self, block: &BlockRecord) -> Result<Vec<SubSlotData>> {
        let header = self.header_for(block)?;
        Ok(header
            .finished_sub_slots
            .iter()
            .map(|bundle| {
                SubSlotData::EndOfSlot(EndOfSlotSubSlotData {
                    cc_slot_end_proof: Some(bundle.proofs.challenge_chain_slot_proof.clone()),
                    cc_slot_end_output: Some(
                        bundle.challenge_chain.challenge_chain_end_of_slot_vdf.output,
                    ),
                    icc_slot_end_proof: bundle.proofs.infused_challenge_chain_slot_proof.clone(),
                    icc_slot_end_output: bundle
                        .infused_challenge_chain
                        .as_ref()
                        .map(|icc| icc.infused_challenge_chain_end_of_slot_vdf.output),
                    cc_slot_end_info: Some(
                        bundle.challenge_chain.challenge_chain_end_of_slot_vdf.clone(),
                    ),
                    icc_slot_end_info: bundle
                        .infused_challenge_chain
                        .as_ref()
                        .map(|icc| icc.infused_challenge_chain_end_of_slot_vdf.clone()),
                })
            })
            .collect())
    }

    /// Builds a single block's `SubSlotData` from its `HeaderBlock`: real
    /// `ProofOfSpace` (on the challenge-block entry only), real VDF proofs
    /// and `VDFInfo`s, and the compressed outputs derived from them via
    /// `compress_output`.
    fn handle_block_vdfs(&self, block: &BlockRecord) -> Result<SubSlotData> {
        let header = self.header_for(block)?;
        let rcb = &header.reward_chain_block;

        let cc_ip_output =
            CompressedClassgroupElement::from(self.vdf.compress_output(&rcb.challenge_chain_ip_vdf.output));
        let icc_ip_output = rcb
            .infused_challenge_chain_ip_vdf
            .as_ref()
            .map(|info| CompressedClassgroupElement::from(self.vdf.compress_output(&info.output)));
        let cc_sp_output = rcb
            .challenge_chain_sp_vdf
            .as_ref()
            .map(|info| CompressedClassgroupElement::from(self.vdf.compress_output(&info.output)));

        let proof_of_space = if is_challenge_block(block, self.min_blocks_per_challenge_block) {
            Some(rcb.proof_of_space.clone())
        } else {
            None
        };

        Ok(SubSlotData::Block(BlockSubSlotData {
            proof_of_space,
            cc_sp_proof: header.challenge_chain_sp_proof.clone(),
            cc_ip_proof: header.challenge_chain_ip_proof.clone(),
            signage_point_index: block.signage_point_index,
            cc_sp_output,
            cc_ip_output,
            icc_ip_proof: header.infused_challenge_chain_ip_proof.clone(),
            icc_ip_output,
            cc_sp_signature: Some(rcb.challenge_chain_sp_signature.clone()),
            ip_iters: block.required_iters,
            total_iters: block.total_iters,
            cc_sp_info: rcb.challenge_chain_sp_vdf.clone(),
            cc_ip_info: Some(rcb.challenge_chain_ip_vdf.clone()),
            icc_ip_info: rcb.infused_challenge_chain_ip_vdf.clone(),
        }))
    }

    fn boundary_fields(
        &self,
        challenge_block: &BlockRecord,
    ) -> Result<(Option<VDFInfo>, Option<VDFInfo>, Option<Bytes32>, Option<u64>)> {
        // Find the block carrying the previous sub-epoch's summary by
        // walking backwards to the most recent block with
        // `sub_epoch_summary_included`.
        let mut curr = challenge_block.clone();
        while curr.height > 0 {
            if curr.sub_epoch_summary_included.is_some() {
                break;
            }
            let Some(prev) = self.store.height_to_block_record(curr.height - 1) else {
                return Err(Error::Custom(
                    "no preceding sub-epoch summary block found for boundary fields".to_string(),
                ));
            };
            curr = prev;
        }

        // The boundary block is the first block of the new sub-epoch, i.e.
        // `first_in_sub_slot`; its header's last finished sub-slot bundle is
        // the one that closed the old sub-epoch's final slot.
        let header = self.header_for(&curr)?;
        let bundle = header.finished_sub_slots.last().ok_or_else(|| {
            Error::Custom("sub-epoch boundary block carries no finished sub-slots".to_string())
        })?;
        let cc_slot_end_info = Some(bundle.challenge_chain.challenge_chain_end_of_slot_vdf.clone());
        let rc_slot_end_info = Some(bundle.reward_chain.end_of_slot_vdf.clone());
        let icc_sub_slot_hash = bundle.challenge_chain.infused_challenge_chain_sub_slot_hash;

        // prev_icc_ip_iters: the ip_iters of the previous challenge block,
        // searched backwards, crossing at most one slot boundary.
        let mut search = challenge_block.clone();
        let mut crossed = 0;
        let prev_icc_ip_iters = loop {
            if search.height == 0 {
                break None;
            }
            let Some(prev) = self.store.height_to_block_record(search.height - 1) else {
                break None;
            };
            if prev.first_in_sub_slot() {
                crossed += 1;
                if crossed > 1 {
                    break None;
                }
            }
            if is_challenge_block(&prev, self.min_blocks_per_challenge_block) {
                break Some(prev.required_iters);
            }
            search = prev;
        };

        Ok((rc_slot_end_info, cc_slot_end_info, icc_sub_slot_hash, prev_icc_ip_iters))
    }
}

/// Segment compression (spec §4.2): within a sub-epoch's group of segments,
/// one segment is kept in full and every other segment has its VDF
/// `VDFInfo`s cleared (compressed outputs, iteration counts and signatures
/// are left untouched for ratio accounting and hash chaining) on every
/// sub-slot-data entry strictly after the challenge marker. The challenge
/// marker itself, and everything at-or-before it, is never stripped.
fn compress_segment(segment: &mut SubEpochChallengeSegmentV2) {
    let Some(challenge_idx) = segment.sub_slot_data.iter().position(SubSlotData::is_challenge)
    else {
        return;
    };
    for entry in segment.sub_slot_data.iter_mut().skip(challenge_idx + 1) {
        match entry {
            SubSlotData::Block(b) => {
                b.cc_sp_info = None;
                b.cc_ip_info = None;
                b.icc_ip_info = None;
            }
            SubSlotData::EndOfSlot(e) => {
                e.cc_slot_end_info = None;
                e.icc_slot_end_info = None;
            }
        }
    }
}

/// Compresses every sub-epoch's group of `segments` in place, picking the
/// one "full" segment per group via [`crate::sampling::pick_full_segment_index`]
/// so builder and validator agree on which segment stays fully verifiable.
pub fn compress_segments(seed: [u8; 32], segments: &mut [SubEpochChallengeSegmentV2]) {
    let mut groups: std::collections::BTreeMap<u32, Vec<usize>> = std::collections::BTreeMap::new();
    for (i, segment) in segments.iter().enumerate() {
        groups.entry(segment.sub_epoch_n).or_default().push(i);
    }
    for (sub_epoch_n, indices) in groups {
        let full_idx = crate::sampling::pick_full_segment_index(seed, sub_epoch_n, indices.len());
        for (pos, &i) in indices.iter().enumerate() {
            if pos != full_idx {
                compress_segment(&mut segments[i]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wire_block() -> chia_protocol::SubSlotDataV2 {
        chia_protocol::SubSlotDataV2 {
            proof_of_space: None,
            cc_sp_proof: None,
            cc_ip_proof: Some(VDFProof {
                witness_type: 0,
                witness: chia_protocol::Bytes::default(),
                normalized_to_identity: false,
            }),
            signage_point_index: Some(3),
            cc_sp_output: None,
            cc_ip_output: Some(CompressedClassgroupElement::from(vec![1, 2, 3])),
            icc_ip_proof: None,
            icc_ip_output: None,
            cc_sp_signature: None,
            ip_iters: Some(1234),
            total_iters: Some(5678),
            cc_slot_end_proof: None,
            cc_slot_end_output: None,
            icc_slot_end_proof: None,
            icc_slot_end_output: None,
            cc_sp_vdf_info: None,
            cc_ip_vdf_info: None,
            icc_ip_vdf_info: None,
            cc_slot_end_vdf_info: None,
            icc_slot_end_vdf_info: None,
        }
    }

    #[test]
    fn block_round_trips_through_wire_form() {
        let wire = sample_wire_block();
        let internal = SubSlotData::try_from(wire.clone()).unwrap();
        assert!(internal.is_challenge() == false);
        let back: chia_protocol::SubSlotDataV2 = internal.into();
        assert_eq!(back.ip_iters, wire.ip_iters);
        assert_eq!(back.total_iters, wire.total_iters);
    }

    #[test]
    fn end_of_slot_is_discriminated_from_block() {
        let wire = chia_protocol::SubSlotDataV2 {
            proof_of_space: None,
            cc_sp_proof: None,
            cc_ip_proof: None,
            signage_point_index: None,
            cc_sp_output: None,
            cc_ip_output: None,
            icc_ip_proof: None,
            icc_ip_output: None,
            cc_sp_signature: None,
            ip_iters: None,
            total_iters: None,
            cc_slot_end_proof: None,
            cc_slot_end_output: Some(ClassgroupElement::default()),
            icc_slot_end_proof: None,
            icc_slot_end_output: None,
            cc_sp_vdf_info: None,
            cc_ip_vdf_info: None,
            icc_ip_vdf_info: None,
            cc_slot_end_vdf_info: None,
            icc_slot_end_vdf_info: None,
        };
        let internal = SubSlotData::try_from(wire).unwrap();
        assert!(internal.is_end_of_slot());
    }

    #[test]
    fn missing_required_block_field_is_an_error() {
        let mut wire = sample_wire_block();
        wire.ip_iters = None;
        assert!(SubSlotData::try_from(wire).is_err());
    }

    fn sample_vdf_info() -> VDFInfo {
        VDFInfo {
            challenge: Bytes32::from([1; 32]),
            number_of_iterations: 100,
            output: ClassgroupElement::default(),
        }
    }

    fn full_block_entry() -> SubSlotData {
        SubSlotData::Block(BlockSubSlotData {
            proof_of_space: None,
            cc_sp_proof: None,
            cc_ip_proof: VDFProof {
                witness_type: 0,
                witness: chia_protocol::Bytes::default(),
                normalized_to_identity: true,
            },
            signage_point_index: 0,
            cc_sp_output: None,
            cc_ip_output: CompressedClassgroupElement::from(vec![1]),
            icc_ip_proof: None,
            icc_ip_output: None,
            cc_sp_signature: None,
            ip_iters: 10,
            total_iters: 10,
            cc_sp_info: None,
            cc_ip_info: Some(sample_vdf_info()),
            icc_ip_info: None,
        })
    }

    fn challenge_block_entry() -> SubSlotData {
        let mut entry = full_block_entry();
        if let SubSlotData::Block(b) = &mut entry {
            b.proof_of_space = Some(ProofOfSpace {
                challenge: Bytes32::default(),
                pool_public_key: None,
                pool_contract_puzzle_hash: None,
                plot_public_key: chia_bls::G1Element::default(),
                version: 0,
                plot_index: 0,
                size: 32,
            });
        }
        entry
    }

    fn sample_segment(sub_epoch_n: u32) -> SubEpochChallengeSegmentV2 {
        SubEpochChallengeSegmentV2 {
            sub_epoch_n,
            sub_slot_data: vec![challenge_block_entry(), full_block_entry(), full_block_entry()],
            rc_slot_end_info: None,
            cc_slot_end_info: None,
            icc_sub_slot_hash: None,
            prev_icc_ip_iters: None,
        }
    }

    #[test]
    fn compress_segment_strips_only_entries_after_the_challenge() {
        let mut segment = sample_segment(0);
        compress_segment(&mut segment);
        let SubSlotData::Block(challenge) = &segment.sub_slot_data[0] else {
            panic!("expected block")
        };
        assert!(challenge.cc_ip_info.is_some(), "challenge entry itself must stay untouched");
        for entry in &segment.sub_slot_data[1..] {
            let SubSlotData::Block(b) = entry else { panic!("expected block") };
            assert!(b.cc_ip_info.is_none());
        }
    }

    #[test]
    fn compress_segments_keeps_exactly_one_full_segment_per_sub_epoch() {
        let mut segments = vec![sample_segment(0), sample_segment(0), sample_segment(0)];
        compress_segments([5; 32], &mut segments);
        let full_count = segments
            .iter()
            .filter(|s| matches!(&s.sub_slot_data[1], SubSlotData::Block(b) if b.cc_ip_info.is_some()))
            .count();
        assert_eq!(full_count, 1);
    }

    #[test]
    fn compress_segments_agrees_with_the_validator_side_picker() {
        let seed = [42; 32];
        let chosen_by_builder = crate::sampling::pick_full_segment_index(seed, 2, 5);
        let chosen_by_validator = crate::sampling::pick_full_segment_index(seed, 2, 5);
        assert_eq!(chosen_by_builder, chosen_by_validator);
    }
}
