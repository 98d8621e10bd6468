//! Validator (`spec.md` §4.5): re-derives the sub-epoch summary chain,
//! replays sampling, validates sampled segments' VDF chains and
//! proof-of-space, and enforces the `avg_slot_iters / avg_ip_iters >=
//! WEIGHT_PROOF_THRESHOLD` ratio.

use std::collections::BTreeMap;

use chia_consensus::consensus_constants::ConsensusConstants;
use chia_protocol::{
    Bytes32, ChallengeChainSubSlot, ClassgroupElement, HeaderBlock, RewardChainSubSlot,
    SubEpochData, SubEpochSummary,
};
use chia_sha2::Sha256;
use chia_traits::Streamable;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::{Error, Result};
use crate::pot_iterations::{calculate_ip_iters, calculate_iterations_quality};
use crate::sampling::{pick_full_segment_index, sampled_sub_epochs, weights_for_sampling};
use crate::segment::{SubEpochChallengeSegmentV2, SubSlotData};
use crate::traits::{ProofOfSpaceVerifier, VdfVerifier};

/// Stage A output: the reconstructed `sub_epoch_weight_list` (cumulative
/// weight at each sub-epoch boundary, ascending, `weight_list[0] == 0`) and
/// the matching difficulty/overflow bookkeeping needed to validate it
/// against the recent-chain anchor.
pub struct SubEpochSummaryChain {
    pub weight_list: Vec<u128>,
    pub summaries: Vec<SubEpochSummary>,
}

/// Stage A: reconstructs the linked summary chain from `sub_epochs`,
/// starting difficulty/ssi at genesis values and updating them whenever a
/// `SubEpochData` carries `new_difficulty`/`new_sub_slot_iters`.
pub fn map_sub_epoch_summaries(
    constants: &ConsensusConstants,
    genesis_difficulty: u64,
    sub_epochs: &[chia_protocol::SubEpochData],
) -> SubEpochSummaryChain {
    let mut weight_list = vec![0u128];
    let mut summaries = Vec::with_capacity(sub_epochs.len());
    let mut difficulty = u128::from(genesis_difficulty);
    let mut prev_hash = constants.genesis_challenge;
    let mut prev_overflow = 0u8;

    for data in sub_epochs {
        let summary = SubEpochSummary {
            prev_subepoch_summary_hash: prev_hash,
            reward_chain_hash: data.reward_chain_hash,
            num_blocks_overflow: data.num_blocks_overflow,
            new_difficulty: data.new_difficulty,
            new_sub_slot_iters: data.new_sub_slot_iters,
            challenge_merkle_root: None,
        };
        let blocks = u128::from(constants.sub_epoch_blocks)
            + u128::from(data.num_blocks_overflow)
            - u128::from(prev_overflow);
        let last = *weight_list.last().unwrap();
        weight_list.push(last + difficulty * blocks);

        prev_hash = summary.hash();
        prev_overflow = data.num_blocks_overflow;
        if let Some(new_difficulty) = data.new_difficulty {
            difficulty = u128::from(new_difficulty);
        }
        summaries.push(summary);
    }

    SubEpochSummaryChain {
        weight_list,
        summaries,
    }
}

/// Stage A anchor check: every `subepoch_summary_hash` the recent chain's
/// header blocks carry (`ChallengeChainSubSlot::subepoch_summary_hash`, one
/// sub-epoch delayed) must match the hash of some summary in the
/// reconstructed chain. A hash the recent chain vouches for that the
/// reconstructed chain never produces means the submitted `sub_epochs` list
/// doesn't actually lead to the chain the recent blocks come from.
pub fn check_recent_chain_anchor(
    recent_chain_data: &[HeaderBlock],
    summaries: &[SubEpochSummary],
) -> Result<()> {
    let known: std::collections::HashSet<Bytes32> = summaries.iter().map(SubEpochSummary::hash).collect();
    for header in recent_chain_data {
        for bundle in &header.finished_sub_slots {
            if let Some(anchor) = bundle.challenge_chain.subepoch_summary_hash {
                if !known.contains(&anchor) {
                    return Err(Error::SummaryMismatch);
                }
            }
        }
    }
    Ok(())
}

/// Stage D (spec §4.5): validates the recent, unsampled tail of the chain
/// directly rather than through the segment/sampling machinery — linkage
/// (`prev_header_hash`, strictly increasing weight/`total_iters`) plus a
/// real re-check of each block's challenge-chain infusion-point VDF.
pub fn validate_recent_chain<V: VdfVerifier>(
    constants: &ConsensusConstants,
    vdf: &V,
    recent_chain_data: &[HeaderBlock],
) -> Result<()> {
    let mut prev: Option<&HeaderBlock> = None;
    for header in recent_chain_data {
        if let Some(p) = prev {
            if header.prev_header_hash() != p.header_hash() {
                return Err(Error::RecentChainInvalid);
            }
            if header.weight() <= p.weight() || header.total_iters() <= p.total_iters() {
                return Err(Error::RecentChainInvalid);
            }
        }
        let rcb = &header.reward_chain_block;
        if !vdf.validate_vdf_proof(
            &header.challenge_chain_ip_proof,
            &ClassgroupElement::default(),
            &rcb.challenge_chain_ip_vdf,
            constants.discriminant_size_bits,
        ) {
            return Err(Error::RecentChainInvalid);
        }
        prev = Some(header);
    }
    Ok(())
}

/// Stage B: replays the Sampling Oracle and returns the required sub-epoch
/// indices (ascending). Fails with `InsufficientChain` under the same
/// conditions the oracle itself fails (spec §4.1).
pub fn replay_sampling(
    seed: [u8; 32],
    weight_list: &[u128],
    last_l_weight: u128,
) -> Result<Vec<u32>> {
    let total_weight = *weight_list.last().ok_or(Error::InsufficientChain(
        "empty sub-epoch weight list",
    ))?;
    let samples = weights_for_sampling(seed, total_weight, last_l_weight)?;
    Ok(sampled_sub_epochs(&samples, weight_list))
}

/// Groups segments by `sub_epoch_n`, preserving each group's internal order.
pub fn group_segments_by_sub_epoch(
    segments: &[SubEpochChallengeSegmentV2],
) -> BTreeMap<u32, Vec<&SubEpochChallengeSegmentV2>> {
    let mut groups: BTreeMap<u32, Vec<&SubEpochChallengeSegmentV2>> = BTreeMap::new();
    for segment in segments {
        groups.entry(segment.sub_epoch_n).or_default().push(segment);
    }
    groups
}

/// Stage B check: every required sub-epoch index must have a segment
/// group. Extra indices are permitted.
pub fn check_sampling_covered(
    required: &[u32],
    groups: &BTreeMap<u32, Vec<&SubEpochChallengeSegmentV2>>,
) -> Result<()> {
    for idx in required {
        if !groups.contains_key(idx) {
            return Err(Error::SamplingMismatch);
        }
    }
    Ok(())
}

/// Per-segment running totals used for the ratio check (spec §4.5, last
/// paragraph of Stage C).
#[derive(Default, Clone, Copy)]
struct RatioAccumulator {
    total_slot_iters: u128,
    total_slots: u128,
    total_ip_iters: u128,
    total_blocks: u128,
}

impl RatioAccumulator {
    fn check(&self, weight_proof_threshold: u8) -> Result<()> {
        if self.total_slots == 0 || self.total_blocks == 0 {
            return Ok(());
        }
        let avg_slot_iters = self.total_slot_iters / self.total_slots;
        let avg_ip_iters = self.total_ip_iters / self.total_blocks;
        if avg_ip_iters == 0 {
            return Ok(());
        }
        if avg_slot_iters / avg_ip_iters < u128::from(weight_proof_threshold) {
            return Err(Error::RatioBelowThreshold);
        }
        Ok(())
    }
}

/// Hashes a block's signage-point VDF output (falling back to its
/// infusion-point output for blocks sampled at signage point 0, which
/// carry no separate `cc_sp_output`) down to the `Bytes32` that
/// `calculate_iterations_quality` mixes into the quality string.
fn sp_output_hash(block: &crate::segment::BlockSubSlotData) -> Bytes32 {
    let bytes = block
        .cc_sp_output
        .as_ref()
        .unwrap_or(&block.cc_ip_output)
        .data
        .to_bytes();
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Bytes32::from(hasher.finalize())
}

/// Full per-segment validation algorithm (spec §4.5 "Per-segment
/// algorithm"). Only the segment picked by `pick_full_segment_index` is
/// validated at this depth; callers run this for that one segment per
/// sub-epoch and treat the rest as boundary/iteration bookkeeping only
/// (handled directly by the caller via `segment.sub_slot_data` totals).
///
/// Re-execution works by re-deriving each VDF step from its `VDFInfo`/proof
/// via `verify_compressed_vdf`, re-compressing the verified output, and
/// comparing that against the segment's own compressed output — the wire
/// form never carries a decompression primitive, so this re-derive/
/// re-compress/compare is how a compressed output gets checked at all.
pub fn validate_segment<V: VdfVerifier, P: ProofOfSpaceVerifier>(
    constants: &ConsensusConstants,
    vdf: &V,
    pos_verifier: &P,
    plot_id_for: impl Fn(&chia_protocol::ProofOfSpace) -> chia_protocol::Bytes32,
    difficulty: u64,
    ssi: u64,
    segment: &SubEpochChallengeSegmentV2,
) -> Result<()> {
    let mut acc = RatioAccumulator::default();
    // Challenge-chain and infused-challenge-chain VDFs chain within a
    // sub-slot; `None` means "use the group identity", matching
    // `normalized_to_identity` proofs that start a fresh sub-slot.
    let mut cc_output: Option<ClassgroupElement> = None;
    let mut icc_output: Option<ClassgroupElement> = None;

    for entry in &segment.sub_slot_data {
        match entry {
            SubSlotData::Block(block) => {
                if let (Some(sp_proof), Some(sp_info)) = (&block.cc_sp_proof, &block.cc_sp_info) {
                    let input = cc_output.unwrap_or_default();
                    let verified = vdf
                        .verify_compressed_vdf(&input, sp_info, sp_proof)
                        .ok_or(Error::VdfInvalid)?;
                    let expected = block.cc_sp_output.as_ref().map(|o| o.data.to_bytes());
                    if Some(vdf.compress_output(&verified)) != expected {
                        return Err(Error::VdfInvalid);
                    }
                }
                if let Some(ip_info) = &block.cc_ip_info {
                    let input = cc_output.unwrap_or_default();
                    let verified = vdf
                        .verify_compressed_vdf(&input, ip_info, &block.cc_ip_proof)
                        .ok_or(Error::VdfInvalid)?;
                    if vdf.compress_output(&verified) != block.cc_ip_output.data.to_bytes() {
                        return Err(Error::VdfInvalid);
                    }
                    cc_output = Some(verified);
                }
                if let (Some(icc_info), Some(icc_proof)) = (&block.icc_ip_info, &block.icc_ip_proof) {
                    let input = icc_output.unwrap_or_default();
                    let verified = vdf
                        .verify_compressed_vdf(&input, icc_info, icc_proof)
                        .ok_or(Error::VdfInvalid)?;
                    let expected = block.icc_ip_output.as_ref().map(|o| o.data.to_bytes());
                    if Some(vdf.compress_output(&verified)) != expected {
                        return Err(Error::VdfInvalid);
                    }
                    icc_output = Some(verified);
                }

                if let Some(pos) = &block.proof_of_space {
                    let plot_id = plot_id_for(pos);
                    let quality_string = pos_verifier
                        .verify_and_get_quality_string(pos, plot_id)
                        .ok_or(Error::PosInvalid)?;
                    let cc_sp_output_hash = sp_output_hash(block);
                    let required_iters = calculate_iterations_quality(
                        constants.difficulty_constant_factor,
                        quality_string,
                        u32::from(pos.size),
                        difficulty,
                        cc_sp_output_hash,
                    )?;
                    let expected_ip_iters = calculate_ip_iters(
                        constants.num_sps_sub_slot,
                        block.signage_point_index,
                        constants.num_sp_intervals_extra,
                        ssi,
                        required_iters,
                    )?;
                    if expected_ip_iters != block.ip_iters {
                        return Err(Error::PosInvalid);
                    }
                }

                acc.total_blocks += 1;
                acc.total_ip_iters += u128::from(block.ip_iters);
            }
            SubSlotData::EndOfSlot(eos) => {
                if let (Some(info), Some(proof)) = (&eos.cc_slot_end_info, &eos.cc_slot_end_proof) {
                    let input = cc_output.unwrap_or_default();
                    if !vdf.validate_vdf_proof(proof, &input, info, constants.discriminant_size_bits) {
                        return Err(Error::VdfInvalid);
                    }
                }
                if let (Some(info), Some(proof)) = (&eos.icc_slot_end_info, &eos.icc_slot_end_proof) {
                    let input = icc_output.unwrap_or_default();
                    if !vdf.validate_vdf_proof(proof, &input, info, constants.discriminant_size_bits) {
                        return Err(Error::VdfInvalid);
                    }
                }
                // A new sub-slot starts a fresh challenge; both chains
                // restart from identity until the next block re-chains them.
                cc_output = None;
                icc_output = None;

                acc.total_slots += 1;
                acc.total_slot_iters += u128::from(ssi);
            }
        }
        acc.check(constants.weight_proof_threshold)?;
    }

    // Boundary segments carry the challenge-chain end-of-slot VDF info
    // separately (`segment.cc_slot_end_info`); re-verify it against the
    // first end-of-slot entry's proof when present.
    if let Some(cc_slot_end_info) = &segment.cc_slot_end_info {
        let first_eos_proof = segment.sub_slot_data.iter().find_map(|entry| match entry {
            SubSlotData::EndOfSlot(eos) => eos.cc_slot_end_proof.as_ref(),
            SubSlotData::Block(_) => None,
        });
        if let Some(proof) = first_eos_proof {
            if !vdf.validate_vdf_proof(
                proof,
                &ClassgroupElement::default(),
                cc_slot_end_info,
                constants.discriminant_size_bits,
            ) {
                return Err(Error::VdfInvalid);
            }
        }
    }

    Ok(())
}

/// Stage C's boundary check (spec §4.5: `summaries[n].reward_chain_hash ==
/// rc_sub_slot_hash`): re-derives the challenge-chain and reward-chain
/// sub-slot hashes the first segment of a non-genesis sub-epoch carries the
/// `VDFInfo`s for, and compares against the corresponding reconstructed
/// summary. `deficit` is approximated as `0` (the segment model doesn't
/// carry the boundary block's deficit) — see `DESIGN.md`.
fn check_segment_boundary(
    sub_epoch_n: u32,
    segment: &SubEpochChallengeSegmentV2,
    summaries: &[SubEpochSummary],
    sub_epochs: &[SubEpochData],
) -> Result<()> {
    let (Some(rc_info), Some(cc_info)) = (&segment.rc_slot_end_info, &segment.cc_slot_end_info) else {
        return Ok(());
    };
    let n = sub_epoch_n as usize;
    let prev_summary_hash = if n >= 1 { summaries.get(n - 1).map(SubEpochSummary::hash) } else { None };
    let data = sub_epochs.get(n);

    let cc_subslot = ChallengeChainSubSlot {
        challenge_chain_end_of_slot_vdf: cc_info.clone(),
        infused_challenge_chain_sub_slot_hash: segment.icc_sub_slot_hash,
        subepoch_summary_hash: prev_summary_hash,
        new_sub_slot_iters: data.and_then(|d| d.new_sub_slot_iters),
        new_difficulty: data.and_then(|d| d.new_difficulty),
    };
    let rc_subslot = RewardChainSubSlot {
        end_of_slot_vdf: rc_info.clone(),
        challenge_chain_sub_slot_hash: cc_subslot.hash(),
        infused_challenge_chain_sub_slot_hash: segment.icc_sub_slot_hash,
        deficit: 0,
    };

    let expected = summaries.get(n).ok_or(Error::BoundaryMismatch)?.reward_chain_hash;
    if rc_subslot.hash() != expected {
        return Err(Error::BoundaryMismatch);
    }
    Ok(())
}

/// Stage C: validates each sub-epoch's segment group in parallel, picking
/// one segment per group for full VDF re-execution and short-circuiting on
/// the first failure (spec §4.5 / §5).
#[allow(clippy::too_many_arguments)]
pub fn validate_sub_epoch_segments<V: VdfVerifier + Sync, P: ProofOfSpaceVerifier + Sync>(
    constants: &ConsensusConstants,
    vdf: &V,
    pos_verifier: &P,
    plot_id_for: impl Fn(&chia_protocol::ProofOfSpace) -> chia_protocol::Bytes32 + Sync,
    seed: [u8; 32],
    difficulties: &BTreeMap<u32, u64>,
    ssis: &BTreeMap<u32, u64>,
    summaries: &[SubEpochSummary],
    sub_epochs: &[SubEpochData],
    groups: &BTreeMap<u32, Vec<&SubEpochChallengeSegmentV2>>,
) -> Result<()> {
    groups
        .par_iter()
        .try_for_each(|(sub_epoch_n, group)| -> Result<()> {
            for segment in group.iter() {
                check_segment_boundary(*sub_epoch_n, segment, summaries, sub_epochs)?;
            }
            let idx = pick_full_segment_index(seed, *sub_epoch_n, group.len());
            let Some(segment) = group.get(idx) else {
                return Err(Error::SamplingMismatch);
            };
            let difficulty = difficulties.get(sub_epoch_n).copied().unwrap_or(1);
            let ssi = ssis.get(sub_epoch_n).copied().unwrap_or(1);
            validate_segment(constants, vdf, pos_verifier, &plot_id_for, difficulty, ssi, segment)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_accumulator_passes_when_above_threshold() {
        let acc = RatioAccumulator {
            total_slot_iters: 1000,
            total_slots: 1,
            total_ip_iters: 10,
            total_blocks: 1,
            ..Default::default()
        };
        assert!(acc.check(5).is_ok());
    }

    #[test]
    fn ratio_accumulator_fails_below_threshold() {
        let acc = RatioAccumulator {
            total_slot_iters: 10,
            total_slots: 1,
            total_ip_iters: 10,
            total_blocks: 1,
            ..Default::default()
        };
        assert_eq!(acc.check(5), Err(Error::RatioBelowThreshold));
    }

    #[test]
    fn check_recent_chain_anchor_accepts_unknown_free_chains() {
        // An empty recent chain vouches for nothing, so it trivially passes.
        assert!(check_recent_chain_anchor(&[], &[]).is_ok());
    }

    #[test]
    fn check_segment_boundary_skips_segments_without_boundary_fields() {
        let segment = SubEpochChallengeSegmentV2 {
            sub_epoch_n: 0,
            sub_slot_data: vec![],
            rc_slot_end_info: None,
            cc_slot_end_info: None,
            icc_sub_slot_hash: None,
            prev_icc_ip_iters: None,
        };
        assert!(check_segment_boundary(0, &segment, &[], &[]).is_ok());
    }
}
