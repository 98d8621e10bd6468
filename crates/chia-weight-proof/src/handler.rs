//! Handler (`spec.md` §5 plus `SPEC_FULL.md` §E/§F): the module's one
//! stateful entry point, owning the cached `(tip, proof)` pair and the
//! worker pool that Stage C/D and segment construction run on.

use std::sync::Arc;

use chia_consensus::consensus_constants::ConsensusConstants;
use chia_protocol::{Bytes32, SubEpochData, WeightProofV2};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::fork_point::get_fork_point;
use crate::recent_chain::build_recent_chain;
use crate::segment::{compress_segments, SegmentBuilder, SubEpochChallengeSegmentV2};
use crate::traits::{BlockchainStore, ProofOfSpaceVerifier, VdfVerifier};
use crate::validator::{
    check_recent_chain_anchor, check_sampling_covered, group_segments_by_sub_epoch,
    map_sub_epoch_summaries, replay_sampling, validate_recent_chain, validate_sub_epoch_segments,
};

/// Number of most recent sub-epochs always included in full, bypassing the
/// sampling oracle (spec §4.1's `last_l_weight` window).
const LAST_L_SUB_EPOCHS: usize = 2;

/// Owns the last-built `(tip, proof)` pair and the thread pool segment
/// construction and validation run on. One instance is expected per node,
/// mirroring the teacher's long-lived singleton service objects (e.g.
/// `chia-client`'s connection managers).
pub struct WeightProofHandler<S, V, P> {
    store: S,
    vdf: Arc<V>,
    pos_verifier: Arc<P>,
    constants: Arc<ConsensusConstants>,
    pool: rayon::ThreadPool,
    cache: Mutex<Option<(Bytes32, WeightProofV2)>>,
}

impl<S, V, P> WeightProofHandler<S, V, P>
where
    S: BlockchainStore + Sync,
    V: VdfVerifier + Sync + Send,
    P: ProofOfSpaceVerifier + Sync + Send,
{
    pub fn new(store: S, vdf: V, pos_verifier: P, constants: ConsensusConstants) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4))
            .build()
            .expect("failed to build weight-proof worker pool");
        Self {
            store,
            vdf: Arc::new(vdf),
            pos_verifier: Arc::new(pos_verifier),
            constants: Arc::new(constants),
            pool,
            cache: Mutex::new(None),
        }
    }

    /// Returns the cached proof for `tip_header_hash` if one was already
    /// built, else builds, caches, and returns a fresh one (spec §5).
    /// `seed` is the caller-supplied sampling seed (spec §2/§4.1): distinct
    /// seeds are expected to sample a different set of sub-epochs and pick
    /// different "full" segments within each, per P2.
    pub async fn get_proof_of_weight(
        &self,
        tip_header_hash: Bytes32,
        seed: Bytes32,
        sub_epochs: Vec<SubEpochData>,
    ) -> Result<WeightProofV2> {
        {
            let cache = self.cache.lock().await;
            if let Some((cached_tip, proof)) = cache.as_ref() {
                if *cached_tip == tip_header_hash {
                    return Ok(proof.clone());
                }
            }
        }

        let recent_chain_data = build_recent_chain(&self.store, tip_header_hash).await?;

        let chain = map_sub_epoch_summaries(&self.constants, self.constants.difficulty_starting, &sub_epochs);
        if chain.weight_list.len() <= 1 {
            return Err(Error::InsufficientChain("no sub-epochs to build a proof from"));
        }
        let last_l_weight = self.last_l_weight_blocks(&chain.weight_list);

        let seed_bytes = seed.to_bytes();
        let required = replay_sampling(seed_bytes, &chain.weight_list, last_l_weight)?;

        let mut segments = self.build_segments_for(&required, &sub_epochs).await?;
        compress_segments(seed_bytes, &mut segments);

        let proof = WeightProofV2 {
            sub_epochs,
            sub_epoch_segments: segments.into_iter().map(Into::into).collect(),
            recent_chain_data,
        };

        let mut cache = self.cache.lock().await;
        *cache = Some((tip_header_hash, proof.clone()));
        Ok(proof)
    }

    /// Validates a received weight proof end-to-end (spec §4.5 Stages A-D).
    /// `seed` must be the same value the proof was built with (spec §6); a
    /// validator that doesn't yet know the right seed re-derives it the same
    /// way the builder did, from `proof.recent_chain_data`.
    pub fn validate_weight_proof(&self, proof: &WeightProofV2, seed: Bytes32) -> Result<bool> {
        let chain = map_sub_epoch_summaries(&self.constants, self.constants.difficulty_starting, &proof.sub_epochs);
        let last_l_weight = self.last_l_weight_blocks(&chain.weight_list);

        check_recent_chain_anchor(&proof.recent_chain_data, &chain.summaries)?;

        let seed_bytes = seed.to_bytes();
        let required = replay_sampling(seed_bytes, &chain.weight_list, last_l_weight)?;

        let segments: Vec<SubEpochChallengeSegmentV2> = proof
            .sub_epoch_segments
            .iter()
            .cloned()
            .map(SubEpochChallengeSegmentV2::try_from)
            .collect::<Result<Vec<_>>>()?;
        let groups = group_segments_by_sub_epoch(&segments);
        check_sampling_covered(&required, &groups)?;

        let mut difficulties = std::collections::BTreeMap::new();
        let mut ssis = std::collections::BTreeMap::new();
        let mut difficulty = self.constants.difficulty_starting;
        let mut ssi = self.constants.sub_slot_iters_starting;
        for (idx, data) in proof.sub_epochs.iter().enumerate() {
            if let Some(d) = data.new_difficulty {
                difficulty = d;
            }
            if let Some(s) = data.new_sub_slot_iters {
                ssi = s;
            }
            difficulties.insert(idx as u32, difficulty);
            ssis.insert(idx as u32, ssi);
        }

        let vdf = Arc::clone(&self.vdf);
        let pos_verifier = Arc::clone(&self.pos_verifier);
        let constants = Arc::clone(&self.constants);
        let plot_id_for = |pos: &chia_protocol::ProofOfSpace| {
            let mut hasher = chia_sha2::Sha256::new();
            if let Some(pool_hash) = &pos.pool_contract_puzzle_hash {
                hasher.update(pool_hash.clone().to_bytes());
            }
            hasher.update(pos.plot_public_key.to_bytes());
            Bytes32::from(hasher.finalize())
        };

        // Stage C (segment/VDF re-execution) and Stage D (recent-chain
        // validation) depend on disjoint parts of the proof, so they run
        // concurrently (spec §4.5/§5).
        let (stage_c, stage_d) = self.pool.install(|| {
            rayon::join(
                || {
                    validate_sub_epoch_segments(
                        &constants,
                        vdf.as_ref(),
                        pos_verifier.as_ref(),
                        plot_id_for,
                        seed_bytes,
                        &difficulties,
                        &ssis,
                        &chain.summaries,
                        &proof.sub_epochs,
                        &groups,
                    )
                },
                || validate_recent_chain(&constants, vdf.as_ref(), &proof.recent_chain_data),
            )
        });
        stage_c?;
        stage_d?;

        Ok(true)
    }

    /// `fork_point_unvalidated` (`SPEC_FULL.md` §E): compares received
    /// summaries against the local chain without validating the proof
    /// itself, used to short-circuit an already-known chain.
    pub fn fork_point_unvalidated(&self, received: &[chia_protocol::SubEpochSummary]) -> u32 {
        let heights = self.store.get_ses_heights();
        get_fork_point(&heights, |h| self.store.get_ses(h), received)
    }

    /// `last_l_weight_blocks` (`SPEC_FULL.md` §E): total weight of the most
    /// recent `LAST_L_SUB_EPOCHS` sub-epochs, always included unsampled.
    pub fn last_l_weight_blocks(&self, weight_list: &[u128]) -> u128 {
        if weight_list.len() <= 1 {
            return 0;
        }
        let total = *weight_list.last().unwrap();
        let cutoff = weight_list.len().saturating_sub(LAST_L_SUB_EPOCHS + 1);
        total - weight_list[cutoff]
    }

    /// `precompute_all_segments` (`SPEC_FULL.md` §E): builds and persists
    /// every sub-epoch's challenge segments for `sub_epochs`, skipping any
    /// already persisted.
    pub async fn precompute_all_segments(&self, sub_epochs: &[(u32, Bytes32)]) -> Result<()> {
        for (sub_epoch_n, ses_block_hash) in sub_epochs {
            if self
                .store
                .get_sub_epoch_challenge_segments_v2(*ses_block_hash)
                .await
                .is_some()
            {
                continue;
            }
            self.precompute_latest_segment(*sub_epoch_n, *ses_block_hash).await?;
        }
        Ok(())
    }

    /// `precompute_latest_segment` (`SPEC_FULL.md` §E): builds and persists
    /// one sub-epoch's challenge segments unconditionally.
    pub async fn precompute_latest_segment(
        &self,
        sub_epoch_n: u32,
        ses_block_hash: Bytes32,
    ) -> Result<()> {
        let se_start = match self.store.try_block_record(ses_block_hash) {
            Some(record) => record,
            None => self
                .store
                .get_block_record_from_db(ses_block_hash)
                .await
                .ok_or(Error::TipUnknown)?,
        };
        let end_height = self
            .store
            .height_to_block_record(se_start.height + 1)
            .map(|b| b.height)
            .unwrap_or(se_start.height);
        let builder = SegmentBuilder::new(
            &self.store,
            self.vdf.as_ref(),
            self.constants.min_blocks_per_challenge_block,
        );
        let segments =
            builder.build_sub_epoch_segments(sub_epoch_n, &se_start, end_height, sub_epoch_n == 0)?;
        self.store
            .persist_sub_epoch_challenge_segments_v2(
                ses_block_hash,
                segments,
            )
            .await;
        Ok(())
    }

    async fn build_segments_for(
        &self,
        required: &[u32],
        sub_epochs: &[SubEpochData],
    ) -> Result<Vec<SubEpochChallengeSegmentV2>> {
        let mut out = Vec::new();
        for sub_epoch_n in required {
            let Some(height) = self.store.get_ses_heights().get(*sub_epoch_n as usize).copied() else {
                continue;
            };
            let Some(hash) = self.store.height_to_hash(height) else {
                continue;
            };
            if let Some(cached) = self.store.get_sub_epoch_challenge_segments_v2(hash).await {
                out.extend(cached);
                continue;
            }
            let first = *sub_epoch_n == 0;
            let se_start = self
                .store
                .height_to_block_record(height)
                .ok_or(Error::InsufficientChain("missing sub-epoch start block"))?;
            let end_height = sub_epochs
                .get(*sub_epoch_n as usize + 1)
                .map(|_| height)
                .unwrap_or(height);
            let builder = SegmentBuilder::new(
                &self.store,
                self.vdf.as_ref(),
                self.constants.min_blocks_per_challenge_block,
            );
            let built = builder.build_sub_epoch_segments(*sub_epoch_n, &se_start, end_height, first)?;
            self.store
                .persist_sub_epoch_challenge_segments_v2(hash, built.clone())
                .await;
            out.extend(built);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_l_window_cutoff_keeps_last_two_sub_epochs() {
        let weight_list = vec![0u128, 100, 250];
        let cutoff = weight_list.len().saturating_sub(LAST_L_SUB_EPOCHS + 1);
        assert_eq!(cutoff, 0);
        assert_eq!(*weight_list.last().unwrap() - weight_list[cutoff], 250);
    }
}
