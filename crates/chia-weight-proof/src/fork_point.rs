//! Fork-point Resolver (`spec.md` §4.6): compares received sub-epoch
//! summaries against the local chain to determine the earliest agreeing
//! height.

use chia_protocol::SubEpochSummary;
use chia_traits::Streamable;

/// Given the received summaries and the local chain's ascending
/// `ses_heights`, returns `ses_heights[k-2]` for the largest `k` with
/// matching summary hashes, or `0` if `k <= 2`. The 2-summary back-off
/// accounts for the possibility that two summaries may tie despite
/// different underlying blocks; consensus only stabilises one sub-epoch
/// later.
pub fn get_fork_point(
    ses_heights: &[u32],
    local_summaries: impl Fn(u32) -> Option<SubEpochSummary>,
    received: &[SubEpochSummary],
) -> u32 {
    let mut last_match: Option<usize> = None;
    for (idx, height) in ses_heights.iter().enumerate() {
        let Some(received_summary) = received.get(idx) else {
            break;
        };
        let Some(local_summary) = local_summaries(*height) else {
            break;
        };
        if local_summary.hash() != received_summary.hash() {
            break;
        }
        last_match = Some(idx);
    }
    match last_match {
        Some(k) if k > 2 => ses_heights[k - 2],
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chia_protocol::Bytes32;

    fn summary(prev: u8, reward: u8) -> SubEpochSummary {
        SubEpochSummary {
            prev_subepoch_summary_hash: Bytes32::from([prev; 32]),
            reward_chain_hash: Bytes32::from([reward; 32]),
            num_blocks_overflow: 0,
            new_difficulty: None,
            new_sub_slot_iters: None,
            challenge_merkle_root: None,
        }
    }

    #[test]
    fn returns_zero_when_fewer_than_three_match() {
        let heights = vec![100, 200, 300];
        let local = summary(1, 1);
        let received = vec![local.clone(), local.clone()];
        let fp = get_fork_point(&heights, |_| Some(local.clone()), &received);
        assert_eq!(fp, 0);
    }

    #[test]
    fn returns_third_from_last_matching_height() {
        let heights = vec![100, 200, 300, 400];
        let local = summary(1, 1);
        let received = vec![local.clone(), local.clone(), local.clone(), local.clone()];
        let fp = get_fork_point(&heights, |_| Some(local.clone()), &received);
        assert_eq!(fp, 200);
    }

    #[test]
    fn stops_at_first_mismatch() {
        let heights = vec![100, 200, 300, 400];
        let a = summary(1, 1);
        let b = summary(2, 2);
        let received = vec![a.clone(), a.clone(), a.clone(), a.clone()];
        let fp = get_fork_point(
            &heights,
            move |h| if h <= 200 { Some(a.clone()) } else { Some(b.clone()) },
            &received,
        );
        assert_eq!(fp, 0);
    }
}
