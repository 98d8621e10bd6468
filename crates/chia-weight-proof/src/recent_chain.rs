//! Recent Chain Builder (`spec.md` §4.3): walks backwards from `tip`
//! collecting header blocks until two sub-epoch summary inclusions have
//! been seen, then includes one more block beyond the second.

use chia_protocol::HeaderBlock;

use crate::error::{Error, Result};
use crate::traits::BlockchainStore;

/// `recent_chain[0]` is the earliest block such that the range contains
/// exactly two sub-epoch summary inclusions; `recent_chain[-1].height ==
/// tip_height`.
pub async fn build_recent_chain<S: BlockchainStore>(
    store: &S,
    tip_header_hash: chia_protocol::Bytes32,
) -> Result<Vec<HeaderBlock>> {
    let tip = match store.try_block_record(tip_header_hash) {
        Some(record) => record,
        None => store
            .get_block_record_from_db(tip_header_hash)
            .await
            .ok_or(Error::TipUnknown)?,
    };

    let mut summary_inclusions_seen = 0u8;
    let mut earliest_height = tip.height;
    let mut height = tip.height;
    loop {
        let Some(block) = store.height_to_block_record(height) else {
            break;
        };
        earliest_height = height;
        if block.sub_epoch_summary_included.is_some() {
            summary_inclusions_seen += 1;
            if summary_inclusions_seen == 2 {
                // include one more block beyond the second summary inclusion
                if height > 0 {
                    earliest_height = height - 1;
                }
                break;
            }
        }
        if height == 0 {
            break;
        }
        height -= 1;
    }

    let header_blocks = store.get_header_blocks_in_range(earliest_height, tip.height, false);
    let mut chain = Vec::with_capacity((tip.height - earliest_height + 1) as usize);
    for h in earliest_height..=tip.height {
        let Some(hash) = store.height_to_hash(h) else {
            return Err(Error::InsufficientChain("missing height-to-hash mapping while building recent chain"));
        };
        let Some(header_block) = header_blocks.get(&hash) else {
            return Err(Error::InsufficientChain("missing header block while building recent chain"));
        };
        chain.push(header_block.clone());
    }
    Ok(chain)
}
