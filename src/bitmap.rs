use error::MFSError;
use fs;
#[cfg(test)]
use std::ops::Index;

/// Block numbers below this are reserved and terminate a chain.
pub const FIRST_BLOCK: u16 = 2;

const GROUP_SIZE: usize = 3;

/// How the second entry of each packed 12-bit pair is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapDecoding {
    /// `((b1 & 0x0F) << 8) | b2`
    Corrected,
    /// `(b1 & (0x0F << 8)) | b2`, which always drops the high nibble. Matches
    /// the reader some existing recoveries were made with.
    Legacy,
}

impl Default for BitmapDecoding {
    fn default() -> BitmapDecoding {
        BitmapDecoding::Corrected
    }
}

/// Unpacks one 3-byte group into two 12-bit entries.
pub fn decode_pair(group: [u8; 3], decoding: BitmapDecoding) -> (u16, u16) {
    let (b0, b1, b2) = (group[0] as u16, group[1] as u16, group[2] as u16);
    let first = (b0 << 4) | (b1 >> 4);
    let second = match decoding {
        BitmapDecoding::Corrected => ((b1 & 0x0F) << 8) | b2,
        BitmapDecoding::Legacy => (b1 & (0x0F << 8)) | b2,
    };
    (first, second)
}

/// Successor of every allocation block, decoded from the volume allocation map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationChain {
    next: Vec<u16>,
}

impl AllocationChain {
    /// Decodes `block_count` entries from `map`. Entry `i` of the map is the
    /// successor of block `i + 2`.
    pub fn decode(map: &[u8], block_count: u16, decoding: BitmapDecoding) -> fs::Result<AllocationChain> {
        let slots = block_count as usize + FIRST_BLOCK as usize;
        let needed = (block_count as usize + 1) / 2 * GROUP_SIZE;
        if map.len() < needed {
            return Err(MFSError::Truncated {
                offset: 0,
                needed: needed,
                available: map.len(),
            });
        }

        let mut next = vec![0u16; slots];
        let mut block = FIRST_BLOCK as usize;
        for group in map.chunks(GROUP_SIZE).take(needed / GROUP_SIZE) {
            let (first, second) = decode_pair([group[0], group[1], group[2]], decoding);
            trace!("{} {}", first, second);
            next[block] = first;
            if block + 1 < slots {
                next[block + 1] = second;
            }
            block += 2;
        }
        Ok(AllocationChain {
            next: next,
        })
    }

    #[cfg(test)]
    pub fn from_successors(next: Vec<u16>) -> AllocationChain {
        AllocationChain {
            next: next,
        }
    }

    /// Number of allocation blocks the chain describes.
    pub fn block_count(&self) -> usize {
        self.next.len().saturating_sub(FIRST_BLOCK as usize)
    }

    pub fn successor(&self, block: u16) -> fs::Result<u16> {
        self.next.get(block as usize).cloned().ok_or(MFSError::InvalidBlock {
            block: block,
            limit: self.block_count(),
        })
    }

    /// Follows the chain from `start`, returning every visited block. Empty
    /// when `start` is a terminator.
    pub fn blocks(&self, start: u16) -> fs::Result<Vec<u16>> {
        let limit = self.block_count();
        let mut blocks = Vec::new();
        let mut block = start;
        while block >= FIRST_BLOCK {
            let next = self.successor(block)?;
            if blocks.len() >= limit {
                return Err(MFSError::ChainCycle {
                    start_block: start,
                    limit: limit,
                });
            }
            debug!("Block {}", block);
            blocks.push(block);
            block = next;
        }
        Ok(blocks)
    }
}

#[cfg(test)]
impl Index<u16> for AllocationChain {
    type Output = u16;

    fn index(&self, block: u16) -> &u16 {
        &self.next[block as usize]
    }
}
