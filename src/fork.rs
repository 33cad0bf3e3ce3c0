use bitmap::{AllocationChain, FIRST_BLOCK};
use error::MFSError;
use fs;
use std::cmp;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Bytes per allocation block when addressing fork data.
pub const CLUMP_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stop at the fork's logical end-of-file.
    Exact,
    /// Write every allocated clump in full.
    RawClumps,
}

impl Default for OutputMode {
    fn default() -> OutputMode {
        OutputMode::Exact
    }
}

/// Byte offset of `block` given the offset of allocation block 2.
pub fn clump_offset(base: usize, block: u16) -> usize {
    base + CLUMP_SIZE * (block - FIRST_BLOCK) as usize
}

/// One fork of a file, readable as a contiguous stream.
#[derive(Debug)]
pub struct Fork<'a> {
    image: &'a [u8],
    base: usize,
    blocks: Vec<u16>,
    length: u64,
    offset: u64,
}

impl<'a> Fork<'a> {
    pub fn new(image: &'a [u8],
               chain: &AllocationChain,
               base: usize,
               start_block: u16,
               logical_length: u32,
               mode: OutputMode) -> fs::Result<Fork<'a>> {
        let blocks = chain.blocks(start_block)?;
        for &block in &blocks {
            let offset = clump_offset(base, block);
            if image.len() < offset + CLUMP_SIZE {
                return Err(MFSError::Truncated {
                    offset: offset,
                    needed: CLUMP_SIZE,
                    available: image.len().saturating_sub(offset),
                });
            }
        }

        let physical_length = blocks.len() as u64 * CLUMP_SIZE as u64;
        let length = match mode {
            OutputMode::RawClumps => physical_length,
            OutputMode::Exact => {
                if logical_length as u64 > physical_length {
                    warn!("Logical length {} of fork at block {} exceeds its {} allocated bytes",
                          logical_length, start_block, physical_length);
                }
                cmp::min(logical_length as u64, physical_length)
            },
        };

        Ok(Fork {
            image: image,
            base: base,
            blocks: blocks,
            length: length,
            offset: 0,
        })
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn blocks(&self) -> &[u16] {
        &self.blocks[..]
    }
}

impl<'a> Read for Fork<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.length {
            return Ok(0);
        }
        let index = (self.offset / CLUMP_SIZE as u64) as usize;
        let intra_clump_offset = (self.offset % CLUMP_SIZE as u64) as usize;
        let read_size = cmp::min(cmp::min(buf.len(), CLUMP_SIZE - intra_clump_offset) as u64,
                                 self.length - self.offset) as usize;
        let start = clump_offset(self.base, self.blocks[index]) + intra_clump_offset;
        buf[..read_size].copy_from_slice(&self.image[start..start + read_size]);
        self.offset += read_size as u64;
        Ok(read_size)
    }
}

impl<'a> Seek for Fork<'a> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let (origin, offset) = match from {
            SeekFrom::Start(offset) => {
                self.offset = offset;
                return Ok(self.offset);
            },
            SeekFrom::End(offset) => (self.length, offset),
            SeekFrom::Current(offset) => (self.offset, offset),
        };
        if offset >= 0 {
            self.offset = origin + offset as u64;
        } else {
            let offset_magnitude = offset.wrapping_neg() as u64;
            if offset_magnitude > origin {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, "Cannot seek before start of fork"));
            }
            self.offset = origin - offset_magnitude;
        }
        Ok(self.offset)
    }
}

/// Walks the chain from `start_block` and writes the fork to `sink`,
/// returning the number of bytes written. A start block below 2 writes
/// nothing.
pub fn extract_fork<W>(image: &[u8],
                       chain: &AllocationChain,
                       base: usize,
                       start_block: u16,
                       logical_length: u32,
                       mode: OutputMode,
                       sink: &mut W) -> fs::Result<u64> where W: Write {
    let mut fork = Fork::new(image, chain, base, start_block, logical_length, mode)?;
    let written = io::copy(&mut fork, sink)?;
    Ok(written)
}
