use chrono::NaiveDateTime;
use error::MFSError;
use fs;
use std::fmt::{self, Display, Formatter};
use structure::{Structure, View};

pub const BLOCK_SIZE: usize = 512;
pub const OFFSET_VOLUME_INFO: usize = 2 * BLOCK_SIZE;
pub const SIZE_VOLUME_INFO: usize = 64;
pub const OFFSET_ALLOCATION_MAP: usize = OFFSET_VOLUME_INFO + SIZE_VOLUME_INFO;
pub const SIGNATURE: u16 = 0xD2D7;
pub const MAX_VOLUME_NAME: usize = 27;

const OFFSET_NAME_LENGTH: usize = 36;

/// The master volume record at byte 1024 of an MFS image.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeInfo {
    pub signature: u16,
    pub create_date: NaiveDateTime,
    pub backup_date: NaiveDateTime,
    pub attributes: u16,
    pub file_count: u16,
    pub directory_start: u16,
    pub directory_length: u16,
    pub allocation_block_count: u16,
    pub allocation_block_size: u32,
    pub clump_size: u32,
    pub first_allocation_block: u16,
    pub next_file_number: u32,
    pub free_blocks: u16,
    pub name: Vec<u8>,
}

impl VolumeInfo {
    /// Fails only when the image is too short to hold the record. A wrong
    /// signature is reported by `validate`.
    pub fn parse(image: &[u8]) -> fs::Result<VolumeInfo> {
        let record = View::new(image, OFFSET_VOLUME_INFO);
        record.read_bytes(0, SIZE_VOLUME_INFO)?;

        let name_length = record.read_u8(OFFSET_NAME_LENGTH)? as usize;
        let name = image
            .get(OFFSET_VOLUME_INFO + OFFSET_NAME_LENGTH + 1..)
            .map(|rest| &rest[..name_length.min(rest.len())])
            .unwrap_or(&[]);
        if name_length > MAX_VOLUME_NAME {
            warn!("Volume name length {} exceeds {} bytes", name_length, MAX_VOLUME_NAME);
        }

        Ok(VolumeInfo {
            signature: record.read_u16(0)?,
            create_date: record.read_date(2)?,
            backup_date: record.read_date(6)?,
            attributes: record.read_u16(10)?,
            file_count: record.read_u16(12)?,
            directory_start: record.read_u16(14)?,
            directory_length: record.read_u16(16)?,
            allocation_block_count: record.read_u16(18)?,
            allocation_block_size: record.read_u32(20)?,
            clump_size: record.read_u32(24)?,
            first_allocation_block: record.read_u16(28)?,
            next_file_number: record.read_u32(30)?,
            free_blocks: record.read_u16(34)?,
            name: name.to_vec(),
        })
    }

    pub fn validate(&self) -> fs::Result<()> {
        if self.signature != SIGNATURE {
            return Err(MFSError::SignatureMismatch { found: self.signature });
        }
        Ok(())
    }

    /// Byte offset of allocation block 2, the first block holding file data.
    pub fn allocation_base(&self) -> usize {
        self.first_allocation_block as usize * BLOCK_SIZE
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

impl Display for VolumeInfo {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        writeln!(fmt, "Volume name: {}", self.name_lossy())?;
        writeln!(fmt, "Signature: {:04x}", self.signature)?;
        writeln!(fmt, "Created: {}", self.create_date)?;
        writeln!(fmt, "Last backup: {}", self.backup_date)?;
        writeln!(fmt, "Number of files: {}", self.file_count)?;
        writeln!(fmt, "First block of directory: {}", self.directory_start)?;
        writeln!(fmt, "Length of dir: {} blocks", self.directory_length)?;
        writeln!(fmt, "First alloc block: {}", self.first_allocation_block)?;
        writeln!(fmt, "Number of alloc blocks: {}", self.allocation_block_count)?;
        writeln!(fmt, "Alloc block size: {}", self.allocation_block_size)?;
        writeln!(fmt, "Clump size: {}", self.clump_size)?;
        writeln!(fmt, "Free alloc blocks: {}", self.free_blocks)?;
        Ok(())
    }
}
