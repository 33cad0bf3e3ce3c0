use chrono::NaiveDateTime;
use fs;
use std::fmt::{self, Display, Formatter};
use structure::{Structure, View};
use volume::BLOCK_SIZE;

/// Length of a directory record up to and including the name length byte.
pub const SIZE_RECORD_HEADER: usize = 51;

const FLAG_USED: u8 = 0x80;
const FLAG_LOCKED: u8 = 0x01;

/// On-disk length of a record whose name is `name_length` bytes long. Records
/// always occupy an even number of bytes.
pub fn record_length(name_length: usize) -> usize {
    SIZE_RECORD_HEADER + name_length + if name_length % 2 == 0 { 1 } else { 0 }
}

/// Start block, logical and physical end-of-file of one fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkInfo {
    pub start_block: u16,
    pub logical_length: u32,
    pub physical_length: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRecord {
    pub flags: u8,
    pub version: u8,
    pub finder_info: [u8; 16],
    pub file_number: u32,
    pub data: ForkInfo,
    pub resource: ForkInfo,
    pub create_date: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    pub name: Vec<u8>,
}

impl DirectoryRecord {
    fn parse(record: &View) -> fs::Result<DirectoryRecord> {
        let name_length = record.read_u8(50)? as usize;
        let mut finder_info = [0u8; 16];
        finder_info.copy_from_slice(record.read_bytes(2, 16)?);
        Ok(DirectoryRecord {
            flags: record.read_u8(0)?,
            version: record.read_u8(1)?,
            finder_info: finder_info,
            file_number: record.read_u32(18)?,
            data: ForkInfo {
                start_block: record.read_u16(22)?,
                logical_length: record.read_u32(24)?,
                physical_length: record.read_u32(28)?,
            },
            resource: ForkInfo {
                start_block: record.read_u16(32)?,
                logical_length: record.read_u32(34)?,
                physical_length: record.read_u32(38)?,
            },
            create_date: record.read_date(42)?,
            modify_date: record.read_date(46)?,
            name: record.read_bytes(SIZE_RECORD_HEADER, name_length)?.to_vec(),
        })
    }

    pub fn is_used(&self) -> bool {
        self.flags & FLAG_USED != 0
    }

    pub fn is_locked(&self) -> bool {
        self.flags & FLAG_LOCKED != 0
    }

    pub fn file_type(&self) -> [u8; 4] {
        [self.finder_info[0], self.finder_info[1], self.finder_info[2], self.finder_info[3]]
    }

    pub fn creator(&self) -> [u8; 4] {
        [self.finder_info[4], self.finder_info[5], self.finder_info[6], self.finder_info[7]]
    }

    pub fn length(&self) -> usize {
        record_length(self.name.len())
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

impl Display for DirectoryRecord {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        writeln!(fmt, "File {} length {}: >>{}<<", self.file_number, self.name.len(), self.name_lossy())?;
        writeln!(fmt, "Used: {} Locked: {}", self.is_used(), self.is_locked())?;
        writeln!(fmt, "Type: {} Creator: {}",
                 String::from_utf8_lossy(&self.file_type()), String::from_utf8_lossy(&self.creator()))?;
        writeln!(fmt, "Created: {} Modified: {}", self.create_date, self.modify_date)?;
        writeln!(fmt, "DATA fork: first block {} log eof {} phys eof {}",
                 self.data.start_block, self.data.logical_length, self.data.physical_length)?;
        writeln!(fmt, "RSRC fork: first block {} log eof {} phys eof {}",
                 self.resource.start_block, self.resource.logical_length, self.resource.physical_length)?;
        Ok(())
    }
}

/// Sequential scan of the flat directory, yielding exactly `remaining`
/// records. Running off the end of the image is an error, after which the
/// iterator is exhausted.
#[derive(Debug)]
pub struct DirectoryIter<'a> {
    image: &'a [u8],
    position: usize,
    remaining: u16,
}

impl<'a> DirectoryIter<'a> {
    pub fn new(image: &'a [u8], directory_start: u16, file_count: u16) -> DirectoryIter<'a> {
        DirectoryIter {
            image: image,
            position: directory_start as usize * BLOCK_SIZE,
            remaining: file_count,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for DirectoryIter<'a> {
    type Item = fs::Result<DirectoryRecord>;

    fn next(&mut self) -> Option<fs::Result<DirectoryRecord>> {
        if self.remaining == 0 {
            return None;
        }
        let record = match DirectoryRecord::parse(&View::new(self.image, self.position)) {
            Ok(record) => record,
            Err(e) => {
                self.remaining = 0;
                return Some(Err(e));
            },
        };
        debug!("Pos: {} = 0x{:08x} used = {}", self.position, self.position, record.is_used());

        self.position += record.length();
        if self.position % BLOCK_SIZE > BLOCK_SIZE - SIZE_RECORD_HEADER {
            debug!("Skipping to next block");
            self.position = (self.position / BLOCK_SIZE + 1) * BLOCK_SIZE;
        }
        self.remaining -= 1;
        Some(Ok(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
