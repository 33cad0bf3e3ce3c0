use chrono::{Duration, NaiveDate, NaiveDateTime};
use endian;
use error::MFSError;
use fs;

/// A packed on-disk structure located at a fixed byte offset in the image.
/// Field reads are bounds checked and fail with `Truncated`.
pub trait Structure<'a> {
    fn get_offset(&self) -> usize;
    fn get_image(&self) -> &'a [u8];

    fn read_bytes(&self, offset: usize, length: usize) -> fs::Result<&'a [u8]> {
        let image = self.get_image();
        let start = self.get_offset() + offset;
        image.get(start..start + length).ok_or(MFSError::Truncated {
            offset: start,
            needed: length,
            available: image.len().saturating_sub(start),
        })
    }

    fn read_u8(&self, offset: usize) -> fs::Result<u8> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    fn read_u16(&self, offset: usize) -> fs::Result<u16> {
        let mut bytes = [0u8; 2];
        bytes.copy_from_slice(self.read_bytes(offset, 2)?);
        Ok(endian::be_to_host16(&bytes))
    }

    fn read_u32(&self, offset: usize) -> fs::Result<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.read_bytes(offset, 4)?);
        Ok(endian::be_to_host32(&bytes))
    }

    /// Dates are seconds since midnight, January 1, 1904, in local time.
    fn read_date(&self, offset: usize) -> fs::Result<NaiveDateTime> {
        let seconds = self.read_u32(offset)?;
        let origin = NaiveDate::from_ymd_opt(1904, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(MFSError::InvalidDate)?;
        origin.checked_add_signed(Duration::seconds(seconds as i64)).ok_or(MFSError::InvalidDate)
    }
}

/// A view of `image` starting at `offset`.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    image: &'a [u8],
    offset: usize,
}

impl<'a> View<'a> {
    pub fn new(image: &'a [u8], offset: usize) -> View<'a> {
        View {
            image: image,
            offset: offset,
        }
    }
}

impl<'a> Structure<'a> for View<'a> {
    fn get_offset(&self) -> usize {
        self.offset
    }

    fn get_image(&self) -> &'a [u8] {
        self.image
    }
}
