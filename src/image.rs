use error::MFSError;
use fs;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Deref;
use std::path::Path;

/// A disk image held entirely in memory.
#[derive(Debug, Clone)]
pub struct Image {
    data: Vec<u8>,
}

impl Image {
    pub fn from_bytes(data: Vec<u8>) -> Image {
        Image {
            data: data,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P, offset: u64, length: Option<u64>) -> fs::Result<Image> {
        let file = File::open(path)?;
        Image::load(file, offset, length)
    }

    /// Reads the window `offset..offset + length` of `file`, or everything
    /// from `offset` to the end when no length is given.
    pub fn load<F>(mut file: F, offset: u64, length: Option<u64>) -> fs::Result<Image> where F: Read + Seek {
        let file_length = file.seek(SeekFrom::End(0))?;
        if file_length < offset {
            return Err(MFSError::InvalidImageView);
        }
        let length = match length {
            None => file_length - offset,
            Some(length) => if file_length - offset < length {
                return Err(MFSError::InvalidImageView);
            } else {
                length
            },
        };
        file.seek(SeekFrom::Start(offset))?;
        let mut data = Vec::with_capacity(length as usize);
        file.take(length).read_to_end(&mut data)?;
        if (data.len() as u64) < length {
            return Err(MFSError::InvalidImageView);
        }
        Ok(Image::from_bytes(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Deref for Image {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data[..]
    }
}
