use std::convert;
use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum MFSError {
    IOError(io::Error),
    InvalidImageView,
    SignatureMismatch { found: u16 },
    Truncated { offset: usize, needed: usize, available: usize },
    ChainCycle { start_block: u16, limit: usize },
    InvalidBlock { block: u16, limit: usize },
    InvalidDate,
}

impl fmt::Display for MFSError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MFSError::IOError(ref e) => write!(f, "IO Error: {}", e),
            MFSError::InvalidImageView => write!(f, "Invalid image offset or length"),
            MFSError::SignatureMismatch { found } => {
                write!(f, "Volume signature invalid: {:04x}, expected {:04x}", found, ::volume::SIGNATURE)
            },
            MFSError::Truncated { offset, needed, available } => {
                write!(f, "Image truncated: {} bytes needed at offset {}, {} available", needed, offset, available)
            },
            MFSError::ChainCycle { start_block, limit } => {
                write!(f, "Allocation chain starting at block {} exceeds {} blocks", start_block, limit)
            },
            MFSError::InvalidBlock { block, limit } => {
                write!(f, "Allocation block {} outside of volume ({} blocks)", block, limit)
            },
            MFSError::InvalidDate => write!(f, "Invalid date"),
        }
    }
}

impl error::Error for MFSError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            MFSError::IOError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl convert::From<io::Error> for MFSError {
    fn from(error: io::Error) -> Self {
        MFSError::IOError(error)
    }
}
