use error::MFSError;
use std::result;

pub type Result<T> = result::Result<T, MFSError>;
