extern crate byteorder;
extern crate chrono;
#[macro_use]
extern crate log;

mod error;
mod structure;
mod filesystem;

pub mod bitmap;
pub mod directory;
pub mod endian;
pub mod fork;
pub mod fs;
pub mod image;
pub mod volume;

pub use bitmap::{AllocationChain, BitmapDecoding};
pub use directory::{DirectoryIter, DirectoryRecord, ForkInfo};
pub use error::MFSError;
pub use filesystem::{ExtractOptions, ExtractionReport, FileSystem, ResourceLength, output_path};
pub use fork::{Fork, OutputMode, extract_fork};
pub use image::Image;
pub use volume::VolumeInfo;
