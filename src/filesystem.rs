use bitmap::{AllocationChain, BitmapDecoding};
use directory::{DirectoryIter, DirectoryRecord, ForkInfo};
use error::MFSError;
use fork::{self, OutputMode, CLUMP_SIZE};
use fs;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use volume::{VolumeInfo, OFFSET_ALLOCATION_MAP};

/// Which logical length bounds the resource fork in `OutputMode::Exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLength {
    Own,
    /// Reuse the data fork's logical length, reproducing older extractions.
    DataFork,
}

impl Default for ResourceLength {
    fn default() -> ResourceLength {
        ResourceLength::Own
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub mode: OutputMode,
    pub resource_length: ResourceLength,
}

impl ExtractOptions {
    /// Resource forks bounded by the data fork length, as the classic reader
    /// wrote them. Pair with a volume opened with `BitmapDecoding::Legacy`.
    pub fn legacy() -> ExtractOptions {
        ExtractOptions {
            mode: OutputMode::Exact,
            resource_length: ResourceLength::DataFork,
        }
    }
}

#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub files: usize,
    pub bytes_written: u64,
    pub warnings: Vec<String>,
}

/// A parsed MFS volume borrowing its image.
#[derive(Debug)]
pub struct FileSystem<'a> {
    image: &'a [u8],
    info: VolumeInfo,
    chain: AllocationChain,
    warnings: Vec<MFSError>,
}

impl<'a> FileSystem<'a> {
    /// The allocation map is decoded once here, so `decoding` applies to
    /// every later extraction.
    pub fn new(image: &'a [u8], decoding: BitmapDecoding) -> fs::Result<FileSystem<'a>> {
        let info = VolumeInfo::parse(image)?;
        let mut warnings = Vec::new();
        if let Err(e) = info.validate() {
            warn!("{}", e);
            warnings.push(e);
        }
        if info.allocation_block_size as usize != CLUMP_SIZE {
            warn!("Allocation block size {} differs from {}, addressing fork data in {} byte clumps",
                  info.allocation_block_size, CLUMP_SIZE, CLUMP_SIZE);
        }

        let map = &image[OFFSET_ALLOCATION_MAP..];
        let chain = AllocationChain::decode(map, info.allocation_block_count, decoding).map_err(|e| match e {
            MFSError::Truncated { offset, needed, available } => MFSError::Truncated {
                offset: offset + OFFSET_ALLOCATION_MAP,
                needed: needed,
                available: available,
            },
            e => e,
        })?;

        Ok(FileSystem {
            image: image,
            info: info,
            chain: chain,
            warnings: warnings,
        })
    }

    pub fn get_volume_info(&self) -> &VolumeInfo {
        &self.info
    }

    pub fn get_allocation_chain(&self) -> &AllocationChain {
        &self.chain
    }

    /// Recoverable problems found while opening the volume.
    pub fn get_warnings(&self) -> &[MFSError] {
        &self.warnings[..]
    }

    pub fn records(&self) -> DirectoryIter<'a> {
        DirectoryIter::new(self.image, self.info.directory_start, self.info.file_count)
    }

    pub fn extract_fork<W>(&self, fork_info: &ForkInfo, logical_length: u32, mode: OutputMode, sink: &mut W) -> fs::Result<u64>
        where W: Write {
        fork::extract_fork(self.image,
                           &self.chain,
                           self.info.allocation_base(),
                           fork_info.start_block,
                           logical_length,
                           mode,
                           sink)
    }

    /// Writes `<name>.DATA` and `<name>.RSRC` into `directory` for every
    /// directory record.
    pub fn extract_all<P: AsRef<Path>>(&self, directory: P, options: &ExtractOptions) -> fs::Result<ExtractionReport> {
        let directory = directory.as_ref();
        let mut report = ExtractionReport::default();
        for record in self.records() {
            let record = record?;
            report.bytes_written += self.extract_record(&record, directory, options)?;
            report.files += 1;
        }
        report.warnings = self.warnings.iter().map(|w| w.to_string()).collect();
        Ok(report)
    }

    pub fn extract_record(&self, record: &DirectoryRecord, directory: &Path, options: &ExtractOptions) -> fs::Result<u64> {
        let resource_length = match options.resource_length {
            ResourceLength::Own => record.resource.logical_length,
            ResourceLength::DataFork => record.data.logical_length,
        };
        let forks = [
            ("DATA", &record.data, record.data.logical_length),
            ("RSRC", &record.resource, resource_length),
        ];

        let mut written = 0;
        for &(suffix, fork_info, logical_length) in &forks {
            let path = output_path(directory, &record.name, suffix);
            info!("Writing {}", path.display());
            let mut sink = BufWriter::new(File::create(&path)?);
            written += self.extract_fork(fork_info, logical_length, options.mode, &mut sink)?;
            sink.flush()?;
        }
        Ok(written)
    }
}

/// Builds `<name>.<suffix>` from the raw name bytes. Only `/` and NUL, which
/// cannot appear in a path component, are replaced.
pub fn output_path(directory: &Path, name: &[u8], suffix: &str) -> PathBuf {
    let mut bytes: Vec<u8> = name.iter().map(|&b| if b == b'/' || b == 0 { b'_' } else { b }).collect();
    bytes.push(b'.');
    bytes.extend_from_slice(suffix.as_bytes());
    directory.join(bytes_to_os_string(bytes))
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}
