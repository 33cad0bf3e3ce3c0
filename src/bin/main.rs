#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
extern crate mfs_rescue;

use clap::{App, Arg, ArgMatches};
use log::{Level, LevelFilter, Log, Metadata, Record};
use mfs_rescue::fs;
use mfs_rescue::{BitmapDecoding, ExtractOptions, FileSystem, Image, OutputMode};
use std::io::{self, Write};
use std::process;

struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(io::stderr(), "{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    if log::set_boxed_logger(Box::new(StderrLogger { level: level })).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

fn main() {
    let matches = App::new("readmfs")
        .version("0.1.0")
        .about("Extracts the data and resource forks of every file on a Macintosh File System (MFS) disk image.")
        .arg(Arg::with_name("verbose")
            .short("v")
            .help("Increases the logging verbosity on standard error. Can be used up to 3 times.")
            .multiple(true)
            .takes_value(false))
        .arg(Arg::with_name("output")
            .short("o")
            .long("output")
            .value_name("DIR")
            .help("Directory the extracted forks are written to. Defaults to the current directory.")
            .takes_value(true))
        .arg(Arg::with_name("offset")
            .long("offset")
            .value_name("BYTES")
            .help("Byte offset of the volume within the image file.")
            .validator(is_offset)
            .takes_value(true))
        .arg(Arg::with_name("raw")
            .long("raw")
            .help("Writes whole allocation blocks instead of stopping at each fork's logical length."))
        .arg(Arg::with_name("legacy")
            .long("legacy")
            .help("Decodes the allocation map and resource fork lengths the way the classic readmfs tool did."))
        .arg(Arg::with_name("list")
            .short("l")
            .long("list")
            .help("Prints the volume information and directory without writing any files."))
        .arg(Arg::with_name("image")
            .value_name("IMAGE")
            .help("The MFS disk image to read.")
            .required(true)
            .index(1))
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn is_offset(value: String) -> Result<(), String> {
    value.parse::<u64>().map(|_| ()).map_err(|_| format!("'{}' is not a byte count", value))
}

fn run(matches: &ArgMatches) -> fs::Result<()> {
    let offset = if matches.is_present("offset") {
        value_t!(matches, "offset", u64).unwrap_or_else(|e| e.exit())
    } else {
        0
    };
    let (decoding, mut options) = if matches.is_present("legacy") {
        (BitmapDecoding::Legacy, ExtractOptions::legacy())
    } else {
        (BitmapDecoding::Corrected, ExtractOptions::default())
    };
    if matches.is_present("raw") {
        options.mode = OutputMode::RawClumps;
    }

    let path = matches.value_of("image").unwrap_or_default();
    let image = Image::open(path, offset, None)?;
    info!("Image {} loaded into memory", path);

    let filesystem = FileSystem::new(&image, decoding)?;
    let volume = filesystem.get_volume_info();
    info!("Volume name: {}", volume.name_lossy());

    if matches.is_present("list") {
        print!("{}", volume);
        for record in filesystem.records() {
            println!();
            print!("{}", record?);
        }
        return Ok(());
    }

    let output = matches.value_of("output").unwrap_or(".");
    let report = filesystem.extract_all(output, &options)?;
    info!("Extracted {} files, {} bytes", report.files, report.bytes_written);
    Ok(())
}
