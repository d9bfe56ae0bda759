//! OxiStream CLI - The Oxidized Stream
//!
//! A command-line front end for buffered gzip/bzip2 file streams.

mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use oxistream::bzip2::{Bzip2Reader, Bzip2Writer};
use oxistream::detect::StreamFormat;
use oxistream::gzip::{GzipReader, GzipWriter};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use utils::{check, create_progress_bar};

#[derive(Parser)]
#[command(name = "oxistream")]
#[command(
    author,
    version,
    about = "The Oxidized Stream - buffered gzip/bzip2 file streams"
)]
#[command(long_about = "
OxiStream reads and writes gzip and bzip2 files through one buffered
stream interface.

Examples:
  oxistream compress notes.txt notes.txt.gz
  oxistream compress notes.txt notes.txt.bz2
  oxistream decompress notes.txt.gz notes.txt
  oxistream cat notes.txt.bz2
  oxistream info notes.txt.gz
  oxistream selftest
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (.gz or .bz2)
        output: PathBuf,

        /// Output format - derived from the output extension if not given
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Decompress a file
    #[command(alias = "x")]
    Decompress {
        /// Compressed input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Print a compressed file's contents
    Cat {
        /// Compressed file to print
        file: PathBuf,
    },

    /// Show information about a compressed file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,
    },

    /// Run the built-in write/read/compare self-test
    #[command(alias = "t")]
    Selftest {
        /// Directory for the test files (a temporary one if omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Output stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// GZIP compressed file
    Gzip,
    /// Bzip2 compressed file
    Bz2,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            format,
            progress,
        } => cmd_compress(&input, &output, format, progress),
        Commands::Decompress {
            input,
            output,
            progress,
        } => cmd_decompress(&input, &output, progress),
        Commands::Cat { file } => cmd_cat(&file),
        Commands::Info { file } => cmd_info(&file),
        Commands::Selftest { dir } => cmd_selftest(dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_compress(
    input: &Path,
    output: &Path,
    format: Option<OutputFormat>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = format.unwrap_or_else(|| format_from_extension(output));

    let total = std::fs::metadata(input)?.len();
    let pb = create_progress_bar(total, progress);
    pb.set_message("Compressing");

    let source = File::open(input)?;
    match format {
        OutputFormat::Gzip => {
            let mut writer = GzipWriter::open(output)?;
            pump(source, &mut writer, &pb)?;
            writer.close()?;
        }
        OutputFormat::Bz2 => {
            let mut writer = Bzip2Writer::open(output)?;
            pump(source, &mut writer, &pb)?;
            writer.close()?;
        }
    }
    pb.finish_with_message("Done");

    let written = std::fs::metadata(output)?.len();
    println!(
        "Compressed: {} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        total,
        written
    );
    if total > 0 {
        let savings = (1.0 - written as f64 / total as f64) * 100.0;
        println!("  Space savings: {:.1}%", savings);
    }
    Ok(())
}

/// Pick the output format from the file extension, defaulting to gzip.
fn format_from_extension(output: &Path) -> OutputFormat {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "bz2" | "bzip2" => OutputFormat::Bz2,
        _ => OutputFormat::Gzip,
    }
}

/// Copy `reader` into `writer`, advancing the progress bar as input bytes
/// are consumed.
fn pump<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    pb: &indicatif::ProgressBar,
) -> std::io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&chunk[..n])?;
        pb.inc(n as u64);
    }
}

fn cmd_decompress(
    input: &Path,
    output: &Path,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format(input)?;
    let pb = create_progress_bar(1, progress);
    pb.set_message("Decompressing");

    let mut sink = File::create(output)?;
    match format {
        StreamFormat::Gzip => {
            let mut reader = GzipReader::open(input)?;
            std::io::copy(&mut reader, &mut sink)?;
        }
        StreamFormat::Bzip2 => {
            let mut reader = Bzip2Reader::open(input)?;
            std::io::copy(&mut reader, &mut sink)?;
        }
        StreamFormat::Unknown => {
            return Err(format!("{} is not a gzip or bzip2 file", input.display()).into());
        }
    }
    pb.inc(1);
    pb.finish_with_message("Done");

    println!(
        "Decompressed: {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        std::fs::metadata(output)?.len()
    );
    Ok(())
}

fn detect_format(path: &Path) -> Result<StreamFormat, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let (format, _magic) = StreamFormat::detect(&mut reader)?;
    Ok(format)
}

fn cmd_cat(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match detect_format(file)? {
        StreamFormat::Gzip => print_lines(GzipReader::open(file)?),
        StreamFormat::Bzip2 => print_lines(Bzip2Reader::open(file)?),
        StreamFormat::Unknown => {
            Err(format!("{} is not a gzip or bzip2 file", file.display()).into())
        }
    }
}

/// Line pump over any buffered reader; compressed and plain sources read
/// the same way here.
fn print_lines<R: BufRead>(reader: R) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        println!("{}", line?);
    }
    Ok(())
}

fn cmd_info(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let handle = File::open(file)?;
    let mut reader = BufReader::new(handle);
    let (format, magic) = StreamFormat::detect(&mut reader)?;
    let metadata = std::fs::metadata(file)?;

    println!("Stream Information");
    println!("==================");
    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!("Size: {} bytes", metadata.len());
    println!("MIME type: {}", format.mime_type());
    println!("Magic bytes: {:02X?}", magic);
    if format != StreamFormat::Unknown {
        println!("Extension: .{}", format.extension());
    }
    Ok(())
}

/// The fixed message the self-test writes, reads back, and compares.
const MESSAGE: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Etiam vitae \
                       erat sit amet lorem vehicula malesuada. Praesent tempus, tortor sed \
                       dapibus molestie, tortor sem sagittis velit, eget dapibus est odio \
                       aliquet magna. Morbi sed malesuada quam, nec rhoncus ligula. Ut non \
                       fermentum metus. Suspendisse potenti. Nam auctor facilisis lorem \
                       fermentum.";

fn cmd_selftest(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match dir {
        Some(d) => d,
        None => std::env::temp_dir().join(format!("oxistream-selftest-{}", std::process::id())),
    };
    std::fs::create_dir_all(&dir)?;
    println!("Self-test directory: {}", dir.display());
    println!();

    let payload = format!("{}\n", MESSAGE);
    let mut failures = 0u32;

    // gzip: write through the stream, read the line back, compare the file
    // against a one-shot reference encoding.
    {
        let path = dir.join("out.gz");
        let mut writer = GzipWriter::open(&path)?;
        write!(writer, "{}", payload)?;
        writer.close()?;

        let mut reader = GzipReader::open(&path)?;
        let mut line = String::new();
        reader.read_line(&mut line)?;
        failures += check("gzip line roundtrip", line == payload);

        let reference = {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(payload.as_bytes())?;
            encoder.finish()?
        };
        failures += check("gzip reference bytes", std::fs::read(&path)? == reference);
    }

    // bzip2: same drill.
    {
        let path = dir.join("out.bz2");
        let mut writer = Bzip2Writer::open(&path)?;
        write!(writer, "{}", payload)?;
        writer.close()?;

        let mut reader = Bzip2Reader::open(&path)?;
        let mut line = String::new();
        reader.read_line(&mut line)?;
        failures += check("bzip2 line roundtrip", line == payload);

        let reference = {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::new(9));
            encoder.write_all(payload.as_bytes())?;
            encoder.finish()?
        };
        failures += check("bzip2 reference bytes", std::fs::read(&path)? == reference);
    }

    println!();
    if failures > 0 {
        println!("Test results: {} check(s) failed", failures);
        std::process::exit(2);
    }

    println!("All checks OK");
    Ok(())
}
