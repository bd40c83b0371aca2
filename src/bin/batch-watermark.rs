use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use batch_watermark::{process_directory, BatchStats, Error, Opacity, ProcessResult, Result, Status};

#[derive(Parser)]
#[command(
    name = "batch-watermark",
    about = "Apply watermark to images",
    version,
    after_help = "The watermark is stretched to the full height of each image, centered \
                  horizontally and saved as <name>_watermarked.png.\n\
                  Supported inputs: .jpg, .jpeg, .png, .bmp"
)]
struct Cli {
    /// Directory with source images
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Path to watermark file
    #[arg(short, long)]
    watermark: PathBuf,

    /// Directory for saving results
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Watermark opacity (0-1)
    #[arg(short = 'a', long, default_value_t = Opacity::DEFAULT)]
    opacity: Opacity,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Hide the per-file "Processed" lines
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = preflight(&cli) {
        eprintln!("Error: {e}");
        return;
    }

    let mut stdout = io::stdout();
    // Stdout write failures are ignored.
    let _ = write_header(&mut stdout, &cli);

    let stats = match process_directory(
        &cli.input_dir,
        &cli.watermark,
        &cli.output_dir,
        cli.opacity,
        |r| {
            let _ = write_result(&mut io::stdout(), r, cli.quiet);
        },
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    let _ = write_report(&mut stdout, &cli.input_dir, &stats);
}

/// Check that the input directory and watermark exist before touching any file.
fn preflight(cli: &Cli) -> Result<()> {
    if !cli.input_dir.exists() {
        return Err(Error::InputDirMissing(cli.input_dir.clone()));
    }
    if !cli.watermark.exists() {
        return Err(Error::WatermarkMissing(cli.watermark.clone()));
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn write_header<W: Write>(out: &mut W, cli: &Cli) -> io::Result<()> {
    writeln!(out, "Starting image processing...")?;
    writeln!(out, "Input directory: {}", cli.input_dir.display())?;
    writeln!(out, "Watermark: {}", cli.watermark.display())?;
    writeln!(out, "Output directory: {}", cli.output_dir.display())?;
    writeln!(out, "Opacity: {}", cli.opacity)?;
    writeln!(out, "{}", "-".repeat(50))
}

fn write_result<W: Write>(out: &mut W, result: &ProcessResult, quiet: bool) -> io::Result<()> {
    let filename = result.file_name();
    match result.status {
        Status::Processed if quiet => Ok(()),
        Status::Processed => writeln!(out, "Processed: {filename}"),
        Status::Skipped => writeln!(out, "Skipped unsupported file: {filename}"),
        Status::Failed => writeln!(out, "Error processing {filename}: {}", result.message),
    }
}

/// Final output: the empty-directory warning, or the statistics block.
fn write_report<W: Write>(out: &mut W, input_dir: &Path, stats: &BatchStats) -> io::Result<()> {
    if stats.is_empty() {
        return writeln!(out, "Warning: Directory {} is empty", input_dir.display());
    }

    writeln!(out)?;
    writeln!(out, "Processing Statistics:")?;
    writeln!(out, "Successfully processed: {}", stats.processed)?;
    writeln!(out, "Skipped: {}", stats.skipped)?;
    writeln!(out, "Errors: {}", stats.errors)
}
