//! emx-split CLI
//!
//! Split text files into fixed-size chunks, repeating the header rows.

use anyhow::{Context, Result};
use clap::Parser;
use emx_split::{BatchNaming, DetectionMode, ErrorPolicy, SplitConfig, Splitter, TextEncoding};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "emx-split")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Split text files into chunks of N lines with repeated headers")]
struct Cli {
    /// Input files, directories or glob patterns
    #[arg(required = true)]
    paths: Vec<String>,

    /// Directory to write chunks to (default: next to each input)
    #[arg(short = 'o', long)]
    export_path: Option<PathBuf>,

    /// Data lines per chunk, header excluded
    #[arg(short, long)]
    split: usize,

    /// Number of header lines at the top of each input
    #[arg(short = 'H', long, default_value_t = SplitConfig::DEFAULT_HEADER_LINES)]
    header: usize,

    /// Do not write the header lines into the chunks
    #[arg(long)]
    skip_header: bool,

    /// Default, ASCII, UTF7, UTF8, Unicode, UTF32 or BigEndianUnicode (default: detect)
    #[arg(short, long)]
    encoding: Option<TextEncoding>,

    /// Name chunks by covered line range instead of batch number
    #[arg(long)]
    batch_naming: bool,

    /// Detect the encoding of every input instead of reusing the first one
    #[arg(long)]
    detect_per_file: bool,

    /// Keep going with the next input when one fails
    #[arg(long)]
    keep_going: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "emx_split=debug" } else { "emx_split=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(cli);
    let report = Splitter::new(config)
        .split()
        .context("Split failed")?;

    println!(
        "Split {} file(s) into {} chunk(s)",
        report.files_processed(),
        report.output_count()
    );

    if !report.is_clean() {
        for failed in &report.failures {
            eprintln!("Failed: {}: {}", failed.input.display(), failed.error);
        }
        anyhow::bail!("{} input(s) could not be split", report.failures.len());
    }

    Ok(())
}

fn build_config(cli: Cli) -> SplitConfig {
    let mut config = SplitConfig::new(cli.paths, cli.split)
        .with_header_lines(cli.header)
        .with_skip_header(cli.skip_header);

    if let Some(dir) = cli.export_path {
        config = config.with_export_dir(dir);
    }
    if let Some(encoding) = cli.encoding {
        config = config.with_encoding(encoding);
    }
    if cli.batch_naming {
        config = config.with_naming(BatchNaming::LineRange);
    }
    if cli.detect_per_file {
        config = config.with_detection(DetectionMode::PerFile);
    }
    if cli.keep_going {
        config = config.with_error_policy(ErrorPolicy::Continue);
    }

    config
}
