use anyhow::{bail, Context, Result};
use clap::Parser;
use linescout::{dispatch, enumerate, FilenameMode, SearchJob};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod printer;

/// Search files line by line for a literal pattern.
///
/// With no FILE, read `.` if recursive, standard input otherwise.
/// `-` as a FILE means standard input.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print line number with output lines
    #[arg(short = 'n', long = "line-number")]
    line_number: bool,

    /// Print file name with output lines
    #[arg(short = 'f', long = "with-filename", conflicts_with = "no_filename")]
    with_filename: bool,

    /// Suppress the file name prefix on output
    #[arg(short = 'F', long = "no-filename")]
    no_filename: bool,

    /// Read all files under each directory, recursively
    #[arg(short = 'r', long = "recursive")]
    recursive: bool,

    /// Pattern to search for (can be given multiple times)
    #[arg(short = 'e', long = "pattern")]
    patterns: Vec<String>,

    /// Number of worker threads
    #[arg(short = 'j', long = "threads")]
    threads: Option<NonZeroUsize>,

    /// Path to an alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// PATTERN (unless -e was given), then FILEs
    #[arg(value_name = "PATTERN|FILE")]
    args: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("linescout: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut patterns = cli.patterns;
    let mut files = cli.args;
    if patterns.is_empty() {
        // The first free argument is the pattern.
        if files.is_empty() {
            bail!("no pattern given; try --help");
        }
        patterns.push(files.remove(0));
    }
    if patterns.iter().any(String::is_empty) {
        bail!("empty pattern");
    }

    let mut cli_job = SearchJob::new(patterns[0].clone());
    cli_job.line_numbers = cli.line_number;
    cli_job.filename_mode = if cli.with_filename {
        FilenameMode::Always
    } else if cli.no_filename {
        FilenameMode::Never
    } else {
        FilenameMode::Auto
    };
    cli_job.recursive = cli.recursive;
    if let Some(threads) = cli.threads {
        cli_job.thread_count = threads;
    }

    let job = SearchJob::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli_job);

    init_tracing(&job.log_level);

    let paths = enumerate(&files, job.recursive)?;
    info!(
        "searching {} file(s) for {} pattern(s)",
        paths.len(),
        patterns.len()
    );

    // One dispatch call per pattern over the same path set; the first
    // failing pattern stops the run.
    for pattern in &patterns {
        let job = SearchJob {
            pattern: pattern.clone(),
            ..job.clone()
        };
        dispatch(&paths, &job, printer::print_file)
            .with_context(|| format!("search for {:?} failed", pattern))?;
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
