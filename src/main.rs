/// Review Extractor - Split a CSV of product reviews into text files
///
/// The main entry point for the review extractor application. It parses
/// command-line arguments, sets up logging and runs either the conversion or
/// the search prompt.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::{error, info, LevelFilter};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use review_extractor::app::{answer_query, run_converter, run_search_prompt};
use review_extractor::config::{load_config, ConverterConfig};
use review_extractor::utils::output_formatter;
use review_extractor::utils::progress::{ConsoleReporter, ProgressReporter, QuietReporter};
use review_extractor::InvertedIndex;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "review_extractor",
    version,
    about = "Split a CSV of product reviews into one text file per review",
    long_about = "Reads a review CSV (Id, ProductId, UserId, ProfileName, HelpfulnessNumerator,
HelpfulnessDenominator, Score, Time, Summary, Text) and writes review_<Id>.txt
for every row into the output directory. Existing files are never overwritten.
The `search` subcommand indexes the output directory and answers word queries."
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input CSV file (default: Reviews.csv)
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Directory holding the review files (default: review_text)
    #[arg(long = "output-dir", global = true)]
    output_dir: Option<PathBuf>,

    /// Path to JSON configuration file with `csv_path` and `output_dir`
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show a progress bar instead of one line per review
    #[arg(long = "progress-bar", action = ArgAction::SetTrue)]
    progress_bar: bool,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info", global = true)]
    log_level: LevelFilter,

    /// Log file path (default: review_extractor.log)
    #[arg(long = "log-file", default_value = "review_extractor.log", global = true)]
    log_file: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the review files by word
    ///
    /// A single word lists the files containing it; `+a +b` requires every
    /// word; `a -b` drops files containing `b`; several plain words rank files
    /// by how many of them they contain. Without --query an interactive prompt
    /// runs until `exit`.
    Search {
        /// Answer one query and exit
        #[arg(long = "query")]
        query: Option<String>,
    },
}

/// Main entry point function
fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    setup_logging(&args);

    // Command line flags take precedence over the configuration file
    let mut config = load_config(args.config.as_deref())?;
    if let Some(csv) = &args.csv {
        config.csv_path = csv.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    info!(
        "review_extractor {} reading {}",
        review_extractor::VERSION,
        config.csv_path.display()
    );

    if let Some(Command::Search { query }) = &args.command {
        return run_search(&config, query.as_deref());
    }

    let mut reporter: Box<dyn ProgressReporter> = if args.quiet {
        Box::new(QuietReporter)
    } else {
        let console = ConsoleReporter::new(&config.csv_path, &config.output_dir);
        if args.progress_bar {
            Box::new(console.with_progress_bar())
        } else {
            Box::new(console)
        }
    };

    match run_converter(&config, reporter.as_mut()) {
        Some(summary) if summary.is_success() => Ok(()),
        _ => process::exit(1),
    }
}

/// Index the output directory and answer queries
fn run_search(config: &ConverterConfig, query: Option<&str>) -> Result<()> {
    let index = match InvertedIndex::build(&config.output_dir) {
        Ok(index) => index,
        Err(e) => {
            error!("Indexing failed: {}", e);
            eprintln!("{}", e.to_string().red());
            process::exit(1);
        }
    };

    match query {
        Some(text) => println!("{}", answer_query(&index, text)),
        None => {
            println!(
                "{}",
                output_formatter::format_index_ready(
                    index.document_count(),
                    index.word_count(),
                    &config.output_dir
                )
            );
            let stdin = io::stdin();
            run_search_prompt(&index, stdin.lock(), io::stdout())?;
        }
    }

    Ok(())
}

/// Set up logging with file output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Set log level from arguments
    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Log to file when it can be created, otherwise to stderr
    if let Ok(file) = File::create(&args.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}
