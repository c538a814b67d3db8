/// Review Extractor - Split a CSV of product reviews into text files
///
/// This library reads a review CSV and writes one `review_<Id>.txt` file per
/// row into an output directory. Files that already exist are never
/// rewritten, so a conversion can be re-run safely. The written files can then
/// be indexed and searched by word.

pub mod core;
pub mod utils;

// Re-export main converter types for convenience
pub use crate::config::ConverterConfig;
pub use crate::core::converter::{ConversionError, ConversionSummary, Converter, RecordOutcome};
pub use crate::core::index::{IndexError, InvertedIndex};
pub use crate::core::review::Review;
pub use crate::core::search::{search, Query, QueryKind, SearchHit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert a review CSV without printing anything
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `csv_path` - Path to the review CSV
/// * `output_dir` - Directory to write review files into (created if missing)
///
/// # Returns
///
/// Totals for the run
pub fn convert_reviews<P, Q>(csv_path: P, output_dir: Q) -> Result<ConversionSummary, ConversionError>
where
    P: AsRef<std::path::Path>,
    Q: AsRef<std::path::Path>,
{
    let config = ConverterConfig::new(csv_path.as_ref(), output_dir.as_ref());
    Converter::new(config).run(&mut utils::progress::QuietReporter)
}

/// Library configuration
pub mod config {
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use log::{error, info};
    use serde::Deserialize;

    /// Default input CSV path
    pub const DEFAULT_CSV_PATH: &str = "Reviews.csv";

    /// Default output directory
    pub const DEFAULT_OUTPUT_DIR: &str = "review_text";

    /// Input and output locations for a conversion
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(default)]
    pub struct ConverterConfig {
        pub csv_path: PathBuf,
        pub output_dir: PathBuf,
    }

    impl ConverterConfig {
        pub fn new(csv_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
            Self {
                csv_path: csv_path.into(),
                output_dir: output_dir.into(),
            }
        }
    }

    impl Default for ConverterConfig {
        fn default() -> Self {
            Self::new(DEFAULT_CSV_PATH, DEFAULT_OUTPUT_DIR)
        }
    }

    /// Load configuration from a JSON file if provided
    ///
    /// A missing file or invalid JSON is logged and the defaults are used.
    /// Keys left out of the file keep their defaults.
    pub fn load_config(config_path: Option<&Path>) -> Result<ConverterConfig> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    error!("Configuration file not found: {}", path.display());
                    ConverterConfig::default()
                } else {
                    let config_str = std::fs::read_to_string(path)?;
                    match serde_json::from_str(&config_str) {
                        Ok(config) => {
                            info!("Loaded configuration from {}", path.display());
                            config
                        }
                        Err(e) => {
                            error!("Invalid JSON in configuration file: {}", e);
                            ConverterConfig::default()
                        }
                    }
                }
            }
            None => ConverterConfig::default(),
        };

        Ok(config)
    }
}

/// Command-line application functionality
pub mod app {
    use std::io::{self, BufRead, Write};

    use log::{debug, error};

    use crate::config::ConverterConfig;
    use crate::core::converter::{ConversionSummary, Converter};
    use crate::core::index::InvertedIndex;
    use crate::core::search::{search, Query};
    use crate::utils::output_formatter;
    use crate::utils::progress::ProgressReporter;

    /// Word that ends the search prompt
    pub const EXIT_COMMAND: &str = "exit";

    /// Run a conversion, catching and reporting any error that stops it
    ///
    /// # Arguments
    ///
    /// * `config` - Input and output locations
    /// * `reporter` - Receives progress and the final error, if any
    ///
    /// # Returns
    ///
    /// The run's totals, or `None` if it stopped early. Files written before
    /// the error stay on disk.
    pub fn run_converter(
        config: &ConverterConfig,
        reporter: &mut dyn ProgressReporter,
    ) -> Option<ConversionSummary> {
        match Converter::new(config.clone()).run(reporter) {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Conversion failed: {}", e);
                reporter.on_error(&e);
                None
            }
        }
    }

    /// Answer one query as printable text
    pub fn answer_query(index: &InvertedIndex, text: &str) -> String {
        let query = Query::parse(text);
        debug!("Query {:?} parsed as {:?}", text, query);
        let hits = search(index, &query);
        output_formatter::format_search_results(query.kind, &hits)
    }

    /// Read queries line by line and print their results
    ///
    /// Stops at `exit` or at the end of input. Blank lines are ignored.
    ///
    /// # Returns
    ///
    /// Number of queries answered
    pub fn run_search_prompt<R: BufRead, W: Write>(
        index: &InvertedIndex,
        input: R,
        mut output: W,
    ) -> io::Result<usize> {
        let mut answered = 0;
        let mut lines = input.lines();

        loop {
            write!(output, "Enter query: ")?;
            output.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            let query = line.trim();
            if query == EXIT_COMMAND {
                break;
            }
            if query.is_empty() {
                continue;
            }

            writeln!(output, "{}", answer_query(index, query))?;
            answered += 1;
        }

        writeln!(output)?;
        Ok(answered)
    }
}
