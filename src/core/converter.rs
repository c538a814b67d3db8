/// Core CSV to text file converter
///
/// This file contains the Converter, which reads a review CSV and writes one
/// text file per review into the output directory, skipping reviews whose file
/// already exists.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::config::ConverterConfig;
use crate::core::review::{self, Review};
use crate::utils::file_utils::{self, WriteStatus};
use crate::utils::progress::ProgressReporter;

/// Errors that stop a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The input CSV does not exist
    #[error("The file {} does not exist.", .path.display())]
    InputNotFound { path: PathBuf },

    /// The output directory could not be created
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input CSV exists but could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the CSV failed part way through
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of handling a single data row
#[derive(Debug)]
pub enum RecordOutcome {
    /// A new file was written
    Created(PathBuf),
    /// The target file already existed and was left untouched
    Skipped(PathBuf),
    /// The row could not be turned into a review
    Malformed { reason: String },
    /// Writing the target file failed
    WriteFailed { path: PathBuf, error: io::Error },
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Data rows iterated, header excluded
    pub total_rows: u64,
    pub created: u64,
    pub skipped: u64,
    pub malformed: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl ConversionSummary {
    fn record(&mut self, outcome: &RecordOutcome) {
        self.total_rows += 1;
        match outcome {
            RecordOutcome::Created(_) => self.created += 1,
            RecordOutcome::Skipped(_) => self.skipped += 1,
            RecordOutcome::Malformed { .. } => self.malformed += 1,
            RecordOutcome::WriteFailed { .. } => self.failed += 1,
        }
    }

    /// True when no row failed to write
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Converts a review CSV into per-review text files
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter for the given input and output paths
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Run the conversion.
    ///
    /// The input is read twice: once to count data rows for the progress
    /// denominator, then again to convert them. Each row is attempted exactly
    /// once. Malformed rows and write failures are reported through
    /// `reporter` and counted; they do not stop the run.
    ///
    /// # Returns
    ///
    /// Totals for the run, or the error that stopped it before completion
    pub fn run(
        &self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<ConversionSummary, ConversionError> {
        let start_time = Instant::now();
        let csv_path = &self.config.csv_path;
        let output_dir = &self.config.output_dir;

        file_utils::ensure_output_dir(output_dir).map_err(|source| {
            ConversionError::OutputDir {
                path: output_dir.clone(),
                source,
            }
        })?;

        info!(
            "Converting {} into {}",
            csv_path.display(),
            output_dir.display()
        );

        reporter.on_start();

        let mut counter = self.open_input()?;
        let mut total_rows = file_utils::count_data_rows(&mut counter)?;
        drop(counter);
        debug!("Counted {} data rows", total_rows);

        reporter.on_counted(total_rows);

        let mut reader = self.open_input()?;
        let raw_headers = reader.headers()?.clone();
        let missing = review::missing_fields(raw_headers.iter());
        if !missing.is_empty() {
            warn!(
                "Header of {} lacks required columns: {}",
                csv_path.display(),
                missing.join(", ")
            );
        }
        let headers = review::dedupe_headers(&raw_headers);
        if headers != raw_headers {
            warn!(
                "Header of {} repeats column names; the last occurrence of each is used",
                csv_path.display()
            );
        }

        let mut summary = ConversionSummary::default();
        let mut record = csv::StringRecord::new();
        let mut index = 0u64;

        loop {
            let outcome = match reader.read_record(&mut record) {
                Ok(true) => self.convert_record(&headers, &record),
                Ok(false) => break,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => RecordOutcome::Malformed {
                    reason: e.to_string(),
                },
            };
            index += 1;

            // The file may have grown since it was counted
            total_rows = total_rows.max(index);

            log_outcome(index, &outcome);
            summary.record(&outcome);
            reporter.on_record(index, total_rows, &outcome, start_time.elapsed());
        }

        summary.elapsed = start_time.elapsed();
        info!(
            "Conversion finished: {} rows, {} created, {} skipped, {} malformed, {} failed in {:.2}s",
            summary.total_rows,
            summary.created,
            summary.skipped,
            summary.malformed,
            summary.failed,
            summary.elapsed.as_secs_f64()
        );
        reporter.on_finish(&summary);

        Ok(summary)
    }

    fn open_input(&self) -> Result<csv::Reader<File>, ConversionError> {
        let path = &self.config.csv_path;
        file_utils::open_csv(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConversionError::InputNotFound { path: path.clone() }
            } else {
                ConversionError::OpenInput {
                    path: path.clone(),
                    source,
                }
            }
        })
    }

    /// Turn one data row into its output file
    fn convert_record(
        &self,
        headers: &csv::StringRecord,
        record: &csv::StringRecord,
    ) -> RecordOutcome {
        let review: Review = match record.deserialize(Some(headers)) {
            Ok(review) => review,
            Err(e) => {
                return RecordOutcome::Malformed {
                    reason: e.to_string(),
                }
            }
        };

        let file_name = match review.file_name() {
            Ok(name) => name,
            Err(e) => {
                return RecordOutcome::Malformed {
                    reason: e.to_string(),
                }
            }
        };

        let path = self.config.output_dir.join(file_name);
        write_review(&path, &review)
    }
}

fn write_review(path: &Path, review: &Review) -> RecordOutcome {
    match file_utils::write_new_file(path, review.render().as_bytes()) {
        Ok(WriteStatus::Created) => RecordOutcome::Created(path.to_path_buf()),
        Ok(WriteStatus::AlreadyExists) => RecordOutcome::Skipped(path.to_path_buf()),
        Err(error) => RecordOutcome::WriteFailed {
            path: path.to_path_buf(),
            error,
        },
    }
}

fn log_outcome(index: u64, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Created(path) => debug!("Row {}: created {}", index, path.display()),
        RecordOutcome::Skipped(path) => debug!("Row {}: {} exists", index, path.display()),
        RecordOutcome::Malformed { reason } => warn!("Row {}: malformed: {}", index, reason),
        RecordOutcome::WriteFailed { path, error: e } => {
            error!("Row {}: failed to write {}: {}", index, path.display(), e)
        }
    }
}
