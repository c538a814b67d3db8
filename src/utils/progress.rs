/// Progress reporting for conversion runs
///
/// The converter calls a `ProgressReporter` before reading the input, once
/// the rows are counted, once per record and once at the end. The console
/// reporter prints either one line per record or an indicatif progress bar.

use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use crate::core::converter::{ConversionError, ConversionSummary, RecordOutcome};
use crate::utils::output_formatter;

/// Receives progress events from a conversion run
pub trait ProgressReporter {
    /// Called before the input is opened
    fn on_start(&mut self) {}

    /// Called once the data rows have been counted
    fn on_counted(&mut self, _total_rows: u64) {}

    /// Called after every record, whatever its outcome. `index` is 1-based.
    fn on_record(&mut self, index: u64, total_rows: u64, outcome: &RecordOutcome, elapsed: Duration);

    /// Called after the last record
    fn on_finish(&mut self, _summary: &ConversionSummary) {}

    /// Called when the run stops with an error
    fn on_error(&mut self, _error: &ConversionError) {}
}

/// Reporter that prints nothing
#[derive(Debug, Default)]
pub struct QuietReporter;

impl ProgressReporter for QuietReporter {
    fn on_record(&mut self, _: u64, _: u64, _: &RecordOutcome, _: Duration) {}
}

/// Prints progress to stdout, or to any writer
pub struct ConsoleReporter<W: Write = Stdout> {
    csv_path: PathBuf,
    output_dir: PathBuf,
    out: W,
    use_bar: bool,
    bar: Option<ProgressBar>,
}

impl ConsoleReporter<Stdout> {
    /// Reporter printing one line per file and one progress line per record
    pub fn new(csv_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_writer(csv_path, output_dir, io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(
        csv_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        out: W,
    ) -> Self {
        Self {
            csv_path: csv_path.into(),
            output_dir: output_dir.into(),
            out,
            use_bar: false,
            bar: None,
        }
    }

    /// Replace the per-record lines with a progress bar. Malformed rows and
    /// write failures are still printed above the bar.
    pub fn with_progress_bar(mut self) -> Self {
        self.use_bar = true;
        self
    }

    /// Everything printed so far, when writing to a buffer
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn print(&mut self, line: &str) {
        let out = &mut self.out;
        let result = match &self.bar {
            Some(bar) => bar.suspend(|| writeln!(out, "{}", line)),
            None => writeln!(out, "{}", line),
        };
        if let Err(e) = result {
            warn!("Failed to write progress output: {}", e);
        }
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn on_start(&mut self) {
        let line = output_formatter::format_start(&self.csv_path);
        self.print(&line);
    }

    fn on_counted(&mut self, total_rows: u64) {
        if self.use_bar {
            let bar = ProgressBar::new(total_rows);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} reviews ({eta})")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            self.bar = Some(bar);
        }
    }

    fn on_record(&mut self, index: u64, total_rows: u64, outcome: &RecordOutcome, elapsed: Duration) {
        let line = match outcome {
            RecordOutcome::Created(path) if !self.use_bar => {
                Some(output_formatter::format_created(path))
            }
            RecordOutcome::Skipped(path) if !self.use_bar => {
                Some(output_formatter::format_skipped(path))
            }
            RecordOutcome::Malformed { reason } => {
                Some(output_formatter::format_malformed(index, reason))
            }
            RecordOutcome::WriteFailed { path, error } => {
                Some(output_formatter::format_write_failure(path, error))
            }
            _ => None,
        };
        if let Some(line) = line {
            self.print(&line);
        }

        match &self.bar {
            Some(bar) => {
                if bar.length() != Some(total_rows) {
                    bar.set_length(total_rows);
                }
                bar.set_position(index);
            }
            None => {
                let progress = output_formatter::format_progress(index, total_rows, elapsed);
                self.print(&progress);
            }
        }
    }

    fn on_finish(&mut self, summary: &ConversionSummary) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("Conversion complete");
        }
        let text = output_formatter::format_summary(summary, &self.output_dir);
        self.print(&text);
    }

    fn on_error(&mut self, error: &ConversionError) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
        let text = output_formatter::format_error(error);
        self.print(&text);
    }
}
