/// Output formatter for conversion progress and search results
///
/// This module builds the human-readable console lines printed while a
/// conversion runs (one line per created or skipped file, one progress line
/// per record, the closing summary) and the result blocks of the search
/// prompt.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::core::converter::{ConversionError, ConversionSummary};
use crate::core::search::{QueryKind, SearchHit};

/// Line printed before the first record
pub fn format_start(csv_path: &Path) -> String {
    format!(
        "{} {}...",
        "Starting conversion from CSV to text files:".bold(),
        csv_path.display()
    )
}

/// Line for a newly written file
pub fn format_created(path: &Path) -> String {
    format!("{} {}", "Created file:".green(), path.display())
}

/// Line for a file left untouched
pub fn format_skipped(path: &Path) -> String {
    format!(
        "File {} {}",
        path.display(),
        "already exists. Skipping.".yellow()
    )
}

/// Line for a row that could not be parsed into a review
pub fn format_malformed(index: u64, reason: &str) -> String {
    format!("{} row {}: {}", "Skipping malformed".red(), index, reason)
}

/// Line for a file that could not be written
pub fn format_write_failure(path: &Path, error: &std::io::Error) -> String {
    format!("{} {}: {}", "Failed to write".red().bold(), path.display(), error)
}

/// Running progress, `Processed review 3/10 - Elapsed Time: 0.42 seconds`
pub fn format_progress(index: u64, total: u64, elapsed: Duration) -> String {
    format!(
        "{} {}/{} - Elapsed Time: {:.2} seconds",
        "Processed review".cyan(),
        index,
        total,
        elapsed.as_secs_f64()
    )
}

/// Closing summary block
///
/// # Arguments
///
/// * `summary` - Totals for the finished run
/// * `output_dir` - Directory the files were written to
///
/// # Returns
///
/// Multi-line summary, starting with a blank line
pub fn format_summary(summary: &ConversionSummary, output_dir: &Path) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} Text files created for each review in the '{}' folder.\n",
        "Conversion complete.".bold(),
        output_dir.display()
    ));
    output.push_str(&format!(
        "{} {} ({} created, {} skipped)\n",
        "Reviews processed:".green(),
        summary.total_rows,
        summary.created,
        summary.skipped
    ));

    if summary.malformed > 0 {
        output.push_str(&format!(
            "{} {}\n",
            "Malformed rows:".yellow(),
            summary.malformed
        ));
    }
    if summary.failed > 0 {
        output.push_str(&format!("{} {}\n", "Write failures:".red(), summary.failed));
    }

    output.push_str(&format!(
        "{} {:.2} seconds",
        "Total Time Taken:".green(),
        summary.elapsed.as_secs_f64()
    ));

    output
}

/// Message for an error that stopped the run
pub fn format_error(error: &ConversionError) -> String {
    match error {
        ConversionError::InputNotFound { .. } => error.to_string().red().to_string(),
        _ => format!("{} {}", "An error occurred:".red().bold(), error),
    }
}

/// Line printed once the search index is ready
pub fn format_index_ready(documents: usize, words: usize, dir: &Path) -> String {
    format!(
        "{} {} documents, {} distinct words from {}",
        "Indexed".bold(),
        documents,
        words,
        dir.display()
    )
}

/// Search results, one `document   score` line per hit
///
/// # Arguments
///
/// * `kind` - Kind of the query that produced the hits
/// * `hits` - Ranked hits
///
/// # Returns
///
/// Multi-line block, without a trailing newline
pub fn format_search_results(kind: QueryKind, hits: &[SearchHit]) -> String {
    let mut output = format!("{} {}", "Type:".cyan(), kind);

    if kind == QueryKind::Invalid {
        output.push_str(&format!("\n{}", "Invalid search query".red()));
        return output;
    }
    if hits.is_empty() {
        output.push_str(&format!("\n{}", "No results found".yellow()));
        return output;
    }

    for hit in hits {
        output.push_str(&format!("\n{}   {}", hit.document, hit.score));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn progress_uses_two_decimals() {
        let line = format_progress(3, 10, Duration::from_millis(1500));
        assert!(line.ends_with("3/10 - Elapsed Time: 1.50 seconds"));
    }

    #[test]
    fn summary_reports_total_time() {
        let summary = ConversionSummary {
            total_rows: 4,
            created: 3,
            skipped: 1,
            elapsed: Duration::from_millis(2250),
            ..Default::default()
        };
        let text = format_summary(&summary, Path::new("review_text"));

        assert!(text.contains("'review_text' folder"));
        assert!(text.contains("4 (3 created, 1 skipped)"));
        assert!(text.ends_with("2.25 seconds"));
        assert!(!text.contains("Write failures"));
    }

    #[test]
    fn search_results_list_document_and_score() {
        let hits = vec![
            SearchHit {
                document: "review_3.txt".into(),
                score: 4,
                matched_terms: 2,
            },
            SearchHit {
                document: "review_1.txt".into(),
                score: 1,
                matched_terms: 1,
            },
        ];
        let text = format_search_results(QueryKind::Sentence, &hits);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("sentence"));
        assert_eq!(lines[1], "review_3.txt   4");
        assert_eq!(lines[2], "review_1.txt   1");

        assert!(format_search_results(QueryKind::Single, &[]).contains("No results found"));
        assert!(format_search_results(QueryKind::Invalid, &[]).contains("Invalid search query"));
    }

    #[test]
    fn missing_input_message_names_path() {
        let error = ConversionError::InputNotFound {
            path: PathBuf::from("Reviews.csv"),
        };
        assert!(format_error(&error).contains("The file Reviews.csv does not exist."));
    }
}
