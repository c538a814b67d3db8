/// Utility modules for the review extractor
///
/// This module contains filesystem helpers, console formatting and progress
/// reporting.

pub mod file_utils;
pub mod output_formatter;
pub mod progress;
