/// File handling utilities
///
/// This module provides the filesystem and CSV reading helpers used by the
/// converter: creating the output directory, writing a file only if it does
/// not exist yet, and counting data rows.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, warn};

/// What happened when writing a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file did not exist and was written
    Created,
    /// A file (or directory) already exists at the path; nothing was touched
    AlreadyExists,
}

/// Create the output directory and any missing parents.
///
/// Succeeds if the directory already exists.
pub fn ensure_output_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    debug!("Output directory ready: {}", dir.display());
    Ok(())
}

/// Write `contents` to `path` only if nothing exists there yet.
///
/// The existence check and the creation are a single `create_new` open, so an
/// existing file is never truncated. If writing fails after the file was
/// created, the partial file is removed so a later run does not mistake it
/// for finished output.
///
/// # Arguments
///
/// * `path` - Target file path
/// * `contents` - Complete file body
///
/// # Returns
///
/// Whether the file was created or already existed
pub fn write_new_file(path: &Path, contents: &[u8]) -> io::Result<WriteStatus> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(WriteStatus::AlreadyExists);
        }
        Err(e) => return Err(e),
    };

    if let Err(e) = file.write_all(contents).and_then(|_| file.flush()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(
                "Could not remove partial file {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e);
    }

    Ok(WriteStatus::Created)
}

/// Reader settings shared by both passes over the input.
///
/// Rows are allowed to have a different number of fields than the header so
/// that a short row surfaces as a missing field on that row alone, instead of
/// a reader error.
pub fn csv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Open a CSV file for reading with the shared settings
pub fn open_csv(path: &Path) -> io::Result<csv::Reader<File>> {
    let file = File::open(path)?;
    Ok(csv_reader_builder().from_reader(file))
}

/// Count the data rows of a CSV, header excluded.
///
/// Rows that fail to parse still count as rows; only I/O errors abort the
/// count.
pub fn count_data_rows<R: Read>(reader: &mut csv::Reader<R>) -> csv::Result<u64> {
    let mut count = 0u64;
    let mut record = csv::ByteRecord::new();

    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => count += 1,
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e),
            Err(e) => {
                debug!("Counting unparsable row: {}", e);
                count += 1;
            }
        }
    }

    Ok(count)
}
