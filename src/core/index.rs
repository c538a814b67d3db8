/// Inverted word index over the review text files
///
/// Every regular file in a directory becomes a document. Words are split on
/// whitespace, lowercased and trimmed of surrounding punctuation; the index
/// maps each word to the documents it appears in and its token positions
/// within each of them.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Errors raised while building an index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Directory {} does not exist.", .path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Failed to list {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Occurrences of one word in one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Index into `InvertedIndex::documents`
    pub document: usize,
    /// 0-based token positions within the document
    pub positions: Vec<usize>,
}

impl Posting {
    pub fn frequency(&self) -> usize {
        self.positions.len()
    }
}

/// Word to postings map plus the document table
#[derive(Debug, Default)]
pub struct InvertedIndex {
    documents: Vec<String>,
    words: HashMap<String, Vec<Posting>>,
}

/// Lowercase a token and strip punctuation from both ends.
///
/// Returns `None` when nothing is left.
pub fn normalize(token: &str) -> Option<String> {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every regular file directly inside `dir`.
    ///
    /// Files are added in file name order. Files that cannot be read as
    /// UTF-8 text are logged and left out.
    pub fn build(dir: &Path) -> Result<Self, IndexError> {
        if !dir.is_dir() {
            return Err(IndexError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|source| IndexError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut index = Self::new();
        for path in &files {
            match fs::read_to_string(path) {
                Ok(content) => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    index.add_document(name, &content);
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        info!(
            "Indexed {} documents, {} distinct words from {}",
            index.document_count(),
            index.word_count(),
            dir.display()
        );
        Ok(index)
    }

    /// Add one document's text under `name`
    pub fn add_document(&mut self, name: impl Into<String>, content: &str) {
        let document = self.documents.len();
        self.documents.push(name.into());

        let mut local: HashMap<String, Vec<usize>> = HashMap::new();
        let tokens = content.split_whitespace().filter_map(normalize);
        for (position, word) in tokens.enumerate() {
            local.entry(word).or_default().push(position);
        }

        debug!(
            "Document {} has {} distinct words",
            self.documents[document],
            local.len()
        );

        for (word, positions) in local {
            self.words
                .entry(word)
                .or_default()
                .push(Posting { document, positions });
        }
    }

    /// Postings for an already normalized word
    pub fn postings(&self, word: &str) -> &[Posting] {
        self.words.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document_name(&self, document: usize) -> &str {
        &self.documents[document]
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}
