/// Core module for review conversion and search
///
/// This module contains the review record type, the converter that turns a
/// review CSV into per-review text files, and the word index used to search
/// those files.

pub mod converter;
pub mod index;
pub mod review;
pub mod search;
