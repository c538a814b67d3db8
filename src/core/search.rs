/// Query parsing and ranking over an `InvertedIndex`
///
/// Four kinds of query are understood:
///
/// * a single word, matching every document that contains it
/// * `+` terms, matching documents that contain every term
/// * `-` terms, matching documents that contain a plain term and none of the
///   `-` terms
/// * several plain words, ranked by how many distinct query words a document
///   contains, then by their total frequency
///
/// Mixing `+` and `-` in one query is invalid.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::index::{normalize, InvertedIndex};

const REQUIRE_SIGN: char = '+';
const EXCLUDE_SIGN: char = '-';

/// Kind of a parsed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Single,
    AllOf,
    Exclude,
    Sentence,
    Invalid,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::Single => "single word",
            QueryKind::AllOf => "all of (+)",
            QueryKind::Exclude => "exclude (-)",
            QueryKind::Sentence => "sentence",
            QueryKind::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// A query split into normalized terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: QueryKind,
    /// Terms a document should contain
    pub include: Vec<String>,
    /// Terms a document must not contain
    pub exclude: Vec<String>,
}

impl Query {
    /// Parse raw query text
    pub fn parse(text: &str) -> Self {
        let raw: Vec<&str> = text.split_whitespace().collect();
        let has_require = raw.iter().any(|t| t.starts_with(REQUIRE_SIGN));
        let has_exclude = raw.iter().any(|t| t.starts_with(EXCLUDE_SIGN));

        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for token in raw.iter().copied() {
            if let Some(rest) = token.strip_prefix(EXCLUDE_SIGN) {
                exclude.extend(normalize(rest));
            } else {
                let rest = token.strip_prefix(REQUIRE_SIGN).unwrap_or(token);
                include.extend(normalize(rest));
            }
        }
        dedup_in_order(&mut include);
        dedup_in_order(&mut exclude);

        let kind = if include.is_empty() || (has_require && has_exclude) {
            QueryKind::Invalid
        } else if has_require {
            QueryKind::AllOf
        } else if has_exclude {
            QueryKind::Exclude
        } else if include.len() == 1 {
            QueryKind::Single
        } else {
            QueryKind::Sentence
        };

        Self {
            kind,
            include,
            exclude,
        }
    }
}

fn dedup_in_order(terms: &mut Vec<String>) {
    let mut seen = HashSet::new();
    terms.retain(|term| seen.insert(term.clone()));
}

/// One matching document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub document: String,
    /// Total occurrences of the matched query words
    pub score: usize,
    /// Distinct query words found in the document
    pub matched_terms: usize,
}

/// Run a parsed query against the index.
///
/// Hits are ordered by matched terms, then score, both descending, then by
/// document name. Invalid queries return no hits.
pub fn search(index: &InvertedIndex, query: &Query) -> Vec<SearchHit> {
    if query.kind == QueryKind::Invalid {
        return Vec::new();
    }

    // document -> (score, matched terms)
    let mut scores: HashMap<usize, (usize, usize)> = HashMap::new();
    for term in &query.include {
        for posting in index.postings(term) {
            let entry = scores.entry(posting.document).or_insert((0, 0));
            entry.0 += posting.frequency();
            entry.1 += 1;
        }
    }

    if query.kind == QueryKind::AllOf {
        let required = query.include.len();
        scores.retain(|_, (_, matched)| *matched == required);
    }

    for term in &query.exclude {
        for posting in index.postings(term) {
            scores.remove(&posting.document);
        }
    }

    let mut hits: Vec<SearchHit> = scores
        .into_iter()
        .map(|(document, (score, matched_terms))| SearchHit {
            document: index.document_name(document).to_string(),
            score,
            matched_terms,
        })
        .collect();

    hits.sort_by(|a, b| {
        b.matched_terms
            .cmp(&a.matched_terms)
            .then(b.score.cmp(&a.score))
            .then_with(|| a.document.cmp(&b.document))
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document("review_1.txt", "good dog food good quality");
        index.add_document("review_2.txt", "salted peanuts not good");
        index.add_document("review_3.txt", "dog treats, dog toys, dog food");
        index
    }

    fn names(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|hit| hit.document.as_str()).collect()
    }

    #[test]
    fn classifies_queries() {
        assert_eq!(Query::parse("Dog").kind, QueryKind::Single);
        assert_eq!(Query::parse("+dog +food").kind, QueryKind::AllOf);
        assert_eq!(Query::parse("good -dog").kind, QueryKind::Exclude);
        assert_eq!(Query::parse("dog food").kind, QueryKind::Sentence);
        assert_eq!(Query::parse("+dog -food").kind, QueryKind::Invalid);
        assert_eq!(Query::parse("   ").kind, QueryKind::Invalid);
        assert_eq!(Query::parse("-dog").kind, QueryKind::Invalid);
    }

    #[test]
    fn single_word_ranks_by_frequency() {
        let hits = search(&index(), &Query::parse("DOG"));
        assert_eq!(names(&hits), vec!["review_3.txt", "review_1.txt"]);
        assert_eq!(hits[0].score, 3);
    }

    #[test]
    fn all_of_requires_every_term() {
        let hits = search(&index(), &Query::parse("+good +dog"));
        assert_eq!(names(&hits), vec!["review_1.txt"]);
        assert_eq!(hits[0].score, 3);
    }

    #[test]
    fn exclude_drops_documents_with_minus_terms() {
        let hits = search(&index(), &Query::parse("good -peanuts"));
        assert_eq!(names(&hits), vec!["review_1.txt"]);
    }

    #[test]
    fn sentence_prefers_more_distinct_words() {
        // review_3 has more occurrences of "dog" but lacks "good"
        let hits = search(&index(), &Query::parse("good dog"));
        assert_eq!(
            names(&hits),
            vec!["review_1.txt", "review_3.txt", "review_2.txt"]
        );
        assert_eq!(hits[0].matched_terms, 2);
        assert_eq!(hits[1].score, 3);
    }

    #[test]
    fn unknown_words_find_nothing() {
        assert!(search(&index(), &Query::parse("zebra")).is_empty());
        assert!(search(&index(), &Query::parse("+dog -food")).is_empty());
    }
}
