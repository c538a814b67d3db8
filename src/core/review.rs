/// Review record parsed from one CSV data row
///
/// Columns are matched by header name, so column order in the input does not
/// matter and extra columns are ignored. Every value is kept verbatim as text.

use std::fmt::Write;

use serde::Deserialize;

/// Header names a review CSV must provide
pub const REQUIRED_FIELDS: [&str; 10] = [
    "Id",
    "ProductId",
    "UserId",
    "ProfileName",
    "HelpfulnessNumerator",
    "HelpfulnessDenominator",
    "Score",
    "Time",
    "Summary",
    "Text",
];

/// Prefix of every generated file name
pub const FILE_PREFIX: &str = "review_";

/// Extension of every generated file name
pub const FILE_EXTENSION: &str = "txt";

/// Error when a record's `Id` cannot be turned into a file name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidId {
    #[error("record has an empty Id")]
    Empty,
    #[error("record Id {0:?} is not a valid file name component")]
    Unsafe(String),
}

/// One product review
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub profile_name: String,
    pub helpfulness_numerator: String,
    pub helpfulness_denominator: String,
    pub score: String,
    pub time: String,
    pub summary: String,
    pub text: String,
}

impl Review {
    /// Labeled values in the order they are written to the output file.
    /// `Id` is not part of the body; it only names the file.
    pub fn labeled_fields(&self) -> [(&'static str, &str); 9] {
        [
            ("ProductId", self.product_id.as_str()),
            ("UserId", self.user_id.as_str()),
            ("ProfileName", self.profile_name.as_str()),
            ("HelpfulnessNumerator", self.helpfulness_numerator.as_str()),
            ("HelpfulnessDenominator", self.helpfulness_denominator.as_str()),
            ("Score", self.score.as_str()),
            ("Time", self.time.as_str()),
            ("Summary", self.summary.as_str()),
            ("Text", self.text.as_str()),
        ]
    }

    /// Render the file body: one `Label: value` line per field
    pub fn render(&self) -> String {
        let mut body = String::new();
        for (label, value) in self.labeled_fields() {
            // Writing into a String cannot fail
            let _ = writeln!(body, "{}: {}", label, value);
        }
        body
    }

    /// File name for this review, `review_<Id>.txt`
    ///
    /// The Id must stay a single path component inside the output directory.
    pub fn file_name(&self) -> Result<String, InvalidId> {
        let id = self.id.as_str();
        if id.is_empty() {
            return Err(InvalidId::Empty);
        }
        if id.contains(['/', '\\', '\0']) || id == "." || id == ".." {
            return Err(InvalidId::Unsafe(id.to_string()));
        }

        Ok(format!("{}{}.{}", FILE_PREFIX, id, FILE_EXTENSION))
    }
}

/// Required fields absent from a CSV header row
pub fn missing_fields<'a, I>(headers: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.into_iter().collect();
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !present.contains(field))
        .collect()
}

/// Header row with every repeated column name blanked out except its last
/// occurrence, so a repeated column resolves to its rightmost value instead
/// of failing every row. Blank names match no field and are ignored.
pub fn dedupe_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    let names: Vec<&str> = headers.iter().collect();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if names[i + 1..].contains(name) {
                ""
            } else {
                *name
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Review {
        Review {
            id: "1".into(),
            product_id: "B001E4KFG0".into(),
            user_id: "A3SGXH7AUHU8GW".into(),
            profile_name: "delmartian".into(),
            helpfulness_numerator: "1".into(),
            helpfulness_denominator: "1".into(),
            score: "5".into(),
            time: "1303862400".into(),
            summary: "Good Quality Dog Food".into(),
            text: "I have bought several of the Vitality canned dog food products.".into(),
        }
    }

    #[test]
    fn renders_nine_lines_in_order() {
        let body = sample().render();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "ProductId: B001E4KFG0");
        assert_eq!(lines[2], "ProfileName: delmartian");
        assert_eq!(lines[7], "Summary: Good Quality Dog Food");
        assert!(lines[8].starts_with("Text: I have bought"));
        assert!(body.ends_with('\n'));
        assert!(!body.ends_with("\n\n"));
    }

    #[test]
    fn keeps_embedded_newlines_verbatim() {
        let mut review = sample();
        review.text = "line one\nline two".into();

        assert!(review.render().ends_with("Text: line one\nline two\n"));
    }

    #[test]
    fn file_name_uses_id() {
        assert_eq!(sample().file_name().unwrap(), "review_1.txt");
    }

    #[test]
    fn rejects_ids_that_escape_the_directory() {
        let mut review = sample();
        review.id = String::new();
        assert_eq!(review.file_name(), Err(InvalidId::Empty));

        review.id = "../etc".into();
        assert!(matches!(review.file_name(), Err(InvalidId::Unsafe(_))));

        review.id = "..".into();
        assert!(matches!(review.file_name(), Err(InvalidId::Unsafe(_))));
    }

    #[test]
    fn repeated_columns_keep_last_occurrence() {
        let headers = csv::StringRecord::from(vec!["Id", "Text", "Score", "Text"]);
        let deduped = dedupe_headers(&headers);

        assert_eq!(deduped, csv::StringRecord::from(vec!["Id", "", "Score", "Text"]));

        let unique = csv::StringRecord::from(vec!["Id", "Text"]);
        assert_eq!(dedupe_headers(&unique), unique);
    }

    #[test]
    fn reports_missing_header_fields() {
        let headers = ["Id", "ProductId", "UserId", "Score", "Extra"];
        let missing = missing_fields(headers);

        assert!(missing.contains(&"Text"));
        assert!(missing.contains(&"ProfileName"));
        assert!(!missing.contains(&"Id"));
        assert_eq!(missing.len(), 6);
    }
}
