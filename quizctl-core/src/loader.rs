//! Input file loading: a JSON array of question objects, validated strictly.
//!
//! There is no tolerance for non-JSON prefixes or alternative formats: the
//! file must parse as a single top-level array, and every element must pass
//! [`QuestionRecord::from_value`]. Validation failures name the record index
//! and the offending field so a bad export can be fixed at the source.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::record::QuestionRecord;

/// Read and validate a question file, preserving input order.
///
/// No side effects other than reading the file; on any error, nothing has
/// been consumed downstream.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(QuizError::empty_file(path));
    }

    let value: Value = serde_json::from_str(&content)
        .map_err(|source| QuizError::json(path.display().to_string(), source))?;
    let elements = value.as_array().ok_or_else(|| {
        QuizError::invalid_format(path, "expected a top-level JSON array of question objects")
    })?;

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        records.push(QuestionRecord::from_value(index, element)?);
    }

    debug!(count = records.len(), "loaded question records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_records_in_input_order() {
        let file = write_file(
            r#"[
                {"theme": "Science", "subtheme": "Physics", "question": "Q1", "answer": "A1"},
                {"theme": "History", "question": "Q2", "type": "mcq", "answer": "A2"}
            ]"#,
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "Q1");
        assert_eq!(records[1].theme, "History");
        assert_eq!(records[1].question_type, "mcq");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_records("/nonexistent/questions.json").unwrap_err();
        assert!(matches!(err, QuizError::Io { .. }));
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_file("   \n");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, QuizError::EmptyFile { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let file = write_file(r#"[{"theme": "Science",]"#);
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, QuizError::Json { .. }));
    }

    #[test]
    fn comment_prefix_is_not_tolerated() {
        // A leading comment line makes the whole file invalid JSON.
        let file = write_file("// filepath: questions.json\n[{\"theme\": \"Science\"}]");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, QuizError::Json { .. }));
    }

    #[test]
    fn non_array_top_level_is_rejected() {
        let file = write_file(r#"{"theme": "Science"}"#);
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, QuizError::InvalidFormat { .. }));
    }

    #[test]
    fn bad_field_reports_record_index() {
        let file = write_file(r#"[{"theme": "Science"}, {"answer": false}]"#);
        let err = load_records(file.path()).unwrap_err();
        match err {
            QuizError::RecordField { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "answer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
