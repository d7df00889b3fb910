use serde_json::Value;

use crate::error::{QuizError, Result};

/// Question type used when the source record omits `type`.
pub const DEFAULT_QUESTION_TYPE: &str = "text";

/// One question as it appears in the input file. Transient: has no identity
/// until inserted into the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Top-level category, trimmed. Empty when the source omitted it.
    pub theme: String,
    /// Sub-category under the theme, trimmed. May be empty.
    pub subtheme: String,
    pub question: String,
    pub question_type: String,
    pub answer: String,
}

impl QuestionRecord {
    /// Build a record from one element of the input array, validating field
    /// types strictly. Absent fields become empty strings; an absent `type`
    /// becomes [`DEFAULT_QUESTION_TYPE`]. A present field that is not a JSON
    /// string fails with an error naming the record index and the field.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| QuizError::record(index, "expected a JSON object"))?;

        let theme = string_field(index, object, "theme")?.trim().to_owned();
        let subtheme = string_field(index, object, "subtheme")?.trim().to_owned();
        let question = string_field(index, object, "question")?;
        let answer = string_field(index, object, "answer")?;
        let question_type = match object.get("type") {
            None => DEFAULT_QUESTION_TYPE.to_owned(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(QuizError::record_field(
                    index,
                    "type",
                    format!("expected a string, got {}", json_type_name(other)),
                ))
            }
        };

        Ok(Self {
            theme,
            subtheme,
            question,
            question_type,
            answer,
        })
    }

    /// Whether this record can be linked to a subtheme row at all. Records
    /// with an empty theme or subtheme are inserted without a link.
    pub fn has_taxonomy(&self) -> bool {
        !self.theme.is_empty() && !self.subtheme.is_empty()
    }
}

fn string_field(
    index: usize,
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String> {
    match object.get(field) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(QuizError::record_field(
            index,
            field,
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
