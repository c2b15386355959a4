use std::fmt;
use thiserror::Error as ThisError;
use crate::core::types::AttributeType;

#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error("malformed {attribute_type} value {raw:?}")]
    MalformedValue { attribute_type: AttributeType, raw: String },

    #[error("unknown attribute type {0:?}")]
    UnknownAttributeType(String),

    #[error("duplicate attribute name {0:?}")]
    DuplicateAttributeName(String),

    #[error("invalid attribute name {0:?}: names must be non-empty and must not contain ','")]
    InvalidAttributeName(String),

    #[error("schema declares {expected} attributes but {actual} fields were supplied")]
    SchemaArityMismatch { expected: usize, actual: usize },

    #[error("field {position} has type {actual}, schema expects {expected}")]
    FieldTypeMismatch {
        position: usize,
        expected: AttributeType,
        actual: AttributeType,
    },

    #[error("missing field {0:?}")]
    MissingField(String),

    #[error("matching_fields must name at least one field")]
    EmptyFieldList,

    #[error("invalid matching field name {0:?}")]
    InvalidFieldName(String),

    #[error("keywords must be set and non-empty")]
    MissingKeywords,

    #[error("unrecognized matching type {0:?}")]
    InvalidMatchingType(Option<String>),

    #[error("regex must be set and non-empty")]
    MissingRegex,

    #[error("invalid regex {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn storage(reason: impl fmt::Display) -> Self {
        Error::from(ErrorKind::Storage(reason.to_string()))
    }

    /// Prefix additional location info, keeping any context already attached.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if self.context.is_empty() {
            context
        } else {
            format!("{}: {}", context, self.context)
        };
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} ({})", self.kind, self.context)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            context: String::new(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::MalformedRecord(err.to_string()))
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::storage(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::new(ErrorKind::MissingField("authors".into()), "line 3".into());
        assert_eq!(err.to_string(), "missing field \"authors\" (line 3)");

        let bare = Error::from(ErrorKind::EmptyFieldList);
        assert_eq!(bare.to_string(), "matching_fields must name at least one field");
    }

    #[test]
    fn context_stacks_outermost_first() {
        let err = Error::new(ErrorKind::MissingKeywords, "keywords".into())
            .with_context("operator op1");
        assert_eq!(err.context, "operator op1: keywords");
    }

    #[test]
    fn type_mismatch_message() {
        let err = Error::from(ErrorKind::FieldTypeMismatch {
            position: 2,
            expected: AttributeType::Integer,
            actual: AttributeType::Text,
        });
        assert_eq!(err.to_string(), "field 2 has type TEXT, schema expects INTEGER");
    }
}
