use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

/// Raw text format accepted for DATE values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supported attribute types.
///
/// TEXT and STRING parse identically; a downstream index tokenizes TEXT and
/// keeps STRING as a single exact term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    Integer,
    Text,
    String,
    Double,
    Date,
}

impl AttributeType {
    pub const ALL: [AttributeType; 5] = [
        AttributeType::Integer,
        AttributeType::Text,
        AttributeType::String,
        AttributeType::Double,
        AttributeType::Date,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Integer => "INTEGER",
            AttributeType::Text => "TEXT",
            AttributeType::String => "STRING",
            AttributeType::Double => "DOUBLE",
            AttributeType::Date => "DATE",
        }
    }

    /// Parse raw text into a field of this type
    pub fn parse(&self, raw: &str) -> Result<Field> {
        parse(*self, raw)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AttributeType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::from(ErrorKind::UnknownAttributeType(s.to_string())))
    }
}

/// A typed value, one variant per attribute type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Integer(i32),
    Text(String),
    String(String),
    Double(f64),
    Date(NaiveDate),
}

impl Field {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Field::Integer(_) => AttributeType::Integer,
            Field::Text(_) => AttributeType::Text,
            Field::String(_) => AttributeType::String,
            Field::Double(_) => AttributeType::Double,
            Field::Date(_) => AttributeType::Date,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Text(s) | Field::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Field::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Field::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Writes the raw text form accepted by [`parse`]
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Integer(v) => write!(f, "{}", v),
            Field::Text(s) | Field::String(s) => f.write_str(s),
            Field::Double(v) => write!(f, "{}", v),
            Field::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

/// Parse a raw value according to its attribute type.
///
/// Numeric and date types fail on anything that is not a well-formed literal
/// for that type. Surrounding whitespace is not trimmed.
pub fn parse(attribute_type: AttributeType, raw: &str) -> Result<Field> {
    let malformed = || Error::from(ErrorKind::MalformedValue {
        attribute_type,
        raw: raw.to_string(),
    });

    match attribute_type {
        AttributeType::Integer => raw.parse::<i32>()
            .map(Field::Integer)
            .map_err(|_| malformed()),
        AttributeType::Double => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Field::Double(v)),
            _ => Err(malformed()),
        },
        AttributeType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Field::Date)
            .map_err(|_| malformed()),
        AttributeType::Text => Ok(Field::Text(raw.to_string())),
        AttributeType::String => Ok(Field::String(raw.to_string())),
    }
}
