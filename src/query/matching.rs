use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};

/// How keyword search terms are matched against field content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordMatchingType {
    Conjunction,  // Every keyword token appears, any order
    Phrase,       // Keyword tokens appear as a contiguous phrase
    Substring,    // Keywords appear as a raw substring
}

impl KeywordMatchingType {
    pub const ALL: [KeywordMatchingType; 3] = [
        KeywordMatchingType::Conjunction,
        KeywordMatchingType::Phrase,
        KeywordMatchingType::Substring,
    ];

    /// Selector understood by the execution engine
    pub fn engine_name(&self) -> &'static str {
        match self {
            KeywordMatchingType::Conjunction => "CONJUNCTION_INDEXBASED",
            KeywordMatchingType::Phrase => "PHRASE_INDEXBASED",
            KeywordMatchingType::Substring => "SUBSTRING_SCANBASED",
        }
    }

    /// Selector written in query text
    pub fn query_name(&self) -> &'static str {
        match self {
            KeywordMatchingType::Conjunction => "CONJUNCTION_INDICATOR",
            KeywordMatchingType::Phrase => "PHRASE_INDICATOR",
            KeywordMatchingType::Substring => "SUBSTRING_INDICATOR",
        }
    }

    /// Resolve either selector spelling. Matching is exact and case-sensitive.
    pub fn from_selector(selector: &str) -> Option<Self> {
        KeywordMatchingType::ALL
            .into_iter()
            .find(|t| t.engine_name() == selector || t.query_name() == selector)
    }
}

impl fmt::Display for KeywordMatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_name())
    }
}

impl FromStr for KeywordMatchingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KeywordMatchingType::from_selector(s)
            .ok_or_else(|| ErrorKind::InvalidMatchingType(Some(s.to_string())).into())
    }
}
