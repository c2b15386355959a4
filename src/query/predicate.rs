use serde::{Serialize, Deserialize};
use crate::core::error::Result;
use crate::query::descriptor::OperatorDescriptor;
use crate::query::planner;

/// Extraction predicates understood by the operator planner.
///
/// Two predicates of different variants are never equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtractPredicate {
    #[serde(rename = "KEYWORDEXTRACT")]
    Keyword(KeywordExtractPredicate),
    #[serde(rename = "REGEXEXTRACT")]
    Regex(RegexExtractPredicate),
}

impl ExtractPredicate {
    /// Compile into an operator descriptor with the given id
    pub fn compile(&self, operator_id: &str) -> Result<OperatorDescriptor> {
        planner::compile(self, operator_id)
    }
}

impl From<KeywordExtractPredicate> for ExtractPredicate {
    fn from(p: KeywordExtractPredicate) -> Self {
        ExtractPredicate::Keyword(p)
    }
}

impl From<RegexExtractPredicate> for ExtractPredicate {
    fn from(p: RegexExtractPredicate) -> Self {
        ExtractPredicate::Regex(p)
    }
}

/// `KEYWORDEXTRACT(...)`: search `keywords` in `matching_fields`.
///
/// Every field may be left unset while a query is being assembled; unset is
/// distinct from an explicit empty value. Nothing is validated until compile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordExtractPredicate {
    matching_fields: Option<Vec<String>>,
    keywords: Option<String>,
    matching_type: Option<String>,
}

impl KeywordExtractPredicate {
    pub fn new<I, S>(matching_fields: I, keywords: impl Into<String>, matching_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordExtractPredicate {
            matching_fields: Some(matching_fields.into_iter().map(Into::into).collect()),
            keywords: Some(keywords.into()),
            matching_type: Some(matching_type.into()),
        }
    }

    /// All parameters unset
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn matching_fields(&self) -> Option<&[String]> {
        self.matching_fields.as_deref()
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn matching_type(&self) -> Option<&str> {
        self.matching_type.as_deref()
    }

    pub fn set_matching_fields(&mut self, fields: Vec<String>) {
        self.matching_fields = Some(fields);
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.keywords = Some(keywords.into());
    }

    pub fn set_matching_type(&mut self, matching_type: impl Into<String>) {
        self.matching_type = Some(matching_type.into());
    }

    pub fn with_matching_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matching_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.set_keywords(keywords);
        self
    }

    pub fn with_matching_type(mut self, matching_type: impl Into<String>) -> Self {
        self.set_matching_type(matching_type);
        self
    }

    pub fn compile(&self, operator_id: &str) -> Result<OperatorDescriptor> {
        planner::compile_keyword(self, operator_id)
    }
}

/// `REGEXEXTRACT(...)`: match `regex` against `matching_fields`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegexExtractPredicate {
    matching_fields: Option<Vec<String>>,
    regex: Option<String>,
}

impl RegexExtractPredicate {
    pub fn new<I, S>(matching_fields: I, regex: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RegexExtractPredicate {
            matching_fields: Some(matching_fields.into_iter().map(Into::into).collect()),
            regex: Some(regex.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn matching_fields(&self) -> Option<&[String]> {
        self.matching_fields.as_deref()
    }

    pub fn regex(&self) -> Option<&str> {
        self.regex.as_deref()
    }

    pub fn set_matching_fields(&mut self, fields: Vec<String>) {
        self.matching_fields = Some(fields);
    }

    pub fn set_regex(&mut self, regex: impl Into<String>) {
        self.regex = Some(regex.into());
    }

    pub fn compile(&self, operator_id: &str) -> Result<OperatorDescriptor> {
        planner::compile_regex(self, operator_id)
    }
}
