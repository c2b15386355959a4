use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use regex::Regex;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::descriptor::{keys, operator_types, OperatorDescriptor, FIELD_LIST_SEPARATOR};
use crate::query::matching::KeywordMatchingType;
use crate::query::predicate::{ExtractPredicate, KeywordExtractPredicate, RegexExtractPredicate};

/// Compile a predicate into exactly one operator descriptor.
///
/// Pure: compiling the same predicate twice gives equal descriptors when
/// the ids are equal.
#[tracing::instrument(level = "debug", skip(predicate))]
pub fn compile(predicate: &ExtractPredicate, operator_id: &str) -> Result<OperatorDescriptor> {
    match predicate {
        ExtractPredicate::Keyword(p) => compile_keyword(p, operator_id),
        ExtractPredicate::Regex(p) => compile_regex(p, operator_id),
    }
}

pub fn compile_keyword(predicate: &KeywordExtractPredicate, operator_id: &str) -> Result<OperatorDescriptor> {
    let context = |field: &str| format!("operator {}: {}", operator_id, field);

    let matching_fields = join_fields(predicate.matching_fields())
        .map_err(|e| e.with_context(context("matchingFields")))?;

    let keywords = match predicate.keywords() {
        Some(k) if !k.is_empty() => k,
        _ => return Err(Error::new(ErrorKind::MissingKeywords, context("keywords"))),
    };

    let matching_type = predicate.matching_type()
        .filter(|t| KeywordMatchingType::from_selector(t).is_some())
        .ok_or_else(|| Error::new(
            ErrorKind::InvalidMatchingType(predicate.matching_type().map(String::from)),
            context("matchingType"),
        ))?;

    let properties = BTreeMap::from([
        (keys::MATCHING_FIELDS.to_string(), matching_fields),
        (keys::KEYWORDS.to_string(), keywords.to_string()),
        (keys::MATCHING_TYPE.to_string(), matching_type.to_string()),
    ]);

    Ok(OperatorDescriptor::new(operator_id, operator_types::KEYWORD_MATCHER, properties))
}

pub fn compile_regex(predicate: &RegexExtractPredicate, operator_id: &str) -> Result<OperatorDescriptor> {
    let context = |field: &str| format!("operator {}: {}", operator_id, field);

    let matching_fields = join_fields(predicate.matching_fields())
        .map_err(|e| e.with_context(context("matchingFields")))?;

    let pattern = match predicate.regex() {
        Some(r) if !r.is_empty() => r,
        _ => return Err(Error::new(ErrorKind::MissingRegex, context("regex"))),
    };

    if let Err(e) = Regex::new(pattern) {
        return Err(Error::new(
            ErrorKind::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            },
            context("regex"),
        ));
    }

    let properties = BTreeMap::from([
        (keys::MATCHING_FIELDS.to_string(), matching_fields),
        (keys::REGEX.to_string(), pattern.to_string()),
    ]);

    Ok(OperatorDescriptor::new(operator_id, operator_types::REGEX_MATCHER, properties))
}

/// Flatten a field list into one property value.
///
/// The separator is not escaped, so names that are empty or contain it are
/// rejected rather than silently producing an ambiguous list.
fn join_fields(fields: Option<&[String]>) -> Result<String> {
    let fields = match fields {
        Some(f) if !f.is_empty() => f,
        _ => return Err(ErrorKind::EmptyFieldList.into()),
    };

    if let Some(bad) = fields.iter().find(|f| f.is_empty() || f.contains(FIELD_LIST_SEPARATOR)) {
        return Err(ErrorKind::InvalidFieldName(bad.clone()).into());
    }

    Ok(fields.join(FIELD_LIST_SEPARATOR))
}

/// Assigns sequential operator ids (`{prefix}1`, `{prefix}2`, ...) while compiling
pub struct OperatorPlanner {
    prefix: String,
    next_id: AtomicUsize,
}

impl OperatorPlanner {
    pub fn new(prefix: impl Into<String>) -> Self {
        OperatorPlanner {
            prefix: prefix.into(),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn plan(&self, predicate: &ExtractPredicate) -> Result<OperatorDescriptor> {
        let id = format!("{}{}", self.prefix, self.next_id.fetch_add(1, Ordering::Relaxed));
        compile(predicate, &id)
    }

    /// Compile a list of predicates, stopping at the first failure
    pub fn plan_all(&self, predicates: &[ExtractPredicate]) -> Result<Vec<OperatorDescriptor>> {
        predicates.iter().map(|p| self.plan(p)).collect()
    }
}

impl Default for OperatorPlanner {
    fn default() -> Self {
        Self::new("op")
    }
}
