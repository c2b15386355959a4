use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::core::error::Result;

/// Operator type names understood by the execution engine
pub mod operator_types {
    pub const KEYWORD_MATCHER: &str = "KeywordMatcher";
    pub const REGEX_MATCHER: &str = "RegexMatcher";
}

/// Property keys per operator type. Part of the wire contract.
pub mod keys {
    pub const MATCHING_FIELDS: &str = "matchingFields";
    pub const KEYWORDS: &str = "keywords";
    pub const MATCHING_TYPE: &str = "matchingType";
    pub const REGEX: &str = "regex";
}

/// Separator used when a field list is flattened into one property
pub const FIELD_LIST_SEPARATOR: &str = ",";

/// Compiled, engine-facing form of a predicate.
///
/// Wire shape: `{"id": .., "operatorType": .., "properties": {..}}`, with
/// properties in sorted key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    id: String,
    operator_type: String,
    properties: BTreeMap<String, String>,
}

impl OperatorDescriptor {
    pub fn new(
        id: impl Into<String>,
        operator_type: impl Into<String>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        OperatorDescriptor {
            id: id.into(),
            operator_type: operator_type.into(),
            properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operator_type(&self) -> &str {
        &self.operator_type
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Split a flattened field-list property back into names
    pub fn field_list(&self, key: &str) -> Option<Vec<&str>> {
        self.property(key).map(|v| v.split(FIELD_LIST_SEPARATOR).collect())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
