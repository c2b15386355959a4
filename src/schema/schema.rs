use std::collections::HashMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::AttributeType;

/// Named, typed column definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    #[serde(rename = "type")]
    attribute_type: AttributeType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Attribute {
            name: name.into(),
            attribute_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.attribute_type)
    }
}

/// Ordered set of attributes with unique names.
///
/// Attribute order fixes the position of each field in a [`Tuple`](crate::tuple::tuple::Tuple).
/// Names may not contain `,` since operator descriptors join field lists with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Attribute>", into = "Vec<Attribute>")]
pub struct Schema {
    attributes: Vec<Attribute>,
    positions: HashMap<String, usize>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(attributes.len());

        for (i, attr) in attributes.iter().enumerate() {
            if attr.name.is_empty() || attr.name.contains(',') {
                return Err(ErrorKind::InvalidAttributeName(attr.name.clone()).into());
            }
            if positions.insert(attr.name.clone(), i).is_some() {
                return Err(Error::new(
                    ErrorKind::DuplicateAttributeName(attr.name.clone()),
                    format!("position {}", i),
                ));
            }
        }

        Ok(Schema { attributes, positions })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, position: usize) -> Option<&Attribute> {
        self.attributes.get(position)
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.index_of(name).map(|i| &self.attributes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl TryFrom<Vec<Attribute>> for Schema {
    type Error = Error;

    fn try_from(attributes: Vec<Attribute>) -> Result<Self> {
        Schema::new(attributes)
    }
}

impl From<Schema> for Vec<Attribute> {
    fn from(schema: Schema) -> Self {
        schema.attributes
    }
}
