use std::collections::HashMap;
use std::sync::Arc;
use crate::core::error::{ErrorKind, Result};
use crate::core::types::{self, Field};
use crate::schema::schema::Schema;

/// One schema-conformant record.
///
/// Always holds exactly one field per schema attribute, each matching the
/// attribute's type at the same position. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    schema: Arc<Schema>,
    fields: Vec<Field>,
}

impl Tuple {
    pub fn new(schema: Arc<Schema>, fields: Vec<Field>) -> Result<Self> {
        if fields.len() != schema.attribute_count() {
            return Err(ErrorKind::SchemaArityMismatch {
                expected: schema.attribute_count(),
                actual: fields.len(),
            }.into());
        }

        for (position, (attr, field)) in schema.iter().zip(&fields).enumerate() {
            if field.attribute_type() != attr.attribute_type() {
                return Err(ErrorKind::FieldTypeMismatch {
                    position,
                    expected: attr.attribute_type(),
                    actual: field.attribute_type(),
                }.into());
            }
        }

        Ok(Tuple { schema, fields })
    }

    /// Build a tuple from raw values keyed by attribute name.
    ///
    /// Names not declared by the schema are ignored.
    pub fn from_record(schema: &Arc<Schema>, record: &HashMap<String, String>) -> Result<Self> {
        let mut fields = Vec::with_capacity(schema.attribute_count());

        for attr in schema.iter() {
            let raw = record.get(attr.name())
                .ok_or_else(|| ErrorKind::MissingField(attr.name().to_string()))?;
            fields.push(types::parse(attr.attribute_type(), raw)?);
        }

        Ok(Tuple {
            schema: Arc::clone(schema),
            fields,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, position: usize) -> Option<&Field> {
        self.fields.get(position)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.schema.index_of(name).map(|i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Give up the field storage, e.g. to serialize without the schema
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}
