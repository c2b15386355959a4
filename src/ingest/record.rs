use std::collections::HashMap;
use std::sync::Arc;
use serde_json::Value;
use crate::core::error::{ErrorKind, Result};
use crate::schema::schema::Schema;
use crate::tuple::tuple::Tuple;

/// Raw values of one external record, keyed by attribute name
pub type RawRecord = HashMap<String, String>;

/// Parse one line of JSON into a raw record.
///
/// Strings are taken verbatim, numbers and booleans as their JSON text,
/// arrays and objects as compact JSON. `null` counts as absent.
pub fn parse_json_record(line: &str) -> Result<RawRecord> {
    let value: Value = serde_json::from_str(line)?;
    let Value::Object(map) = value else {
        return Err(ErrorKind::MalformedRecord("expected a JSON object".to_string()).into());
    };

    let mut record = HashMap::with_capacity(map.len());
    for (name, value) in map {
        let raw = match value {
            Value::Null => continue,
            Value::String(s) => s,
            other => other.to_string(),
        };
        record.insert(name, raw);
    }
    Ok(record)
}

impl Tuple {
    /// Build a tuple from one JSON object line
    pub fn from_json_line(schema: &Arc<Schema>, line: &str) -> Result<Tuple> {
        Tuple::from_record(schema, &parse_json_record(line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AttributeType, Field};
    use crate::schema::schema::Attribute;

    #[test]
    fn converts_json_values_to_raw_text() {
        let record = parse_json_record(
            r#"{"s":"text","i":123,"d":1.5,"b":true,"a":["x","y"],"n":null}"#
        ).unwrap();

        assert_eq!(record["s"], "text");
        assert_eq!(record["i"], "123");
        assert_eq!(record["d"], "1.5");
        assert_eq!(record["b"], "true");
        assert_eq!(record["a"], r#"["x","y"]"#);
        assert!(!record.contains_key("n"));
    }

    #[test]
    fn rejects_non_objects() {
        for line in ["[1,2]", "\"x\"", "{not json"] {
            let err = parse_json_record(line).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::MalformedRecord(_)), "{}", line);
        }
    }

    #[test]
    fn missing_declared_attribute() {
        let schema = Arc::new(Schema::new(vec![
            Attribute::new("pmid", AttributeType::Integer),
            Attribute::new("abstract", AttributeType::Text),
            Attribute::new("authors", AttributeType::Text),
        ]).unwrap());

        let err = Tuple::from_json_line(&schema, r#"{"pmid":"123","abstract":"text"}"#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingField(ref n) if n == "authors"));
    }

    #[test]
    fn quoted_numbers_parse() {
        let schema = Arc::new(Schema::new(vec![
            Attribute::new("pmid", AttributeType::Integer),
            Attribute::new("abstract", AttributeType::Text),
        ]).unwrap());

        let tuple = Tuple::from_json_line(&schema, r#"{"pmid":"123","abstract":"text","extra":1}"#).unwrap();
        assert_eq!(tuple.fields(), &[Field::Integer(123), Field::Text("text".into())]);
    }
}
