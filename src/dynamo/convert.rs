//! Conversion between JSON mappings and DynamoDB attribute maps.

use crate::candidate::Mapping;
use crate::dynamo::error::TableError;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(item_from_mapping(map)),
    }
}

pub fn attribute_to_value(attribute: &AttributeValue) -> Result<Value, TableError> {
    let value = match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => parse_number(n)?,
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(mapping_from_item(map)?),
        other => {
            return Err(TableError::ConversionError(format!(
                "unsupported attribute type: {:?}",
                other
            )))
        }
    };

    Ok(value)
}

fn parse_number(n: &str) -> Result<Value, TableError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::from(i));
    }

    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| TableError::ConversionError(format!("invalid number attribute '{}'", n)))
}

pub fn item_from_mapping(mapping: &Mapping) -> Item {
    mapping
        .iter()
        .map(|(k, v)| (k.clone(), value_to_attribute(v)))
        .collect()
}

pub fn mapping_from_item(item: &Item) -> Result<Mapping, TableError> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), attribute_to_value(v)?)))
        .collect()
}
