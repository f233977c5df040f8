//! Property reading from JSON, shared by the JSON reader and the project
//! file loader.
//!
//! JSON class values are plain objects, so member types come from the class
//! definition's defaults rather than from the value itself.

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::literal::parse_literal;
use crate::properties::{CustomTypes, Properties, PropertyKind, PropertyValue, RawValue};

/// Read a `properties` array of `{name, type, propertytype, value}` entries.
///
/// A later entry with the same name replaces an earlier one.
pub fn read_properties(types: &CustomTypes, value: &Value) -> Result<Properties> {
    let Value::Array(entries) = value else {
        return Err(Error::malformed("'properties' must be an array"));
    };
    let mut properties = Properties::with_capacity(entries.len());
    for entry in entries {
        let (name, value) = read_property(types, entry)?;
        properties.insert(name, value);
    }
    Ok(properties)
}

/// Read one property entry.
pub fn read_property(types: &CustomTypes, entry: &Value) -> Result<(String, PropertyValue)> {
    let Value::Object(fields) = entry else {
        return Err(Error::malformed("property entries must be objects"));
    };
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::missing("property", "name"))?;
    let kind = match fields.get("type").and_then(Value::as_str) {
        Some(tag) => parse_literal::<PropertyKind>("type", tag)?,
        None => PropertyKind::String,
    };
    let property_type = fields.get("propertytype").and_then(Value::as_str);
    let raw = fields.get("value").unwrap_or(&Value::Null);

    let value = match kind {
        PropertyKind::Class => read_class_value(types, name, property_type.unwrap_or(""), raw)?,
        _ => {
            let raw = if raw.is_null() {
                RawValue::Text(kind.empty_value())
            } else {
                RawValue::Json(raw)
            };
            types.parse_value(name, kind, property_type, raw)?
        }
    };
    Ok((name.to_string(), value))
}

/// Resolve a JSON object of member overrides against `class_name`.
pub fn read_class_value(
    types: &CustomTypes,
    name: &str,
    class_name: &str,
    value: &Value,
) -> Result<PropertyValue> {
    let overrides = read_class_overrides(types, name, class_name, value)?;
    types.class_value(class_name, overrides)
}

/// Parse the members present in `value`, typed by the class definition.
///
/// No defaults are filled in; nested class members hold only the overrides
/// written in the document.
pub fn read_class_overrides(
    types: &CustomTypes,
    name: &str,
    class_name: &str,
    value: &Value,
) -> Result<Properties> {
    let members = match value {
        Value::Object(members) => members,
        Value::Null => return Ok(Properties::new()),
        Value::String(s) if s.is_empty() => return Ok(Properties::new()),
        other => {
            return Err(Error::InvalidPropertyValue {
                name: name.to_string(),
                expected: format!("class '{class_name}'"),
                value: other.to_string(),
            });
        }
    };

    let Some(class) = types.class(class_name) else {
        if !class_name.is_empty() {
            warn!(
                property = name,
                class = class_name,
                "property references an unknown custom class, inferring member types"
            );
        }
        return Ok(members
            .iter()
            .map(|(key, raw)| (key.clone(), infer(raw)))
            .collect());
    };

    let mut overrides = Properties::with_capacity(members.len());
    for (key, raw) in members {
        let member = class
            .member(key)
            .ok_or_else(|| Error::UnknownCustomClassMember {
                class: class_name.to_string(),
                member: key.clone(),
            })?;
        let value = match &member.value {
            PropertyValue::Class { property_type, .. } => PropertyValue::Class {
                property_type: property_type.clone(),
                properties: read_class_overrides(types, key, property_type, raw)?,
            },
            PropertyValue::Enum { property_type, .. } => match types.enum_def(property_type) {
                Some(enum_def) => enum_def.parse(key, RawValue::Json(raw))?,
                None => infer(raw),
            },
            default => {
                PropertyValue::parse_primitive(key, primitive_kind(default), RawValue::Json(raw))?
            }
        };
        overrides.insert(key.clone(), value);
    }
    Ok(overrides)
}

fn primitive_kind(value: &PropertyValue) -> PropertyKind {
    match value {
        PropertyValue::Int(_) => PropertyKind::Int,
        PropertyValue::Float(_) => PropertyKind::Float,
        PropertyValue::Bool(_) => PropertyKind::Bool,
        PropertyValue::Color(_) => PropertyKind::Color,
        PropertyValue::File(_) => PropertyKind::File,
        PropertyValue::Object(_) => PropertyKind::Object,
        PropertyValue::Class { .. } => PropertyKind::Class,
        PropertyValue::String(_) | PropertyValue::Enum { .. } => PropertyKind::String,
    }
}

/// Best-effort typing for members of classes missing from the catalog.
fn infer(value: &Value) -> PropertyValue {
    match value {
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(int) => PropertyValue::Int(int),
            None => PropertyValue::Float(n.as_f64().unwrap_or_default() as f32),
        },
        Value::String(s) => PropertyValue::String(s.clone()),
        Value::Object(members) => PropertyValue::Class {
            property_type: String::new(),
            properties: members
                .iter()
                .map(|(key, raw)| (key.clone(), infer(raw)))
                .collect(),
        },
        Value::Null | Value::Array(_) => PropertyValue::String(value.to_string()),
    }
}
