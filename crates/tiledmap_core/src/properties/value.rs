use serde_json::Value;

use crate::error::{Error, Result};
use crate::literal::literal_enum;
use crate::model::Color;
use crate::properties::Properties;

literal_enum! {
    /// The built-in `type` tag of a property entry.
    #[derive(Default)]
    pub enum PropertyKind {
        #[default]
        String => "string",
        Int => "int",
        Float => "float",
        Bool => "bool",
        Color => "color",
        File => "file",
        Object => "object",
        Class => "class",
    }
}

impl PropertyKind {
    /// Wire text standing in for a property written without a value.
    pub fn empty_value(self) -> &'static str {
        match self {
            PropertyKind::Int | PropertyKind::Object => "0",
            PropertyKind::Float => "0.0",
            PropertyKind::Bool => "false",
            PropertyKind::String | PropertyKind::Color | PropertyKind::File | PropertyKind::Class => {
                ""
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    /// `None` when the color was left empty.
    Color(Option<Color>),
    File(String),
    /// Id of another object; 0 means none.
    Object(u32),
    Enum {
        property_type: String,
        /// Selected names, in definition order.
        values: Vec<String>,
    },
    Class {
        property_type: String,
        properties: Properties,
    },
}

/// A raw property value as it appears on the wire.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    /// XML attribute or element text.
    Text(&'a str),
    Json(&'a Value),
}

impl RawValue<'_> {
    /// Text used in error messages.
    pub fn describe(&self) -> String {
        match self {
            RawValue::Text(text) => (*text).to_string(),
            RawValue::Json(value) => value.to_string(),
        }
    }
}

impl PropertyValue {
    /// Parse a primitive value of `kind` from its wire form.
    ///
    /// `PropertyKind::Class` is not primitive and is rejected here.
    pub fn parse_primitive(name: &str, kind: PropertyKind, raw: RawValue<'_>) -> Result<Self> {
        let invalid = || Error::InvalidPropertyValue {
            name: name.to_string(),
            expected: kind.to_string(),
            value: raw.describe(),
        };

        let value = match (kind, raw) {
            (PropertyKind::String, RawValue::Text(text)) => PropertyValue::String(text.to_string()),
            (PropertyKind::File, RawValue::Text(text)) => PropertyValue::File(text.to_string()),
            (PropertyKind::String, RawValue::Json(Value::String(s))) => {
                PropertyValue::String(s.clone())
            }
            (PropertyKind::File, RawValue::Json(Value::String(s))) => PropertyValue::File(s.clone()),

            (PropertyKind::Int, RawValue::Text(text)) => {
                PropertyValue::Int(text.trim().parse().map_err(|_| invalid())?)
            }
            (PropertyKind::Int, RawValue::Json(value)) => PropertyValue::Int(
                value
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(invalid)?,
            ),

            (PropertyKind::Float, RawValue::Text(text)) => {
                PropertyValue::Float(text.trim().parse().map_err(|_| invalid())?)
            }
            (PropertyKind::Float, RawValue::Json(value)) => {
                PropertyValue::Float(value.as_f64().ok_or_else(invalid)? as f32)
            }

            (PropertyKind::Bool, RawValue::Text(text)) => PropertyValue::Bool(match text.trim() {
                "true" => true,
                "false" => false,
                _ => return Err(invalid()),
            }),
            (PropertyKind::Bool, RawValue::Json(value)) => {
                PropertyValue::Bool(value.as_bool().ok_or_else(invalid)?)
            }

            (PropertyKind::Color, RawValue::Text(text)) => parse_color(text).ok_or_else(invalid)?,
            (PropertyKind::Color, RawValue::Json(Value::String(s))) => {
                parse_color(s).ok_or_else(invalid)?
            }

            (PropertyKind::Object, RawValue::Text(text)) => {
                PropertyValue::Object(text.trim().parse().map_err(|_| invalid())?)
            }
            (PropertyKind::Object, RawValue::Json(value)) => PropertyValue::Object(
                value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(invalid)?,
            ),

            _ => return Err(invalid()),
        };
        Ok(value)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Members of a class value.
    pub fn as_class(&self) -> Option<&Properties> {
        match self {
            PropertyValue::Class { properties, .. } => Some(properties),
            _ => None,
        }
    }
}

fn parse_color(text: &str) -> Option<PropertyValue> {
    let text = text.trim();
    if text.is_empty() {
        return Some(PropertyValue::Color(None));
    }
    Color::parse(text).map(|color| PropertyValue::Color(Some(color)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_text_primitives() {
        let parse = |kind, text| PropertyValue::parse_primitive("p", kind, RawValue::Text(text));
        assert_eq!(
            parse(PropertyKind::Int, "-4").unwrap(),
            PropertyValue::Int(-4)
        );
        assert_eq!(
            parse(PropertyKind::Float, "0.5").unwrap(),
            PropertyValue::Float(0.5)
        );
        assert_eq!(
            parse(PropertyKind::Bool, "true").unwrap(),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            parse(PropertyKind::Object, "12").unwrap(),
            PropertyValue::Object(12)
        );
        assert_eq!(
            parse(PropertyKind::Color, "#ff112233").unwrap(),
            PropertyValue::Color(Some(Color::rgba(0x11, 0x22, 0x33, 0xff)))
        );
        assert_eq!(
            parse(PropertyKind::Color, "").unwrap(),
            PropertyValue::Color(None)
        );
    }

    #[test]
    fn test_parse_json_primitives() {
        let parse = |kind, value: &Value| {
            PropertyValue::parse_primitive("p", kind, RawValue::Json(value))
        };
        assert_eq!(
            parse(PropertyKind::Int, &json!(42)).unwrap(),
            PropertyValue::Int(42)
        );
        assert_eq!(
            parse(PropertyKind::Float, &json!(3)).unwrap(),
            PropertyValue::Float(3.0)
        );
        assert_eq!(
            parse(PropertyKind::File, &json!("a.png")).unwrap(),
            PropertyValue::File("a.png".to_string())
        );
    }

    #[test]
    fn test_invalid_value_names_property_and_type() {
        let err = PropertyValue::parse_primitive("speed", PropertyKind::Int, RawValue::Text("fast"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyValue { ref name, ref expected, ref value }
            if name == "speed" && expected == "int" && value == "fast"));

        let err = PropertyValue::parse_primitive("on", PropertyKind::Bool, RawValue::Text("1"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyValue { .. }));
    }

    #[test]
    fn test_class_is_not_primitive() {
        let err = PropertyValue::parse_primitive("c", PropertyKind::Class, RawValue::Text(""))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyValue { .. }));
    }
}
