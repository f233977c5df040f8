//! Typed access to JSON objects with the same error reporting as the XML
//! attribute helpers.
//!
//! `null` is treated the same as an absent key.

use std::io::Read;

use serde_json::{Map as JsonMap, Value};
use tiledmap_core::literal::parse_literal;
use tiledmap_core::model::Color;
use tiledmap_core::properties::json::read_properties;
use tiledmap_core::{CustomTypes, Error, Literal, Properties, Result};

pub(crate) fn parse_str(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| Error::malformed(e.to_string()))
}

pub(crate) fn parse_reader<R: Read>(reader: R) -> Result<Value> {
    serde_json::from_reader(reader).map_err(|e| Error::malformed(e.to_string()))
}

/// A JSON object together with the entity name used in errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JsonObject<'a> {
    pub(crate) element: &'static str,
    fields: &'a JsonMap<String, Value>,
}

impl<'a> JsonObject<'a> {
    pub(crate) fn new(element: &'static str, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { element, fields }),
            _ => Err(Error::malformed(format!(
                "'{element}' must be a JSON object"
            ))),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    fn invalid(&self, key: &str, value: &Value) -> Error {
        Error::format(format!("'{key}' on '{}'", self.element), value.to_string())
    }

    /// Fail unless the `type` tag is absent or equal to `expected`.
    pub(crate) fn expect_type(&self, expected: &str) -> Result<()> {
        match self.str("type")? {
            Some(found) if found != expected => Err(Error::malformed(format!(
                "expected a '{expected}' document, found '{found}'"
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(key, other)),
        }
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<&'a str> {
        self.str(key)?
            .ok_or_else(|| Error::missing(self.element, key))
    }

    /// A string where the empty string means "not set".
    pub(crate) fn non_empty(&self, key: &str) -> Result<Option<&'a str>> {
        Ok(self.str(key)?.filter(|s| !s.is_empty()))
    }

    pub(crate) fn string(&self, key: &str) -> Result<String> {
        Ok(self.str(key)?.unwrap_or_default().to_string())
    }

    /// Version fields were written as numbers by old Tiled releases.
    pub(crate) fn version(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.invalid(key, other)),
        }
    }

    pub(crate) fn int<T: TryFrom<i64>>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .as_i64()
            .and_then(|v| T::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(key, value))
    }

    pub(crate) fn required_int<T: TryFrom<i64>>(&self, key: &str) -> Result<T> {
        self.int(key)?
            .ok_or_else(|| Error::missing(self.element, key))
    }

    pub(crate) fn float(&self, key: &str) -> Result<Option<f32>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .as_f64()
            .map(|v| Some(v as f32))
            .ok_or_else(|| self.invalid(key, value))
    }

    pub(crate) fn bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .as_bool()
            .map(Some)
            .ok_or_else(|| self.invalid(key, value))
    }

    /// Closed enumeration; an empty string counts as absent.
    pub(crate) fn literal<T: Literal>(&self, key: &str) -> Result<Option<T>> {
        self.non_empty(key)?
            .map(|value| parse_literal(key, value))
            .transpose()
    }

    pub(crate) fn required_literal<T: Literal>(&self, key: &str) -> Result<T> {
        self.literal(key)?
            .ok_or_else(|| Error::missing(self.element, key))
    }

    pub(crate) fn color(&self, key: &str) -> Result<Option<Color>> {
        self.non_empty(key)?.map(str::parse).transpose()
    }

    pub(crate) fn object(&self, key: &str, element: &'static str) -> Result<Option<Self>> {
        self.get(key)
            .map(|value| JsonObject::new(element, value))
            .transpose()
    }

    pub(crate) fn array(&self, key: &str) -> Result<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.invalid(key, other)),
        }
    }

    /// Every entry of the array under `key`, each of which must be an object.
    pub(crate) fn objects(&self, key: &str, element: &'static str) -> Result<Vec<Self>> {
        self.array(key)?
            .iter()
            .map(|value| JsonObject::new(element, value))
            .collect()
    }

    pub(crate) fn properties(&self, types: &CustomTypes) -> Result<Properties> {
        match self.get("properties") {
            Some(value) => read_properties(types, value),
            None => Ok(Properties::new()),
        }
    }
}
