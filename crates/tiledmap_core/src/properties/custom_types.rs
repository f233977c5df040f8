use std::collections::HashMap;

use bitflags::bitflags;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::literal::literal_enum;
use crate::model::Color;
use crate::properties::{Properties, PropertyKind, PropertyValue, RawValue};

bitflags! {
    /// Contexts a custom class may be used in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CustomClassUseAs: u32 {
        const PROPERTY = 1;
        const MAP = 1 << 1;
        const LAYER = 1 << 2;
        const OBJECT = 1 << 3;
        const TILE = 1 << 4;
        const TILESET = 1 << 5;
        const WANG_COLOR = 1 << 6;
        const WANGSET = 1 << 7;
        const PROJECT = 1 << 8;
    }
}

impl CustomClassUseAs {
    /// Parse one entry of a project file's `useAs` list.
    pub fn from_literal(value: &str) -> Option<Self> {
        Some(match value {
            "property" => Self::PROPERTY,
            "map" => Self::MAP,
            "layer" => Self::LAYER,
            "object" => Self::OBJECT,
            "tile" => Self::TILE,
            "tileset" => Self::TILESET,
            "wangcolor" => Self::WANG_COLOR,
            "wangset" => Self::WANGSET,
            "project" => Self::PROJECT,
            _ => return None,
        })
    }
}

/// A class member and its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomClassDefinition {
    pub id: u32,
    pub name: String,
    pub color: Option<Color>,
    pub draw_fill: bool,
    pub use_as: CustomClassUseAs,
    pub members: Vec<ClassMember>,
}

impl CustomClassDefinition {
    pub fn member(&self, name: &str) -> Option<&ClassMember> {
        self.members.iter().find(|member| member.name == name)
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum CustomEnumStorageType {
        #[default]
        String => "string",
        Int => "int",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomEnumDefinition {
    pub id: u32,
    pub name: String,
    pub storage_type: CustomEnumStorageType,
    pub values: Vec<String>,
    /// Several values may be selected at once.
    pub values_as_flags: bool,
}

impl CustomEnumDefinition {
    /// Parse a stored enum value into the selected names.
    ///
    /// String storage lists names separated by `,` or `|`. Int storage is an
    /// index, or a bit set of indices when `values_as_flags` is set.
    pub fn parse(&self, property: &str, raw: RawValue<'_>) -> Result<PropertyValue> {
        let invalid = || Error::InvalidPropertyValue {
            name: property.to_string(),
            expected: format!("value of enum '{}'", self.name),
            value: raw.describe(),
        };

        let selected: Vec<usize> = match self.storage_type {
            CustomEnumStorageType::String => {
                let text = match raw {
                    RawValue::Text(text) => text,
                    RawValue::Json(Value::String(s)) => s.as_str(),
                    RawValue::Json(_) => return Err(invalid()),
                };
                let names: Vec<&str> = text
                    .split([',', '|'])
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect();
                let mut indices = Vec::with_capacity(names.len());
                for name in names {
                    let index = self
                        .values
                        .iter()
                        .position(|value| value == name)
                        .ok_or_else(invalid)?;
                    indices.push(index);
                }
                indices
            }
            CustomEnumStorageType::Int => {
                let number = match raw {
                    RawValue::Text(text) => text.trim().parse::<u64>().ok(),
                    RawValue::Json(value) => value.as_u64(),
                }
                .ok_or_else(invalid)?;
                if self.values_as_flags {
                    if self.values.len() < 64 && number >> self.values.len() != 0 {
                        return Err(invalid());
                    }
                    (0..self.values.len())
                        .filter(|bit| *bit < 64 && number & (1 << bit) != 0)
                        .collect()
                } else {
                    let index = usize::try_from(number).map_err(|_| invalid())?;
                    if index >= self.values.len() {
                        return Err(invalid());
                    }
                    vec![index]
                }
            }
        };

        if !self.values_as_flags && selected.len() != 1 {
            return Err(invalid());
        }

        let values = self
            .values
            .iter()
            .enumerate()
            .filter(|(i, _)| selected.contains(i))
            .map(|(_, value)| value.clone())
            .collect();
        Ok(PropertyValue::Enum {
            property_type: self.name.clone(),
            values,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomTypeDefinition {
    Class(CustomClassDefinition),
    Enum(CustomEnumDefinition),
}

impl CustomTypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            CustomTypeDefinition::Class(class) => &class.name,
            CustomTypeDefinition::Enum(enum_def) => &enum_def.name,
        }
    }
}

/// The closed catalog of custom types, keyed by name.
///
/// Read-only during a parse; one catalog may be shared by concurrent parses.
#[derive(Debug, Clone, Default)]
pub struct CustomTypes {
    types: HashMap<String, CustomTypeDefinition>,
}

impl CustomTypes {
    pub fn new(definitions: impl IntoIterator<Item = CustomTypeDefinition>) -> Self {
        definitions.into_iter().collect()
    }

    pub fn get(&self, name: &str) -> Option<&CustomTypeDefinition> {
        self.types.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&CustomClassDefinition> {
        match self.types.get(name)? {
            CustomTypeDefinition::Class(class) => Some(class),
            CustomTypeDefinition::Enum(_) => None,
        }
    }

    pub fn enum_def(&self, name: &str) -> Option<&CustomEnumDefinition> {
        match self.types.get(name)? {
            CustomTypeDefinition::Enum(enum_def) => Some(enum_def),
            CustomTypeDefinition::Class(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomTypeDefinition> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a non-class property, routing it through an enum definition when
    /// `property_type` names one.
    pub fn parse_value(
        &self,
        name: &str,
        kind: PropertyKind,
        property_type: Option<&str>,
        raw: RawValue<'_>,
    ) -> Result<PropertyValue> {
        let Some(type_name) = property_type.filter(|t| !t.is_empty()) else {
            return PropertyValue::parse_primitive(name, kind, raw);
        };
        match self.get(type_name) {
            Some(CustomTypeDefinition::Enum(enum_def)) => enum_def.parse(name, raw),
            Some(CustomTypeDefinition::Class(_)) => Err(Error::InvalidPropertyValue {
                name: name.to_string(),
                expected: kind.to_string(),
                value: format!("class '{type_name}'"),
            }),
            None => {
                warn!(
                    property = name,
                    property_type = type_name,
                    "property references an unknown custom enum, keeping it as {kind}"
                );
                PropertyValue::parse_primitive(name, kind, raw)
            }
        }
    }

    /// Build a class value: the class's member defaults overlaid with
    /// `overrides`.
    pub fn class_value(&self, class_name: &str, overrides: Properties) -> Result<PropertyValue> {
        Ok(PropertyValue::Class {
            property_type: class_name.to_string(),
            properties: self.resolve_class(class_name, overrides)?,
        })
    }

    /// Resolve the members of `class_name` in two passes: start from every
    /// declared default, then overlay `overrides`.
    ///
    /// Members absent from the definition fail with
    /// [`Error::UnknownCustomClassMember`]. Nested class values are resolved
    /// the same way. Unregistered classes keep `overrides` as written.
    pub fn resolve_class(&self, class_name: &str, mut overrides: Properties) -> Result<Properties> {
        let Some(class) = self.class(class_name) else {
            if !class_name.is_empty() {
                warn!(
                    class = class_name,
                    "property references an unknown custom class, keeping its members as written"
                );
            }
            return Ok(overrides);
        };

        if let Some(unknown) = overrides.keys().find(|key| class.member(key).is_none()) {
            return Err(Error::UnknownCustomClassMember {
                class: class_name.to_string(),
                member: unknown.clone(),
            });
        }

        let mut resolved = Properties::with_capacity(class.members.len());
        for member in &class.members {
            let value = overrides
                .remove(&member.name)
                .unwrap_or_else(|| member.value.clone());
            resolved.insert(member.name.clone(), self.complete(value)?);
        }
        Ok(resolved)
    }

    /// Defaults of `class_name` with nested classes fully resolved.
    pub fn class_defaults(&self, class_name: &str) -> Result<Properties> {
        self.resolve_class(class_name, Properties::new())
    }

    /// Properties of an entity whose `class` is `class_name`.
    ///
    /// When the class exists and may be used in `usage`, its resolved
    /// defaults come first and `explicit` overlays them key-wise. Explicit
    /// keys the class does not declare are kept.
    pub fn entity_properties(
        &self,
        class_name: &str,
        usage: CustomClassUseAs,
        explicit: Properties,
    ) -> Result<Properties> {
        match self.class(class_name) {
            Some(class) if class.use_as.intersects(usage) => {
                let mut properties = self.class_defaults(class_name)?;
                properties.extend(explicit);
                Ok(properties)
            }
            _ => Ok(explicit),
        }
    }

    fn complete(&self, value: PropertyValue) -> Result<PropertyValue> {
        match value {
            PropertyValue::Class {
                property_type,
                properties,
            } => self.class_value(&property_type, properties),
            other => Ok(other),
        }
    }
}

impl FromIterator<CustomTypeDefinition> for CustomTypes {
    fn from_iter<I: IntoIterator<Item = CustomTypeDefinition>>(iter: I) -> Self {
        let types = iter
            .into_iter()
            .map(|definition| (definition.name().to_string(), definition))
            .collect();
        Self { types }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn member(name: &str, value: PropertyValue) -> ClassMember {
        ClassMember {
            name: name.to_string(),
            value,
        }
    }

    fn catalog() -> CustomTypes {
        let stats = CustomClassDefinition {
            id: 1,
            name: "Stats".to_string(),
            color: None,
            draw_fill: false,
            use_as: CustomClassUseAs::PROPERTY | CustomClassUseAs::OBJECT,
            members: vec![
                member("hp", PropertyValue::Int(10)),
                member("speed", PropertyValue::Float(1.5)),
            ],
        };
        let enemy = CustomClassDefinition {
            id: 2,
            name: "Enemy".to_string(),
            color: None,
            draw_fill: true,
            use_as: CustomClassUseAs::PROPERTY,
            members: vec![
                member("name", PropertyValue::String("grunt".into())),
                member(
                    "stats",
                    PropertyValue::Class {
                        property_type: "Stats".to_string(),
                        properties: Properties::from([("hp".to_string(), PropertyValue::Int(3))]),
                    },
                ),
            ],
        };
        let direction = CustomEnumDefinition {
            id: 3,
            name: "Direction".to_string(),
            storage_type: CustomEnumStorageType::String,
            values: vec!["North".into(), "East".into(), "South".into(), "West".into()],
            values_as_flags: false,
        };
        let layers = CustomEnumDefinition {
            id: 4,
            name: "Layers".to_string(),
            storage_type: CustomEnumStorageType::Int,
            values: vec!["Ground".into(), "Water".into(), "Air".into()],
            values_as_flags: true,
        };
        CustomTypes::new([
            CustomTypeDefinition::Class(stats),
            CustomTypeDefinition::Class(enemy),
            CustomTypeDefinition::Enum(direction),
            CustomTypeDefinition::Enum(layers),
        ])
    }

    #[test]
    fn test_class_without_overrides_equals_defaults() {
        let types = catalog();
        let resolved = types.class_defaults("Stats").unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["hp"], PropertyValue::Int(10));
        assert_eq!(resolved["speed"], PropertyValue::Float(1.5));
    }

    #[test]
    fn test_overlay_changes_only_that_member() {
        let types = catalog();
        let overrides = Properties::from([("speed".to_string(), PropertyValue::Float(4.0))]);
        let resolved = types.resolve_class("Stats", overrides).unwrap();
        assert_eq!(resolved["hp"], PropertyValue::Int(10));
        assert_eq!(resolved["speed"], PropertyValue::Float(4.0));
    }

    #[test]
    fn test_unknown_member_is_rejected() {
        let types = catalog();
        let overrides = Properties::from([("mana".to_string(), PropertyValue::Int(1))]);
        let err = types.resolve_class("Stats", overrides).unwrap_err();
        assert!(matches!(err, Error::UnknownCustomClassMember { ref class, ref member }
            if class == "Stats" && member == "mana"));
    }

    #[test]
    fn test_nested_class_defaults_are_resolved() {
        let types = catalog();
        let resolved = types.class_defaults("Enemy").unwrap();
        let stats = resolved["stats"].as_class().unwrap();
        assert_eq!(stats["hp"], PropertyValue::Int(3));
        assert_eq!(stats["speed"], PropertyValue::Float(1.5));
    }

    #[test]
    fn test_unregistered_class_keeps_members() {
        let types = catalog();
        let overrides = Properties::from([("x".to_string(), PropertyValue::Bool(true))]);
        let resolved = types.resolve_class("Missing", overrides.clone()).unwrap();
        assert_eq!(resolved, overrides);
    }

    #[test]
    fn test_string_enum_single_value() {
        let types = catalog();
        let value = types
            .parse_value(
                "facing",
                PropertyKind::String,
                Some("Direction"),
                RawValue::Text("East"),
            )
            .unwrap();
        assert_eq!(
            value,
            PropertyValue::Enum {
                property_type: "Direction".to_string(),
                values: vec!["East".to_string()],
            }
        );
    }

    #[test]
    fn test_string_enum_rejects_unknown_and_multiple() {
        let types = catalog();
        let direction = types.enum_def("Direction").unwrap();
        assert!(direction.parse("facing", RawValue::Text("Up")).is_err());
        assert!(direction
            .parse("facing", RawValue::Text("North,East"))
            .is_err());
    }

    #[test]
    fn test_int_flags_enum_keeps_definition_order() {
        let types = catalog();
        let layers = types.enum_def("Layers").unwrap();
        let value = layers.parse("mask", RawValue::Json(&json!(5))).unwrap();
        assert_eq!(
            value,
            PropertyValue::Enum {
                property_type: "Layers".to_string(),
                values: vec!["Ground".to_string(), "Air".to_string()],
            }
        );
        assert!(layers.parse("mask", RawValue::Text("8")).is_err());
    }

    #[test]
    fn test_entity_properties_respect_use_as() {
        let types = catalog();
        let explicit = Properties::from([("extra".to_string(), PropertyValue::Int(1))]);

        let object = types
            .entity_properties("Stats", CustomClassUseAs::OBJECT, explicit.clone())
            .unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["hp"], PropertyValue::Int(10));

        let map = types
            .entity_properties("Stats", CustomClassUseAs::MAP, explicit.clone())
            .unwrap();
        assert_eq!(map, explicit);
    }

    #[test]
    fn test_use_as_literals() {
        assert_eq!(
            CustomClassUseAs::from_literal("wangcolor"),
            Some(CustomClassUseAs::WANG_COLOR)
        );
        assert_eq!(CustomClassUseAs::from_literal("sprite"), None);
    }
}
