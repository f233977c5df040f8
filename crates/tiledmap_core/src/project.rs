//! Tiled project file (`.tiled-project`) loading.
//!
//! A project file carries the custom property types (classes and enums) a
//! set of maps is authored against. [`CustomTypes::from_project_json`] turns
//! them into the catalog both readers consume.
//!
//! # Example
//!
//! ```rust
//! use tiledmap_core::CustomTypes;
//!
//! let project = r#"{
//!     "propertyTypes": [
//!         {"type": "enum", "id": 1, "name": "Direction",
//!          "values": ["North", "South"], "storageType": "string", "valuesAsFlags": false},
//!         {"type": "class", "id": 2, "name": "Door", "useAs": ["object"],
//!          "members": [{"name": "facing", "type": "string", "propertyType": "Direction", "value": "South"}]}
//!     ]
//! }"#;
//!
//! let types = CustomTypes::from_project_json(project).unwrap();
//! assert_eq!(types.len(), 2);
//! assert!(types.class("Door").is_some());
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::literal::parse_literal;
use crate::model::Color;
use crate::properties::json::read_class_overrides;
use crate::properties::{
    ClassMember, CustomClassDefinition, CustomClassUseAs, CustomEnumDefinition,
    CustomEnumStorageType, CustomTypeDefinition, CustomTypes, PropertyKind, PropertyValue,
    RawValue,
};

/// The parts of a `.tiled-project` file the readers care about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// Property type definitions (classes and enums).
    #[serde(default)]
    pub property_types: Vec<ProjectPropertyType>,
}

/// A property type definition as written in the project file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProjectPropertyType {
    #[serde(rename = "class")]
    Class(ProjectClass),

    #[serde(rename = "enum")]
    Enum(ProjectEnum),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectClass {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub members: Vec<ProjectClassMember>,
    /// Display color in the editor (hex string).
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub draw_fill: bool,
    /// Where this class can be used (e.g. `["property", "object"]`).
    #[serde(default)]
    pub use_as: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectClassMember {
    pub name: String,
    /// Built-in type tag (`"float"`, `"class"`, ...).
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(default)]
    pub value: Value,
    /// Custom type name for class and enum members.
    #[serde(default)]
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEnum {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default = "default_storage_type")]
    pub storage_type: String,
    #[serde(default)]
    pub values_as_flags: bool,
}

fn default_storage_type() -> String {
    "string".to_string()
}

impl ProjectFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::malformed(format!("invalid Tiled project file: {e}")))
    }

    /// Convert the project's definitions into a catalog.
    ///
    /// Enums are registered first and class members in a second pass, so
    /// members may reference any type declared in the file regardless of
    /// order.
    pub fn into_custom_types(self) -> Result<CustomTypes> {
        let mut definitions = Vec::with_capacity(self.property_types.len());
        let mut classes = Vec::new();
        for property_type in self.property_types {
            match property_type {
                ProjectPropertyType::Enum(e) => {
                    definitions.push(CustomTypeDefinition::Enum(convert_enum(e)?));
                }
                ProjectPropertyType::Class(c) => classes.push(c),
            }
        }

        // Class members default to placeholders until every class is known.
        definitions.extend(classes.iter().map(|class| {
            CustomTypeDefinition::Class(CustomClassDefinition {
                id: class.id,
                name: class.name.clone(),
                color: None,
                draw_fill: class.draw_fill,
                use_as: CustomClassUseAs::empty(),
                members: class
                    .members
                    .iter()
                    .map(|member| ClassMember {
                        name: member.name.clone(),
                        value: placeholder(member),
                    })
                    .collect(),
            })
        }));
        let skeleton = CustomTypes::new(definitions.clone());

        let mut converted: Vec<CustomTypeDefinition> = definitions
            .into_iter()
            .filter(|definition| matches!(definition, CustomTypeDefinition::Enum(_)))
            .collect();
        for class in classes {
            converted.push(CustomTypeDefinition::Class(convert_class(&skeleton, class)?));
        }
        Ok(CustomTypes::new(converted))
    }
}

impl CustomTypes {
    /// Build a catalog from the JSON text of a `.tiled-project` file.
    pub fn from_project_json(json: &str) -> Result<Self> {
        ProjectFile::from_json(json)?.into_custom_types()
    }
}

fn convert_enum(e: ProjectEnum) -> Result<CustomEnumDefinition> {
    Ok(CustomEnumDefinition {
        id: e.id,
        storage_type: parse_literal::<CustomEnumStorageType>("storageType", &e.storage_type)?,
        name: e.name,
        values: e.values,
        values_as_flags: e.values_as_flags,
    })
}

fn convert_class(types: &CustomTypes, class: ProjectClass) -> Result<CustomClassDefinition> {
    let mut use_as = CustomClassUseAs::empty();
    for usage in &class.use_as {
        use_as |= CustomClassUseAs::from_literal(usage)
            .ok_or_else(|| Error::invalid_enum("useAs", usage))?;
    }

    let mut members = Vec::with_capacity(class.members.len());
    for member in &class.members {
        members.push(ClassMember {
            name: member.name.clone(),
            value: member_default(types, member)?,
        });
    }

    Ok(CustomClassDefinition {
        id: class.id,
        color: Color::parse(&class.color),
        name: class.name,
        draw_fill: class.draw_fill,
        use_as,
        members,
    })
}

fn member_default(types: &CustomTypes, member: &ProjectClassMember) -> Result<PropertyValue> {
    let kind = parse_literal::<PropertyKind>("type", &member.member_type)?;
    let property_type = member.property_type.as_deref();
    match kind {
        PropertyKind::Class => {
            let class_name = property_type.unwrap_or_default();
            Ok(PropertyValue::Class {
                property_type: class_name.to_string(),
                properties: read_class_overrides(types, &member.name, class_name, &member.value)?,
            })
        }
        _ => types.parse_value(&member.name, kind, property_type, RawValue::Json(&member.value)),
    }
}

/// Shape-only default used while class members are still being converted.
fn placeholder(member: &ProjectClassMember) -> PropertyValue {
    let property_type = member.property_type.clone().unwrap_or_default();
    match member.member_type.as_str() {
        "class" => PropertyValue::Class {
            property_type,
            properties: Default::default(),
        },
        _ if !property_type.is_empty() => PropertyValue::Enum {
            property_type,
            values: Vec::new(),
        },
        "int" => PropertyValue::Int(0),
        "float" => PropertyValue::Float(0.0),
        "bool" => PropertyValue::Bool(false),
        "color" => PropertyValue::Color(None),
        "file" => PropertyValue::File(String::new()),
        "object" => PropertyValue::Object(0),
        _ => PropertyValue::String(String::new()),
    }
}
