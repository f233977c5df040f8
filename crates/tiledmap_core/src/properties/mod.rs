//! Typed properties and the caller-supplied custom class/enum catalog.
//!
//! Both readers hand raw entries (name, type tag, optional `propertytype`,
//! raw value) to [`CustomTypes`], which produces a [`PropertyValue`]:
//!
//! - primitive tags parse directly from text or JSON
//! - a `propertytype` naming an enum validates the selected names
//! - class values start from the class's member defaults and overlay the
//!   explicit members; members the class does not declare are rejected

mod custom_types;
pub mod json;
mod value;

use std::collections::HashMap;

pub use custom_types::{
    ClassMember, CustomClassDefinition, CustomClassUseAs, CustomEnumDefinition,
    CustomEnumStorageType, CustomTypeDefinition, CustomTypes,
};
pub use value::{PropertyKind, PropertyValue, RawValue};

/// Property name to value. Keys are unique within one block.
pub type Properties = HashMap<String, PropertyValue>;
