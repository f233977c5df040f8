use tiledmap_core::properties::{CustomTypes, Properties, PropertyKind, PropertyValue, RawValue};
use tiledmap_core::Result;
use tracing::trace;

use crate::xml::Element;

/// Read the optional `<properties>` child of `el`.
pub(crate) fn read_child_properties(el: &Element, types: &CustomTypes) -> Result<Properties> {
    match el.at_most_one("properties")? {
        Some(block) => read_properties(block, types),
        None => Ok(Properties::new()),
    }
}

/// Read a `<properties>` block. A later `<property>` with the same name
/// replaces an earlier one.
pub(crate) fn read_properties(block: &Element, types: &CustomTypes) -> Result<Properties> {
    let mut properties = Properties::with_capacity(block.children.len());
    for child in &block.children {
        if child.name != "property" {
            trace!(element = %child.name, "skipping unknown element in <properties>");
            continue;
        }
        let (name, value) = read_property(child, types)?;
        properties.insert(name, value);
    }
    Ok(properties)
}

fn read_property(el: &Element, types: &CustomTypes) -> Result<(String, PropertyValue)> {
    let name = el.required("name")?;
    let kind = el.literal::<PropertyKind>("type")?.unwrap_or_default();
    let property_type = el.attr("propertytype");

    let value = match kind {
        PropertyKind::Class => {
            let class_name = property_type.unwrap_or_default();
            let members = read_child_properties(el, types)?;
            types.class_value(class_name, members)?
        }
        _ => {
            // Multi-line strings are written as element text instead of `value`.
            let raw = match el.attr("value") {
                Some(value) => value,
                None if el.text.is_empty() => kind.empty_value(),
                None => &el.text,
            };
            types.parse_value(name, kind, property_type, RawValue::Text(raw))?
        }
    };
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use tiledmap_core::Error;
    use tiledmap_core::model::Color;
    use tiledmap_core::properties::{
        ClassMember, CustomClassDefinition, CustomClassUseAs, CustomEnumDefinition,
        CustomEnumStorageType, CustomTypeDefinition,
    };

    use super::*;
    use crate::xml::parse_str;

    fn catalog() -> CustomTypes {
        CustomTypes::new([
            CustomTypeDefinition::Class(CustomClassDefinition {
                id: 1,
                name: "Door".to_string(),
                color: None,
                draw_fill: false,
                use_as: CustomClassUseAs::PROPERTY,
                members: vec![
                    ClassMember {
                        name: "locked".to_string(),
                        value: PropertyValue::Bool(false),
                    },
                    ClassMember {
                        name: "key".to_string(),
                        value: PropertyValue::String("brass".to_string()),
                    },
                ],
            }),
            CustomTypeDefinition::Enum(CustomEnumDefinition {
                id: 2,
                name: "Flags".to_string(),
                storage_type: CustomEnumStorageType::String,
                values: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                values_as_flags: true,
            }),
        ])
    }

    #[test]
    fn test_reads_primitive_properties() {
        let block = parse_str(
            r##"<properties>
  <property name="name" value="castle"/>
  <property name="floors" type="int" value="3"/>
  <property name="haunted" type="bool" value="true"/>
  <property name="sky" type="color" value="#ff8090a0"/>
  <property name="target" type="object" value="12"/>
  <property name="notes">line one
line two</property>
</properties>"##,
        )
        .unwrap();
        let props = read_properties(&block, &CustomTypes::default()).unwrap();

        assert_eq!(props["name"], PropertyValue::String("castle".into()));
        assert_eq!(props["floors"], PropertyValue::Int(3));
        assert_eq!(props["haunted"], PropertyValue::Bool(true));
        assert_eq!(
            props["sky"],
            PropertyValue::Color(Some(Color::rgba(0x80, 0x90, 0xa0, 0xff)))
        );
        assert_eq!(props["target"], PropertyValue::Object(12));
        assert_eq!(
            props["notes"],
            PropertyValue::String("line one\nline two".into())
        );
    }

    #[test]
    fn test_valueless_properties_take_typed_defaults() {
        let block = parse_str(
            r#"<properties>
  <property name="n" type="int"/>
  <property name="on" type="bool"/>
  <property name="tint" type="color"/>
</properties>"#,
        )
        .unwrap();
        let props = read_properties(&block, &CustomTypes::default()).unwrap();
        assert_eq!(props["n"], PropertyValue::Int(0));
        assert_eq!(props["on"], PropertyValue::Bool(false));
        assert_eq!(props["tint"], PropertyValue::Color(None));
    }

    #[test]
    fn test_class_property_overlays_defaults() {
        let block = parse_str(
            r#"<properties>
  <property name="door" type="class" propertytype="Door">
    <properties><property name="locked" type="bool" value="true"/></properties>
  </property>
</properties>"#,
        )
        .unwrap();
        let props = read_properties(&block, &catalog()).unwrap();
        let door = props["door"].as_class().unwrap();
        assert_eq!(door["locked"], PropertyValue::Bool(true));
        assert_eq!(door["key"], PropertyValue::String("brass".into()));
    }

    #[test]
    fn test_class_property_rejects_unknown_member() {
        let block = parse_str(
            r#"<properties>
  <property name="door" type="class" propertytype="Door">
    <properties><property name="hinges" type="int" value="2"/></properties>
  </property>
</properties>"#,
        )
        .unwrap();
        let err = read_properties(&block, &catalog()).unwrap_err();
        assert!(matches!(err, Error::UnknownCustomClassMember { ref member, .. } if member == "hinges"));
    }

    #[test]
    fn test_flags_enum_property() {
        let block = parse_str(
            r#"<properties><property name="f" type="string" propertytype="Flags" value="C|A"/></properties>"#,
        )
        .unwrap();
        let props = read_properties(&block, &catalog()).unwrap();
        assert_eq!(
            props["f"],
            PropertyValue::Enum {
                property_type: "Flags".to_string(),
                values: vec!["A".to_string(), "C".to_string()],
            }
        );
    }

    #[test]
    fn test_last_duplicate_wins() {
        let block = parse_str(
            r#"<properties><property name="a" value="1"/><property name="a" value="2"/></properties>"#,
        )
        .unwrap();
        let props = read_properties(&block, &CustomTypes::default()).unwrap();
        assert_eq!(props["a"], PropertyValue::String("2".into()));
    }

    #[test]
    fn test_duplicate_properties_block_is_rejected() {
        let el = parse_str("<map><properties/><properties/></map>").unwrap();
        let err = read_child_properties(&el, &CustomTypes::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateElement { .. }));
    }
}
