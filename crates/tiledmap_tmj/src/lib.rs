//! # `tiledmap_tmj`
//!
//! Reader for Tiled's JSON formats: `.tmj` maps, `.tsj` tilesets and `.tj`
//! templates.
//!
//! Documents are parsed into a `serde_json::Value` and walked into the same
//! [`tiledmap_core::model`] types the XML reader produces. A map saved in
//! both formats reads back as equal values.

mod json;
mod layer;
mod map;
mod object;
mod tileset;

use std::io::Read;

use tiledmap_core::model::{Map, Template, Tileset};
use tiledmap_core::{ReadContext, Result};

use crate::json::JsonObject;

/// Read a map from JSON text.
pub fn read_map(text: &str, context: &ReadContext<'_>) -> Result<Map> {
    let root = json::parse_str(text)?;
    map::read_map(JsonObject::new("map", &root)?, context)
}

pub fn read_map_from<R: Read>(reader: R, context: &ReadContext<'_>) -> Result<Map> {
    let root = json::parse_reader(reader)?;
    map::read_map(JsonObject::new("map", &root)?, context)
}

/// Read a standalone tileset document.
///
/// The result has no `first_gid` or `source`; those are stamped on by the
/// referencing map.
pub fn read_tileset(text: &str, context: &ReadContext<'_>) -> Result<Tileset> {
    let root = json::parse_str(text)?;
    standalone_tileset(JsonObject::new("tileset", &root)?, context)
}

pub fn read_tileset_from<R: Read>(reader: R, context: &ReadContext<'_>) -> Result<Tileset> {
    let root = json::parse_reader(reader)?;
    standalone_tileset(JsonObject::new("tileset", &root)?, context)
}

/// Read a standalone object template document.
pub fn read_template(text: &str, context: &ReadContext<'_>) -> Result<Template> {
    let root = json::parse_str(text)?;
    object::read_template(JsonObject::new("template", &root)?, context)
}

pub fn read_template_from<R: Read>(reader: R, context: &ReadContext<'_>) -> Result<Template> {
    let root = json::parse_reader(reader)?;
    object::read_template(JsonObject::new("template", &root)?, context)
}

fn standalone_tileset(root: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Tileset> {
    root.expect_type("tileset")?;
    tileset::read_tileset(root, context)
}

#[cfg(test)]
mod tests {
    use tiledmap_core::{CustomTypes, Error, NoExternals};

    use super::*;

    const MAP: &str = r#"{
        "type": "map", "version": "1.10", "orientation": "isometric",
        "width": 2, "height": 1, "tilewidth": 32, "tileheight": 16,
        "nextlayerid": 2, "nextobjectid": 1,
        "layers": [{"id": 1, "type": "tilelayer", "width": 2, "height": 1, "data": [1, 2]}]
    }"#;

    #[test]
    fn test_reader_and_string_give_equal_maps() {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        let from_str = read_map(MAP, &context).unwrap();
        let from_reader = read_map_from(MAP.as_bytes(), &context).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_map_document_is_not_a_tileset() {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        let err = read_tileset(MAP, &context).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_non_object_root_is_malformed() {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        let err = read_map("[1, 2, 3]", &context).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }
}
