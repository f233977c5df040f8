//! # `tiledmap_tmx`
//!
//! Reader for Tiled's XML formats: `.tmx` maps, `.tsx` tilesets and `.tx`
//! templates.
//!
//! Documents are tokenized with `quick-xml` into an element tree and then
//! walked top-down. External tilesets and templates go through the
//! resolvers in the [`ReadContext`]; custom property types come from its
//! catalog.
//!
//! ```rust
//! use tiledmap_core::{CustomTypes, NoExternals, ReadContext};
//!
//! let types = CustomTypes::default();
//! let context = ReadContext::new(&NoExternals, &NoExternals, &types);
//! let map = tiledmap_tmx::read_map(
//!     r#"<map version="1.10" orientation="orthogonal" width="1" height="1"
//!             tilewidth="16" tileheight="16" nextlayerid="1" nextobjectid="1"/>"#,
//!     &context,
//! )
//! .unwrap();
//! assert_eq!(map.tile_width, 16);
//! ```

mod layer;
mod map;
mod object;
mod properties;
mod tileset;
mod xml;

use std::io::BufRead;

use tiledmap_core::model::{Map, Template, Tileset};
use tiledmap_core::{ReadContext, Result};

/// Read a map from XML text.
pub fn read_map(xml: &str, context: &ReadContext<'_>) -> Result<Map> {
    map::read_map(&xml::parse_str(xml)?, context)
}

/// Read a map from a buffered XML stream.
pub fn read_map_from<R: BufRead>(reader: R, context: &ReadContext<'_>) -> Result<Map> {
    map::read_map(&xml::parse_reader(reader)?, context)
}

/// Read a standalone tileset document.
///
/// The result has no `first_gid` or `source`; those are stamped on by the
/// referencing map.
pub fn read_tileset(xml: &str, context: &ReadContext<'_>) -> Result<Tileset> {
    tileset::read_tileset(&xml::parse_str(xml)?, context)
}

pub fn read_tileset_from<R: BufRead>(reader: R, context: &ReadContext<'_>) -> Result<Tileset> {
    tileset::read_tileset(&xml::parse_reader(reader)?, context)
}

/// Read a standalone object template document.
pub fn read_template(xml: &str, context: &ReadContext<'_>) -> Result<Template> {
    object::read_template(&xml::parse_str(xml)?, context)
}

pub fn read_template_from<R: BufRead>(reader: R, context: &ReadContext<'_>) -> Result<Template> {
    object::read_template(&xml::parse_reader(reader)?, context)
}

#[cfg(test)]
mod tests {
    use tiledmap_core::{CustomTypes, NoExternals};

    use super::*;

    const MAP: &str = r#"<map version="1.10" orientation="isometric" width="2" height="1"
  tilewidth="32" tileheight="16" nextlayerid="2" nextobjectid="1">
  <layer id="1" width="2" height="1"><data encoding="csv">1,2</data></layer>
</map>"#;

    #[test]
    fn test_reader_and_string_give_equal_maps() {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        let from_str = read_map(MAP, &context).unwrap();
        let from_reader = read_map_from(MAP.as_bytes(), &context).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_standalone_tileset_has_no_reference_fields() {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        let tileset = read_tileset(
            r#"<?xml version="1.0"?><tileset version="1.10" name="t" tilewidth="8" tileheight="8" tilecount="1" columns="1"/>"#,
            &context,
        )
        .unwrap();
        assert_eq!(tileset.first_gid, None);
        assert_eq!(tileset.source, None);
        assert_eq!(tileset.version.as_deref(), Some("1.10"));
    }
}
