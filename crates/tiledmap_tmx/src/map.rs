use tiledmap_core::model::Map;
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{ReadContext, Result};
use tracing::debug;

use crate::layer::read_layers;
use crate::properties::read_child_properties;
use crate::tileset::read_tileset;
use crate::xml::Element;

pub(crate) fn read_map(el: &Element, context: &ReadContext<'_>) -> Result<Map> {
    el.expect_name("map")?;
    let types = context.custom_types();
    let infinite = el.flag("infinite")?.unwrap_or(false);

    // Other children are layers or are logged and skipped by `read_layers`.
    let tilesets = el
        .children
        .iter()
        .filter(|child| child.name == "tileset")
        .map(|child| read_tileset(child, context))
        .collect::<Result<Vec<_>>>()?;
    let layers = read_layers(el, context, infinite)?;
    let class = el.attr("class").unwrap_or_default().to_string();

    let map = Map {
        version: el.required("version")?.to_string(),
        tiled_version: el.attr("tiledversion").map(str::to_string),
        orientation: el.required_literal("orientation")?,
        render_order: el.literal("renderorder")?.unwrap_or_default(),
        compression_level: el.parse("compressionlevel")?.unwrap_or(-1),
        width: el.parse_required("width")?,
        height: el.parse_required("height")?,
        tile_width: el.parse_required("tilewidth")?,
        tile_height: el.parse_required("tileheight")?,
        hex_side_length: el.parse("hexsidelength")?,
        stagger_axis: el.literal("staggeraxis")?,
        stagger_index: el.literal("staggerindex")?,
        parallax_origin_x: el.parse("parallaxoriginx")?.unwrap_or(0.0),
        parallax_origin_y: el.parse("parallaxoriginy")?.unwrap_or(0.0),
        background_color: el.color("backgroundcolor")?,
        next_layer_id: el.parse_required("nextlayerid")?,
        next_object_id: el.parse_required("nextobjectid")?,
        infinite,
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::MAP,
            read_child_properties(el, types)?,
        )?,
        class,
        tilesets,
        layers,
    };
    debug!(
        tilesets = map.tilesets.len(),
        layers = map.layers.len(),
        infinite = map.infinite,
        "read XML map"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use tiledmap_core::model::{MapOrientation, RenderOrder, StaggerAxis};
    use tiledmap_core::{CustomTypes, Error, NoExternals};

    use super::*;
    use crate::xml::parse_str;

    fn read(xml: &str) -> Result<Map> {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        read_map(&parse_str(xml)?, &context)
    }

    #[test]
    fn test_empty_csv_map() {
        let map = read(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" tiledversion="1.11.0" orientation="orthogonal" renderorder="right-down"
     width="0" height="0" tilewidth="32" tileheight="32" infinite="0" nextlayerid="2" nextobjectid="1">
  <layer id="1" name="Tile Layer 1" width="0" height="0">
    <data encoding="csv">
</data>
  </layer>
</map>"#,
        )
        .unwrap();

        assert!(map.tilesets.is_empty());
        assert_eq!(map.layers.len(), 1);
        let grid = map.layers[0]
            .as_tile_layer()
            .unwrap()
            .data
            .as_ref()
            .unwrap()
            .tiles()
            .unwrap();
        assert!(grid.global_tile_ids.is_empty());
        assert!(grid.flipping_flags.is_empty());
        assert_eq!(map.compression_level, -1);
        assert_eq!(map.render_order, RenderOrder::RightDown);
    }

    #[test]
    fn test_reads_staggered_attributes() {
        let map = read(
            r##"<map version="1.10" orientation="hexagonal" width="4" height="4" tilewidth="16" tileheight="16"
     hexsidelength="8" staggeraxis="x" staggerindex="even" backgroundcolor="#334455"
     nextlayerid="1" nextobjectid="1" class="Level"/>"##,
        )
        .unwrap();
        assert_eq!(map.orientation, MapOrientation::Hexagonal);
        assert_eq!(map.hex_side_length, Some(8));
        assert_eq!(map.stagger_axis, Some(StaggerAxis::X));
        assert!(map.background_color.is_some());
        assert_eq!(map.class, "Level");
    }

    #[test]
    fn test_unknown_orientation_is_invalid_enum() {
        let err = read(
            r#"<map version="1.10" orientation="diagonal" width="1" height="1" tilewidth="1" tileheight="1" nextlayerid="1" nextobjectid="1"/>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { ref value, .. } if value == "diagonal"));
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let err = read(r#"<tileset name="x"/>"#).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let map = read(
            r#"<map version="1.10" orientation="orthogonal" width="1" height="1" tilewidth="1" tileheight="1" nextlayerid="1" nextobjectid="1">
  <editorsettings><export target="x.json" format="json"/></editorsettings>
  <futurething/>
</map>"#,
        )
        .unwrap();
        assert!(map.layers.is_empty());
    }
}
