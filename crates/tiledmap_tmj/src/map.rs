use tiledmap_core::model::Map;
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};
use tracing::debug;

use crate::json::JsonObject;
use crate::layer::read_layers;
use crate::tileset::read_tileset;

pub(crate) fn read_map(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Map> {
    obj.expect_type("map")?;
    let types = context.custom_types();
    let infinite = obj.bool("infinite")?.unwrap_or(false);

    let tilesets = obj
        .objects("tilesets", "tileset")?
        .into_iter()
        .map(|tileset| read_tileset(tileset, context))
        .collect::<Result<Vec<_>>>()?;
    let layers = read_layers(&obj, context, infinite)?;
    let class = obj.string("class")?;

    let map = Map {
        version: obj
            .version("version")?
            .ok_or_else(|| Error::missing(obj.element, "version"))?,
        tiled_version: obj.str("tiledversion")?.map(str::to_string),
        orientation: obj.required_literal("orientation")?,
        render_order: obj.literal("renderorder")?.unwrap_or_default(),
        compression_level: obj.int("compressionlevel")?.unwrap_or(-1),
        width: obj.required_int("width")?,
        height: obj.required_int("height")?,
        tile_width: obj.required_int("tilewidth")?,
        tile_height: obj.required_int("tileheight")?,
        hex_side_length: obj.int("hexsidelength")?,
        stagger_axis: obj.literal("staggeraxis")?,
        stagger_index: obj.literal("staggerindex")?,
        parallax_origin_x: obj.float("parallaxoriginx")?.unwrap_or(0.0),
        parallax_origin_y: obj.float("parallaxoriginy")?.unwrap_or(0.0),
        background_color: obj.color("backgroundcolor")?,
        next_layer_id: obj.required_int("nextlayerid")?,
        next_object_id: obj.required_int("nextobjectid")?,
        infinite,
        properties: types.entity_properties(&class, CustomClassUseAs::MAP, obj.properties(types)?)?,
        class,
        tilesets,
        layers,
    };
    debug!(
        tilesets = map.tilesets.len(),
        layers = map.layers.len(),
        infinite = map.infinite,
        "read JSON map"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tiledmap_core::model::{MapOrientation, StaggerIndex};
    use tiledmap_core::{CustomTypes, NoExternals, PropertyValue};

    use super::*;

    fn read(value: &Value) -> Result<Map> {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        read_map(JsonObject::new("map", value)?, &context)
    }

    #[test]
    fn test_empty_map() {
        let map = read(&json!({
            "type": "map", "version": "1.10", "tiledversion": "1.11.0",
            "orientation": "orthogonal", "renderorder": "right-down",
            "width": 0, "height": 0, "tilewidth": 32, "tileheight": 32,
            "infinite": false, "nextlayerid": 2, "nextobjectid": 1,
            "layers": [{
                "id": 1, "type": "tilelayer", "name": "Tile Layer 1",
                "width": 0, "height": 0, "data": []
            }],
            "tilesets": []
        }))
        .unwrap();
        assert!(map.tilesets.is_empty());
        let grid = map.layers[0]
            .as_tile_layer()
            .unwrap()
            .data
            .as_ref()
            .unwrap()
            .tiles()
            .unwrap();
        assert!(grid.is_empty());
        assert_eq!(map.compression_level, -1);
    }

    #[test]
    fn test_reads_staggered_attributes_and_properties() {
        let map = read(&json!({
            "type": "map", "version": 1.2, "orientation": "staggered",
            "width": 4, "height": 4, "tilewidth": 16, "tileheight": 8,
            "staggeraxis": "y", "staggerindex": "odd", "backgroundcolor": "#80112233",
            "nextlayerid": 1, "nextobjectid": 1,
            "properties": [{"name": "music", "type": "file", "value": "theme.ogg"}]
        }))
        .unwrap();
        assert_eq!(map.version, "1.2");
        assert_eq!(map.orientation, MapOrientation::Staggered);
        assert_eq!(map.stagger_index, Some(StaggerIndex::Odd));
        assert_eq!(map.background_color.unwrap().alpha, 0x80);
        assert_eq!(
            map.properties["music"],
            PropertyValue::File("theme.ogg".into())
        );
    }

    #[test]
    fn test_tileset_document_is_not_a_map() {
        let err = read(&json!({"type": "tileset", "name": "t"})).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_orientation_is_reported() {
        let err = read(&json!({
            "version": "1.10", "width": 1, "height": 1, "tilewidth": 1, "tileheight": 1,
            "nextlayerid": 1, "nextobjectid": 1
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MissingRequiredAttribute { ref attribute, .. }
            if attribute == "orientation"));
    }
}
