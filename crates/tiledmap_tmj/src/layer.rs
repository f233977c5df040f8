use serde_json::Value;
use tiledmap_core::encoding::decode_tile_data;
use tiledmap_core::model::{
    Chunk, Data, DataCompression, DataContent, DataEncoding, GroupLayer, ImageLayer, Layer,
    LayerKind, ObjectLayer, TileGrid, TileLayer,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};

use crate::json::JsonObject;
use crate::object::read_object;
use crate::tileset::read_image;

/// Read the `layers` array of a map or group, in document order.
pub(crate) fn read_layers(
    parent: &JsonObject<'_>,
    context: &ReadContext<'_>,
    infinite: bool,
) -> Result<Vec<Layer>> {
    parent
        .objects("layers", "layer")?
        .into_iter()
        .map(|obj| read_layer(obj, context, infinite))
        .collect()
}

fn read_layer(obj: JsonObject<'_>, context: &ReadContext<'_>, infinite: bool) -> Result<Layer> {
    let id = obj.required_int("id")?;
    match obj.required_str("type")? {
        "tilelayer" => {
            let tiles = TileLayer {
                x: obj.int("x")?.unwrap_or(0),
                y: obj.int("y")?.unwrap_or(0),
                width: obj.required_int("width")?,
                height: obj.required_int("height")?,
                data: read_data(&obj, infinite)?,
            };
            layer(&obj, context, id, LayerKind::Tiles(tiles))
        }
        "objectgroup" => read_object_layer(obj, context, id),
        "imagelayer" => {
            let image = ImageLayer {
                x: obj.int("x")?.unwrap_or(0),
                y: obj.int("y")?.unwrap_or(0),
                image: read_image(&obj)?,
                repeat_x: obj.bool("repeatx")?.unwrap_or(false),
                repeat_y: obj.bool("repeaty")?.unwrap_or(false),
            };
            layer(&obj, context, id, LayerKind::Image(image))
        }
        "group" => {
            let group = GroupLayer {
                layers: read_layers(&obj, context, infinite)?,
            };
            layer(&obj, context, id, LayerKind::Group(group))
        }
        other => Err(Error::invalid_enum("type", other)),
    }
}

/// Attributes shared by every layer kind.
fn layer(obj: &JsonObject<'_>, context: &ReadContext<'_>, id: u32, kind: LayerKind) -> Result<Layer> {
    let types = context.custom_types();
    let class = obj.string("class")?;
    Ok(Layer {
        id,
        name: obj.string("name")?,
        opacity: obj.float("opacity")?.unwrap_or(1.0),
        visible: obj.bool("visible")?.unwrap_or(true),
        tint_color: obj.color("tintcolor")?,
        offset_x: obj.float("offsetx")?.unwrap_or(0.0),
        offset_y: obj.float("offsety")?.unwrap_or(0.0),
        parallax_x: obj.float("parallaxx")?.unwrap_or(1.0),
        parallax_y: obj.float("parallaxy")?.unwrap_or(1.0),
        properties: types.entity_properties(&class, CustomClassUseAs::LAYER, obj.properties(types)?)?,
        class,
        kind,
    })
}

/// Read an `objectgroup`. Collision groups inside tiles may omit `id`, so
/// the caller supplies it.
pub(crate) fn read_object_layer(
    obj: JsonObject<'_>,
    context: &ReadContext<'_>,
    id: u32,
) -> Result<Layer> {
    let objects = obj
        .objects("objects", "object")?
        .into_iter()
        .map(|object| read_object(object, context))
        .collect::<Result<Vec<_>>>()?;
    let objects_layer = ObjectLayer {
        x: obj.int("x")?.unwrap_or(0),
        y: obj.int("y")?.unwrap_or(0),
        width: obj.int("width")?,
        height: obj.int("height")?,
        color: obj.color("color")?,
        draw_order: obj.literal("draworder")?.unwrap_or_default(),
        objects,
    };
    layer(&obj, context, id, LayerKind::Objects(objects_layer))
}

/// Tile data of a tile layer. Infinite maps keep their cells in `chunks`.
///
/// A numeric `data` array is the JSON spelling of CSV, so `encoding`
/// defaults to CSV.
fn read_data(obj: &JsonObject<'_>, chunked: bool) -> Result<Option<Data>> {
    let key = if chunked { "chunks" } else { "data" };
    if obj.get(key).is_none() {
        return Ok(None);
    }
    let encoding = obj.literal("encoding")?.unwrap_or(DataEncoding::Csv);
    let compression = obj.literal::<DataCompression>("compression")?;

    let content = if chunked {
        let chunks = obj
            .objects("chunks", "chunk")?
            .into_iter()
            .map(|chunk| {
                Ok(Chunk {
                    x: chunk.required_int("x")?,
                    y: chunk.required_int("y")?,
                    width: chunk.required_int("width")?,
                    height: chunk.required_int("height")?,
                    tiles: read_cells(&chunk, encoding, compression)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        DataContent::Chunked(chunks)
    } else {
        DataContent::Flat(read_cells(obj, encoding, compression)?)
    };

    Ok(Some(Data {
        encoding: Some(encoding),
        compression,
        content,
    }))
}

fn read_cells(
    obj: &JsonObject<'_>,
    encoding: DataEncoding,
    compression: Option<DataCompression>,
) -> Result<TileGrid> {
    match obj.get("data") {
        Some(Value::String(payload)) => decode_tile_data(payload, encoding, compression),
        Some(Value::Array(cells)) => {
            let raw = cells
                .iter()
                .map(|cell| {
                    cell.as_u64()
                        .and_then(|gid| u32::try_from(gid).ok())
                        .ok_or_else(|| Error::format("tile data", cell.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TileGrid::from_raw(&raw))
        }
        Some(other) => Err(Error::format("tile data", other.to_string())),
        None => Err(Error::missing(obj.element, "data")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use serde_json::json;
    use tiledmap_core::model::{DrawOrder, FlippingFlags};
    use tiledmap_core::{CustomTypes, NoExternals};

    use super::*;

    fn read_all(value: &Value, infinite: bool) -> Result<Vec<Layer>> {
        let types = CustomTypes::default();
        let context = ReadContext::new(&NoExternals, &NoExternals, &types);
        read_layers(&JsonObject::new("map", value)?, &context, infinite)
    }

    #[test]
    fn test_reads_array_data_as_csv() {
        let layers = read_all(
            &json!({"layers": [{
                "id": 1, "type": "tilelayer", "name": "ground", "width": 2, "height": 2,
                "data": [1, 2, 2147483651u32, 0]
            }]}),
            false,
        )
        .unwrap();
        let layer = &layers[0];
        assert_eq!(layer.name, "ground");
        assert!(layer.visible);
        let data = layer.as_tile_layer().unwrap().data.as_ref().unwrap();
        assert_eq!(data.encoding, Some(DataEncoding::Csv));
        let grid = data.tiles().unwrap();
        assert_eq!(grid.global_tile_ids, vec![1, 2, 3, 0]);
        assert_eq!(grid.flipping_flags[2], FlippingFlags::FLIPPED_HORIZONTALLY);
    }

    #[test]
    fn test_reads_gzip_string_data() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        for gid in [7u32, 0, 3] {
            encoder.write_all(&gid.to_le_bytes()).unwrap();
        }
        let payload = STANDARD.encode(encoder.finish().unwrap());
        let layers = read_all(
            &json!({"layers": [{
                "id": 1, "type": "tilelayer", "width": 3, "height": 1,
                "encoding": "base64", "compression": "gzip", "data": payload
            }]}),
            false,
        )
        .unwrap();
        let data = layers[0].as_tile_layer().unwrap().data.as_ref().unwrap();
        assert_eq!(data.compression, Some(DataCompression::GZip));
        assert_eq!(data.tiles().unwrap().global_tile_ids, vec![7, 0, 3]);
    }

    #[test]
    fn test_empty_compression_means_none() {
        let layers = read_all(
            &json!({"layers": [{
                "id": 1, "type": "tilelayer", "width": 1, "height": 1,
                "encoding": "base64", "compression": "", "data": "AQAAAA=="
            }]}),
            false,
        )
        .unwrap();
        let data = layers[0].as_tile_layer().unwrap().data.as_ref().unwrap();
        assert_eq!(data.compression, None);
        assert_eq!(data.tiles().unwrap().global_tile_ids, vec![1]);
    }

    #[test]
    fn test_reads_chunks_for_infinite_maps() {
        let layers = read_all(
            &json!({"layers": [{
                "id": 1, "type": "tilelayer", "width": 4, "height": 2, "startx": -2, "starty": 0,
                "chunks": [
                    {"x": -2, "y": 0, "width": 2, "height": 1, "data": [1, 0]},
                    {"x": 0, "y": 0, "width": 2, "height": 1, "data": [0, 2]}
                ]
            }]}),
            true,
        )
        .unwrap();
        let data = layers[0].as_tile_layer().unwrap().data.as_ref().unwrap();
        let chunks = data.chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].x, -2);
        assert_eq!(chunks[1].tiles.global_tile_ids, vec![0, 2]);
    }

    #[test]
    fn test_group_tree_keeps_order() {
        let layers = read_all(
            &json!({"layers": [{
                "id": 1, "type": "group", "name": "outer",
                "layers": [
                    {"id": 2, "type": "tilelayer", "width": 1, "height": 1, "data": [0]},
                    {"id": 3, "type": "group", "name": "inner", "opacity": 0.5, "layers": [
                        {"id": 4, "type": "objectgroup", "draworder": "index", "objects": []}
                    ]}
                ]
            }]}),
            false,
        )
        .unwrap();
        let outer = layers[0].as_group().unwrap();
        assert_eq!(outer.layers.len(), 2);
        let inner = &outer.layers[1];
        assert_eq!(inner.opacity, 0.5);
        let objects = inner.as_group().unwrap().layers[0].as_object_layer().unwrap();
        assert_eq!(objects.draw_order, DrawOrder::Index);
    }

    #[test]
    fn test_image_layer() {
        let layers = read_all(
            &json!({"layers": [{
                "id": 7, "type": "imagelayer", "image": "sky.png", "repeatx": true, "offsetx": 3.5
            }]}),
            false,
        )
        .unwrap();
        let image = layers[0].as_image_layer().unwrap();
        assert!(image.repeat_x && !image.repeat_y);
        assert_eq!(layers[0].offset_x, 3.5);
        assert_eq!(image.image.as_ref().unwrap().source.as_deref(), Some("sky.png"));
    }

    #[test]
    fn test_unknown_layer_type_is_invalid_enum() {
        let err = read_all(&json!({"layers": [{"id": 1, "type": "hologram"}]}), false)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { ref value, .. } if value == "hologram"));
    }

    #[test]
    fn test_zstd_data_fails() {
        let err = read_all(
            &json!({"layers": [{
                "id": 1, "type": "tilelayer", "width": 1, "height": 1,
                "encoding": "base64", "compression": "zstd", "data": "KLUv/SAEIQAAAQAAAA=="
            }]}),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedCompression(DataCompression::ZStd)));
    }
}
