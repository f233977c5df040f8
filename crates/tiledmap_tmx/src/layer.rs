use tiledmap_core::encoding::decode_tile_data;
use tiledmap_core::model::{
    Chunk, Data, DataCompression, DataContent, DataEncoding, GroupLayer, ImageLayer, Layer,
    LayerKind, ObjectLayer, TileGrid, TileLayer,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{ReadContext, Result};
use tracing::trace;

use crate::object::read_object;
use crate::properties::read_child_properties;
use crate::tileset::read_image;
use crate::xml::Element;

/// Read the layer children of a `<map>` or `<group>`, in document order.
pub(crate) fn read_layers(
    parent: &Element,
    context: &ReadContext<'_>,
    infinite: bool,
) -> Result<Vec<Layer>> {
    let mut layers = Vec::new();
    for child in &parent.children {
        let layer = match child.name.as_str() {
            "layer" => read_tile_layer(child, context, infinite)?,
            "objectgroup" => read_object_layer(child, context, child.parse_required("id")?)?,
            "imagelayer" => read_image_layer(child, context)?,
            "group" => read_group(child, context, infinite)?,
            "properties" | "tileset" => continue,
            other => {
                trace!(element = other, parent = %parent.name, "skipping non-layer element");
                continue;
            }
        };
        layers.push(layer);
    }
    Ok(layers)
}

/// Attributes shared by every layer kind.
fn layer(el: &Element, context: &ReadContext<'_>, id: u32, kind: LayerKind) -> Result<Layer> {
    let types = context.custom_types();
    let class = el.attr("class").unwrap_or_default().to_string();
    Ok(Layer {
        id,
        name: el.attr("name").unwrap_or_default().to_string(),
        opacity: el.parse("opacity")?.unwrap_or(1.0),
        visible: el.flag("visible")?.unwrap_or(true),
        tint_color: el.color("tintcolor")?,
        offset_x: el.parse("offsetx")?.unwrap_or(0.0),
        offset_y: el.parse("offsety")?.unwrap_or(0.0),
        parallax_x: el.parse("parallaxx")?.unwrap_or(1.0),
        parallax_y: el.parse("parallaxy")?.unwrap_or(1.0),
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::LAYER,
            read_child_properties(el, types)?,
        )?,
        class,
        kind,
    })
}

fn read_tile_layer(el: &Element, context: &ReadContext<'_>, infinite: bool) -> Result<Layer> {
    let tiles = TileLayer {
        x: el.parse("x")?.unwrap_or(0),
        y: el.parse("y")?.unwrap_or(0),
        width: el.parse_required("width")?,
        height: el.parse_required("height")?,
        data: el
            .at_most_one("data")?
            .map(|data| read_data(data, infinite))
            .transpose()?,
    };
    layer(el, context, el.parse_required("id")?, LayerKind::Tiles(tiles))
}

/// Read an `<objectgroup>`. Collision groups inside tiles may omit `id`, so
/// the caller supplies it.
pub(crate) fn read_object_layer(el: &Element, context: &ReadContext<'_>, id: u32) -> Result<Layer> {
    let mut objects = Vec::new();
    for child in &el.children {
        match child.name.as_str() {
            "object" => objects.push(read_object(child, context)?),
            "properties" => {}
            other => trace!(element = other, "skipping unknown element in <objectgroup>"),
        }
    }
    let objects_layer = ObjectLayer {
        x: el.parse("x")?.unwrap_or(0),
        y: el.parse("y")?.unwrap_or(0),
        width: el.parse("width")?,
        height: el.parse("height")?,
        color: el.color("color")?,
        draw_order: el.literal("draworder")?.unwrap_or_default(),
        objects,
    };
    layer(el, context, id, LayerKind::Objects(objects_layer))
}

fn read_image_layer(el: &Element, context: &ReadContext<'_>) -> Result<Layer> {
    let image = ImageLayer {
        x: el.parse("x")?.unwrap_or(0),
        y: el.parse("y")?.unwrap_or(0),
        image: el.at_most_one("image")?.map(read_image).transpose()?,
        repeat_x: el.flag("repeatx")?.unwrap_or(false),
        repeat_y: el.flag("repeaty")?.unwrap_or(false),
    };
    layer(el, context, el.parse_required("id")?, LayerKind::Image(image))
}

fn read_group(el: &Element, context: &ReadContext<'_>, infinite: bool) -> Result<Layer> {
    let group = GroupLayer {
        layers: read_layers(el, context, infinite)?,
    };
    layer(el, context, el.parse_required("id")?, LayerKind::Group(group))
}

/// Read a `<data>` element. Infinite maps store their cells in `<chunk>`s.
pub(crate) fn read_data(el: &Element, chunked: bool) -> Result<Data> {
    let encoding = el.literal::<DataEncoding>("encoding")?;
    let compression = el.literal::<DataCompression>("compression")?;

    let content = if chunked {
        let chunks = el
            .children
            .iter()
            .filter(|child| child.name == "chunk")
            .map(|chunk| {
                Ok(Chunk {
                    x: chunk.parse_required("x")?,
                    y: chunk.parse_required("y")?,
                    width: chunk.parse_required("width")?,
                    height: chunk.parse_required("height")?,
                    tiles: read_cells(chunk, encoding, compression)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        DataContent::Chunked(chunks)
    } else {
        DataContent::Flat(read_cells(el, encoding, compression)?)
    };

    Ok(Data {
        encoding,
        compression,
        content,
    })
}

/// Decode the cells of a `<data>` or `<chunk>`: an encoded text payload, or
/// one `<tile gid>` child per cell when no encoding is given.
fn read_cells(
    el: &Element,
    encoding: Option<DataEncoding>,
    compression: Option<DataCompression>,
) -> Result<TileGrid> {
    match encoding {
        Some(encoding) => decode_tile_data(&el.text, encoding, compression),
        None => {
            let raw = el
                .children
                .iter()
                .filter(|child| child.name == "tile")
                .map(|tile| Ok(tile.parse::<u32>("gid")?.unwrap_or(0)))
                .collect::<Result<Vec<_>>>()?;
            Ok(TileGrid::from_raw(&raw))
        }
    }
}
