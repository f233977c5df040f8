use tiledmap_core::model::{
    Frame, Grid, Image, ImageFormat, Tile, TileOffset, Tileset, Transformations, WangColor,
    WangTile, Wangset,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};
use tracing::debug;

use crate::json::JsonObject;
use crate::layer::read_object_layer;

/// Read a tileset object, either embedded or a `{firstgid, source}` reference.
pub(crate) fn read_tileset(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Tileset> {
    let first_gid = obj.int::<u32>("firstgid")?;
    if let Some(source) = obj.str("source")? {
        return context.resolve_tileset(source, first_gid);
    }

    let types = context.custom_types();
    let class = obj.string("class")?;
    let tiles = obj
        .objects("tiles", "tile")?
        .into_iter()
        .map(|tile| read_tile(tile, context))
        .collect::<Result<Vec<_>>>()?;
    let wangsets = obj
        .objects("wangsets", "wangset")?
        .into_iter()
        .map(|wangset| read_wangset(wangset, context))
        .collect::<Result<Vec<_>>>()?;

    let tileset = Tileset {
        version: obj.version("version")?,
        tiled_version: obj.str("tiledversion")?.map(str::to_string),
        first_gid,
        source: None,
        name: obj.required_str("name")?.to_string(),
        tile_width: obj.required_int("tilewidth")?,
        tile_height: obj.required_int("tileheight")?,
        spacing: obj.int("spacing")?.unwrap_or(0),
        margin: obj.int("margin")?.unwrap_or(0),
        tile_count: obj.required_int("tilecount")?,
        columns: obj.required_int("columns")?,
        object_alignment: obj.literal("objectalignment")?.unwrap_or_default(),
        // Older files spell the attribute `rendersize`.
        tile_render_size: match obj.literal("tilerendersize")? {
            Some(size) => size,
            None => obj.literal("rendersize")?.unwrap_or_default(),
        },
        fill_mode: obj.literal("fillmode")?.unwrap_or_default(),
        image: read_image(&obj)?,
        tile_offset: obj
            .object("tileoffset", "tileoffset")?
            .map(|offset| {
                Ok::<_, Error>(TileOffset {
                    x: offset.float("x")?.unwrap_or(0.0),
                    y: offset.float("y")?.unwrap_or(0.0),
                })
            })
            .transpose()?,
        grid: obj
            .object("grid", "grid")?
            .map(|grid| {
                Ok::<_, Error>(Grid {
                    orientation: grid.literal("orientation")?.unwrap_or_default(),
                    width: grid.required_int("width")?,
                    height: grid.required_int("height")?,
                })
            })
            .transpose()?,
        transformations: obj
            .object("transformations", "transformations")?
            .map(read_transformations)
            .transpose()?,
        tiles,
        wangsets,
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::TILESET,
            obj.properties(types)?,
        )?,
        class,
    };
    debug!(
        name = %tileset.name,
        tiles = tileset.tiles.len(),
        "read embedded tileset"
    );
    Ok(tileset)
}

/// Read the flattened `image`/`imagewidth`/`imageheight`/`transparentcolor`
/// fields shared by tilesets, tiles and image layers.
pub(crate) fn read_image(obj: &JsonObject<'_>) -> Result<Option<Image>> {
    let Some(source) = obj.non_empty("image")? else {
        return Ok(None);
    };
    Ok(Some(Image {
        format: ImageFormat::from_source(source),
        source: Some(source.to_string()),
        transparent_color: obj.color("transparentcolor")?,
        width: obj.int("imagewidth")?,
        height: obj.int("imageheight")?,
    }))
}

fn read_transformations(obj: JsonObject<'_>) -> Result<Transformations> {
    Ok(Transformations {
        hflip: obj.bool("hflip")?.unwrap_or(false),
        vflip: obj.bool("vflip")?.unwrap_or(false),
        rotate: obj.bool("rotate")?.unwrap_or(false),
        prefer_untransformed: obj.bool("preferuntransformed")?.unwrap_or(false),
    })
}

fn read_tile(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Tile> {
    let types = context.custom_types();
    let image = read_image(&obj)?;
    let object_layer = obj
        .object("objectgroup", "objectgroup")?
        .map(|group| read_object_layer(group, context, group.int("id")?.unwrap_or(0)))
        .transpose()?;
    let animation = obj
        .objects("animation", "frame")?
        .into_iter()
        .map(|frame| {
            Ok(Frame {
                tile_id: frame.required_int("tileid")?,
                duration: frame.required_int("duration")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let class = match obj.non_empty("class")? {
        Some(class) => class.to_string(),
        None => obj.string("type")?,
    };

    Ok(Tile {
        id: obj.required_int("id")?,
        probability: obj.float("probability")?.unwrap_or(0.0),
        x: obj.int("x")?.unwrap_or(0),
        y: obj.int("y")?.unwrap_or(0),
        width: obj
            .int("width")?
            .or_else(|| image.as_ref().and_then(|image| image.width))
            .unwrap_or(0),
        height: obj
            .int("height")?
            .or_else(|| image.as_ref().and_then(|image| image.height))
            .unwrap_or(0),
        image,
        object_layer,
        animation,
        properties: types.entity_properties(&class, CustomClassUseAs::TILE, obj.properties(types)?)?,
        class,
    })
}

fn read_wangset(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Wangset> {
    let types = context.custom_types();
    let colors = obj
        .objects("colors", "wangcolor")?
        .into_iter()
        .map(|color| read_wang_color(color, context))
        .collect::<Result<Vec<_>>>()?;
    let wang_tiles = obj
        .objects("wangtiles", "wangtile")?
        .into_iter()
        .map(read_wang_tile)
        .collect::<Result<Vec<_>>>()?;
    let class = obj.string("class")?;
    let properties =
        types.entity_properties(&class, CustomClassUseAs::WANGSET, obj.properties(types)?)?;

    Wangset::new(
        obj.required_str("name")?.to_string(),
        class,
        obj.literal("type")?.unwrap_or_default(),
        obj.required_int("tile")?,
        colors,
        wang_tiles,
        properties,
    )
}

fn read_wang_color(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<WangColor> {
    let types = context.custom_types();
    let class = obj.string("class")?;
    Ok(WangColor {
        name: obj.required_str("name")?.to_string(),
        color: obj.required_str("color")?.parse()?,
        tile: obj.required_int("tile")?,
        probability: obj.float("probability")?.unwrap_or(0.0),
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::WANG_COLOR,
            obj.properties(types)?,
        )?,
        class,
    })
}

fn read_wang_tile(obj: JsonObject<'_>) -> Result<WangTile> {
    let wang_id = obj
        .array("wangid")?
        .iter()
        .map(|index| {
            index
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| Error::format("wang id index", index.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    if wang_id.is_empty() && obj.get("wangid").is_none() {
        return Err(Error::missing(obj.element, "wangid"));
    }
    WangTile::new(obj.required_int("tileid")?, wang_id)
}
