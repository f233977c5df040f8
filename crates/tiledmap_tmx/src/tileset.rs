use tiledmap_core::model::{
    Frame, Grid, Image, ImageFormat, Tile, TileOffset, Tileset, Transformations, WangColor,
    WangTile, Wangset,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};
use tracing::{debug, trace};

use crate::layer::read_object_layer;
use crate::properties::read_child_properties;
use crate::xml::Element;

/// Read a `<tileset>`, either embedded or an external `source` reference.
pub(crate) fn read_tileset(el: &Element, context: &ReadContext<'_>) -> Result<Tileset> {
    el.expect_name("tileset")?;
    let first_gid = el.parse::<u32>("firstgid")?;
    if let Some(source) = el.attr("source") {
        return context.resolve_tileset(source, first_gid);
    }

    let types = context.custom_types();
    let class = el.attr("class").unwrap_or_default().to_string();
    let mut tiles = Vec::new();
    let mut wangsets = Vec::new();
    for child in &el.children {
        match child.name.as_str() {
            "tile" => tiles.push(read_tile(child, context)?),
            "image" | "tileoffset" | "grid" | "properties" | "transformations" | "wangsets" => {}
            other => trace!(element = other, "skipping unknown element in <tileset>"),
        }
    }
    if let Some(block) = el.at_most_one("wangsets")? {
        for child in &block.children {
            match child.name.as_str() {
                "wangset" => wangsets.push(read_wangset(child, context)?),
                other => trace!(element = other, "skipping unknown element in <wangsets>"),
            }
        }
    }

    let tileset = Tileset {
        version: el.attr("version").map(str::to_string),
        tiled_version: el.attr("tiledversion").map(str::to_string),
        first_gid,
        source: None,
        name: el.required("name")?.to_string(),
        tile_width: el.parse_required("tilewidth")?,
        tile_height: el.parse_required("tileheight")?,
        spacing: el.parse("spacing")?.unwrap_or(0),
        margin: el.parse("margin")?.unwrap_or(0),
        tile_count: el.parse_required("tilecount")?,
        columns: el.parse_required("columns")?,
        object_alignment: el.literal("objectalignment")?.unwrap_or_default(),
        // Older files spell the attribute `rendersize`.
        tile_render_size: match el.literal("tilerendersize")? {
            Some(size) => size,
            None => el.literal("rendersize")?.unwrap_or_default(),
        },
        fill_mode: el.literal("fillmode")?.unwrap_or_default(),
        image: el.at_most_one("image")?.map(read_image).transpose()?,
        tile_offset: el.at_most_one("tileoffset")?.map(read_tile_offset).transpose()?,
        grid: el.at_most_one("grid")?.map(read_grid).transpose()?,
        transformations: el
            .at_most_one("transformations")?
            .map(read_transformations)
            .transpose()?,
        tiles,
        wangsets,
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::TILESET,
            read_child_properties(el, types)?,
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

pub(crate) fn read_image(el: &Element) -> Result<Image> {
    if el.at_most_one("data")?.is_some() {
        return Err(Error::malformed("embedded image data is not supported"));
    }
    let source = el.attr("source").map(str::to_string);
    let format = match el.literal::<ImageFormat>("format")? {
        Some(format) => Some(format),
        None => source.as_deref().and_then(ImageFormat::from_source),
    };
    Ok(Image {
        format,
        source,
        transparent_color: el.color("trans")?,
        width: el.parse("width")?,
        height: el.parse("height")?,
    })
}

fn read_tile_offset(el: &Element) -> Result<TileOffset> {
    Ok(TileOffset {
        x: el.parse("x")?.unwrap_or(0.0),
        y: el.parse("y")?.unwrap_or(0.0),
    })
}

fn read_grid(el: &Element) -> Result<Grid> {
    Ok(Grid {
        orientation: el.literal("orientation")?.unwrap_or_default(),
        width: el.parse_required("width")?,
        height: el.parse_required("height")?,
    })
}

fn read_transformations(el: &Element) -> Result<Transformations> {
    Ok(Transformations {
        hflip: el.flag("hflip")?.unwrap_or(false),
        vflip: el.flag("vflip")?.unwrap_or(false),
        rotate: el.flag("rotate")?.unwrap_or(false),
        prefer_untransformed: el.flag("preferuntransformed")?.unwrap_or(false),
    })
}

fn read_tile(el: &Element, context: &ReadContext<'_>) -> Result<Tile> {
    let types = context.custom_types();
    let image = el.at_most_one("image")?.map(read_image).transpose()?;
    let object_layer = el
        .at_most_one("objectgroup")?
        .map(|group| read_object_layer(group, context, group.parse("id")?.unwrap_or(0)))
        .transpose()?;
    let animation = match el.at_most_one("animation")? {
        Some(animation) => read_animation(animation)?,
        None => Vec::new(),
    };
    // Tiled 1.9 renamed the tile `type` attribute to `class`.
    let class = el
        .attr("class")
        .or_else(|| el.attr("type"))
        .unwrap_or_default()
        .to_string();

    Ok(Tile {
        id: el.parse_required("id")?,
        probability: el.parse("probability")?.unwrap_or(0.0),
        x: el.parse("x")?.unwrap_or(0),
        y: el.parse("y")?.unwrap_or(0),
        width: el
            .parse("width")?
            .or_else(|| image.as_ref().and_then(|image| image.width))
            .unwrap_or(0),
        height: el
            .parse("height")?
            .or_else(|| image.as_ref().and_then(|image| image.height))
            .unwrap_or(0),
        image,
        object_layer,
        animation,
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::TILE,
            read_child_properties(el, types)?,
        )?,
        class,
    })
}

fn read_animation(el: &Element) -> Result<Vec<Frame>> {
    el.children
        .iter()
        .filter(|child| child.name == "frame")
        .map(|frame| {
            Ok(Frame {
                tile_id: frame.parse_required("tileid")?,
                duration: frame.parse_required("duration")?,
            })
        })
        .collect()
}

fn read_wangset(el: &Element, context: &ReadContext<'_>) -> Result<Wangset> {
    let types = context.custom_types();
    let mut colors = Vec::new();
    let mut wang_tiles = Vec::new();
    for child in &el.children {
        match child.name.as_str() {
            "wangcolor" => colors.push(read_wang_color(child, context)?),
            "wangtile" => wang_tiles.push(read_wang_tile(child)?),
            "properties" => {}
            other => trace!(element = other, "skipping unknown element in <wangset>"),
        }
    }
    let class = el.attr("class").unwrap_or_default().to_string();
    let properties = types.entity_properties(
        &class,
        CustomClassUseAs::WANGSET,
        read_child_properties(el, types)?,
    )?;

    Wangset::new(
        el.required("name")?.to_string(),
        class,
        el.literal("type")?.unwrap_or_default(),
        el.parse_required("tile")?,
        colors,
        wang_tiles,
        properties,
    )
}

fn read_wang_color(el: &Element, context: &ReadContext<'_>) -> Result<WangColor> {
    let types = context.custom_types();
    let class = el.attr("class").unwrap_or_default().to_string();
    Ok(WangColor {
        name: el.required("name")?.to_string(),
        color: el.required("color")?.parse()?,
        tile: el.parse_required("tile")?,
        probability: el.parse("probability")?.unwrap_or(0.0),
        properties: types.entity_properties(
            &class,
            CustomClassUseAs::WANG_COLOR,
            read_child_properties(el, types)?,
        )?,
        class,
    })
}

fn read_wang_tile(el: &Element) -> Result<WangTile> {
    let raw = el.required("wangid")?;
    let wang_id = raw
        .split(',')
        .map(|index| {
            index
                .trim()
                .parse::<u8>()
                .map_err(|_| Error::format("wang id index", index))
        })
        .collect::<Result<Vec<_>>>()?;
    WangTile::new(el.parse_required("tileid")?, wang_id)
}
