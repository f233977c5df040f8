use tiledmap_core::error::set_at_most_once;
use tiledmap_core::model::{
    Object, ObjectFields, ObjectKind, Point, Template, Text, split_gid,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};
use tracing::debug;

use crate::json::JsonObject;
use crate::tileset::read_tileset;

/// Read an object, merging in its template when it has one.
///
/// Empty `name`/`class` strings count as unset so that template values show
/// through, matching the XML writer which omits empty attributes.
pub(crate) fn read_object(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Object> {
    let types = context.custom_types();
    let template = obj.str("template")?.map(str::to_string);
    let base = match &template {
        Some(source) => Some(context.resolve_template(source)?.object),
        None => None,
    };

    let class = match obj.non_empty("class")? {
        Some(class) => Some(class),
        None => obj.non_empty("type")?,
    };
    let fields = ObjectFields {
        id: obj.int("id")?,
        name: obj.non_empty("name")?.map(str::to_string),
        class: class.map(str::to_string),
        x: obj.float("x")?,
        y: obj.float("y")?,
        width: obj.float("width")?,
        height: obj.float("height")?,
        rotation: obj.float("rotation")?,
        visible: obj.bool("visible")?,
        template,
        kind: read_kind(&obj)?,
        properties: obj.properties(types)?,
    };

    let mut object = fields.into_object(base);
    object.properties = types.entity_properties(
        &object.class,
        CustomClassUseAs::OBJECT,
        std::mem::take(&mut object.properties),
    )?;
    Ok(object)
}

/// The explicit shape of an object. At most one shape flag may be set.
fn read_kind(obj: &JsonObject<'_>) -> Result<Option<ObjectKind>> {
    let mut kind = None;
    if obj.bool("ellipse")?.unwrap_or(false) {
        set_at_most_once(&mut kind, ObjectKind::Ellipse, "object", "ellipse")?;
    }
    if obj.bool("point")?.unwrap_or(false) {
        set_at_most_once(&mut kind, ObjectKind::Point, "object", "point")?;
    }
    if obj.get("polygon").is_some() {
        let points = read_points(obj, "polygon")?;
        set_at_most_once(&mut kind, ObjectKind::Polygon(points), "object", "polygon")?;
    }
    if obj.get("polyline").is_some() {
        let points = read_points(obj, "polyline")?;
        set_at_most_once(&mut kind, ObjectKind::Polyline(points), "object", "polyline")?;
    }
    if let Some(text) = obj.object("text", "text")? {
        set_at_most_once(&mut kind, ObjectKind::Text(read_text(text)?), "object", "text")?;
    }

    if kind.is_none()
        && let Some(raw) = obj.int::<u32>("gid")?
    {
        let (gid, flipping_flags) = split_gid(raw);
        kind = Some(ObjectKind::Tile {
            gid,
            flipping_flags,
        });
    }
    Ok(kind)
}

fn read_points(obj: &JsonObject<'_>, key: &str) -> Result<Vec<Point>> {
    obj.objects(key, "point")?
        .into_iter()
        .map(|point| {
            Ok(Point {
                x: point.float("x")?.ok_or_else(|| Error::missing("point", "x"))?,
                y: point.float("y")?.ok_or_else(|| Error::missing("point", "y"))?,
            })
        })
        .collect()
}

fn read_text(obj: JsonObject<'_>) -> Result<Text> {
    let defaults = Text::default();
    Ok(Text {
        font_family: obj
            .str("fontfamily")?
            .map_or(defaults.font_family, str::to_string),
        pixel_size: obj.int("pixelsize")?.unwrap_or(defaults.pixel_size),
        wrap: obj.bool("wrap")?.unwrap_or(defaults.wrap),
        color: obj.color("color")?.unwrap_or(defaults.color),
        bold: obj.bool("bold")?.unwrap_or(defaults.bold),
        italic: obj.bool("italic")?.unwrap_or(defaults.italic),
        underline: obj.bool("underline")?.unwrap_or(defaults.underline),
        strikeout: obj.bool("strikeout")?.unwrap_or(defaults.strikeout),
        kerning: obj.bool("kerning")?.unwrap_or(defaults.kerning),
        halign: obj.literal("halign")?.unwrap_or(defaults.halign),
        valign: obj.literal("valign")?.unwrap_or(defaults.valign),
        content: obj.string("text")?,
    })
}

/// Read a template document.
pub(crate) fn read_template(obj: JsonObject<'_>, context: &ReadContext<'_>) -> Result<Template> {
    obj.expect_type("template")?;
    let tileset = obj
        .object("tileset", "tileset")?
        .map(|tileset| read_tileset(tileset, context))
        .transpose()?;
    let object = obj
        .object("object", "object")?
        .ok_or_else(|| Error::malformed("template has no object"))?;
    let object = read_object(object, context)?;
    debug!(name = %object.name, "read object template");
    Ok(Template { tileset, object })
}
