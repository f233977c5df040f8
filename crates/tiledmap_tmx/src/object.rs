use tiledmap_core::model::{
    Object, ObjectFields, ObjectKind, Point, Template, Text, split_gid,
};
use tiledmap_core::properties::CustomClassUseAs;
use tiledmap_core::{Error, ReadContext, Result};
use tracing::{debug, trace};

use crate::properties::read_child_properties;
use crate::tileset::read_tileset;
use crate::xml::Element;

/// Read an `<object>`, merging in its template when it has one.
pub(crate) fn read_object(el: &Element, context: &ReadContext<'_>) -> Result<Object> {
    let types = context.custom_types();
    let template = el.attr("template").map(str::to_string);
    let base = match &template {
        Some(source) => Some(context.resolve_template(source)?.object),
        None => None,
    };

    let fields = ObjectFields {
        id: el.parse("id")?,
        name: el.attr("name").map(str::to_string),
        // Tiled 1.9 renamed `type` to `class`.
        class: el.attr("class").or_else(|| el.attr("type")).map(str::to_string),
        x: el.parse("x")?,
        y: el.parse("y")?,
        width: el.parse("width")?,
        height: el.parse("height")?,
        rotation: el.parse("rotation")?,
        visible: el.flag("visible")?,
        template,
        kind: read_kind(el)?,
        properties: read_child_properties(el, types)?,
    };

    let mut object = fields.into_object(base);
    object.properties = types.entity_properties(
        &object.class,
        CustomClassUseAs::OBJECT,
        std::mem::take(&mut object.properties),
    )?;
    Ok(object)
}

/// The explicit shape of an object, if the element states one.
fn read_kind(el: &Element) -> Result<Option<ObjectKind>> {
    let mut kind = None;
    for child in &el.children {
        let shape = match child.name.as_str() {
            "ellipse" => ObjectKind::Ellipse,
            "point" => ObjectKind::Point,
            "polygon" => ObjectKind::Polygon(read_points(child)?),
            "polyline" => ObjectKind::Polyline(read_points(child)?),
            "text" => ObjectKind::Text(read_text(child)?),
            "properties" => continue,
            other => {
                trace!(element = other, "skipping unknown element in <object>");
                continue;
            }
        };
        if kind.is_some() {
            return Err(Error::duplicate("object", &child.name));
        }
        kind = Some(shape);
    }

    if kind.is_none()
        && let Some(raw) = el.parse::<u32>("gid")?
    {
        let (gid, flipping_flags) = split_gid(raw);
        kind = Some(ObjectKind::Tile {
            gid,
            flipping_flags,
        });
    }
    Ok(kind)
}

fn read_points(el: &Element) -> Result<Vec<Point>> {
    let raw = el.required("points")?;
    raw.split_whitespace()
        .map(|pair| {
            let invalid = || Error::format("point", pair);
            let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
            Ok(Point {
                x: x.parse().map_err(|_| invalid())?,
                y: y.parse().map_err(|_| invalid())?,
            })
        })
        .collect()
}

fn read_text(el: &Element) -> Result<Text> {
    let defaults = Text::default();
    Ok(Text {
        font_family: el
            .attr("fontfamily")
            .map_or(defaults.font_family, str::to_string),
        pixel_size: el.parse("pixelsize")?.unwrap_or(defaults.pixel_size),
        wrap: el.flag("wrap")?.unwrap_or(defaults.wrap),
        color: el.color("color")?.unwrap_or(defaults.color),
        bold: el.flag("bold")?.unwrap_or(defaults.bold),
        italic: el.flag("italic")?.unwrap_or(defaults.italic),
        underline: el.flag("underline")?.unwrap_or(defaults.underline),
        strikeout: el.flag("strikeout")?.unwrap_or(defaults.strikeout),
        kerning: el.flag("kerning")?.unwrap_or(defaults.kerning),
        halign: el.literal("halign")?.unwrap_or(defaults.halign),
        valign: el.literal("valign")?.unwrap_or(defaults.valign),
        content: el.text.clone(),
    })
}

/// Read a `<template>` document root.
pub(crate) fn read_template(el: &Element, context: &ReadContext<'_>) -> Result<Template> {
    el.expect_name("template")?;
    let tileset = el
        .at_most_one("tileset")?
        .map(|tileset| read_tileset(tileset, context))
        .transpose()?;
    let object = el
        .at_most_one("object")?
        .ok_or_else(|| Error::malformed("<template> has no <object>"))?;
    let object = read_object(object, context)?;
    debug!(name = %object.name, "read object template");
    Ok(Template { tileset, object })
}
