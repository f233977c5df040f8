use crate::literal::literal_enum;
use crate::model::{Color, FlippingFlags};
use crate::properties::Properties;

literal_enum! {
    #[derive(Default)]
    pub enum HorizontalAlignment {
        #[default]
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum VerticalAlignment {
        #[default]
        Top => "top",
        Center => "center",
        Bottom => "bottom",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub font_family: String,
    pub pixel_size: u32,
    pub wrap: bool,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub kerning: bool,
    pub halign: HorizontalAlignment,
    pub valign: VerticalAlignment,
    pub content: String,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            pixel_size: 16,
            wrap: false,
            color: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            kerning: true,
            halign: HorizontalAlignment::default(),
            valign: VerticalAlignment::default(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ObjectKind {
    #[default]
    Rectangle,
    Ellipse,
    Point,
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    Text(Text),
    Tile {
        gid: u32,
        flipping_flags: FlippingFlags,
    },
}

/// A placed object, after template defaults have been merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// 0 for objects that were never assigned an id (template objects).
    pub id: u32,
    pub name: String,
    pub class: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub visible: bool,
    /// The template this object was placed from.
    pub template: Option<String>,
    pub kind: ObjectKind,
    pub properties: Properties,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            class: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            template: None,
            kind: ObjectKind::default(),
            properties: Properties::new(),
        }
    }
}

/// Fields an object element sets explicitly.
///
/// Everything left `None` falls back to the template object, then to the
/// [`Object`] defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectFields {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub visible: Option<bool>,
    pub template: Option<String>,
    pub kind: Option<ObjectKind>,
    pub properties: Properties,
}

impl ObjectFields {
    /// Overlay these fields on `base`; explicit values win per field and
    /// properties merge key-wise.
    pub fn into_object(self, base: Option<Object>) -> Object {
        let base = base.unwrap_or_default();
        let mut properties = base.properties;
        properties.extend(self.properties);

        Object {
            id: self.id.unwrap_or(base.id),
            name: self.name.unwrap_or(base.name),
            class: self.class.unwrap_or(base.class),
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            rotation: self.rotation.unwrap_or(base.rotation),
            visible: self.visible.unwrap_or(base.visible),
            template: self.template.or(base.template),
            kind: self.kind.unwrap_or(base.kind),
            properties,
        }
    }
}
