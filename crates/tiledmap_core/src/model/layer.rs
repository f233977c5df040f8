use crate::literal::literal_enum;
use crate::model::{Color, Data, FlippingFlags, Image, Object};
use crate::properties::Properties;

literal_enum! {
    #[derive(Default)]
    pub enum DrawOrder {
        #[default]
        TopDown => "topdown",
        Index => "index",
    }
}

/// A layer of any kind plus the attributes every kind shares.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub opacity: f32,
    pub visible: bool,
    pub tint_color: Option<Color>,
    pub offset_x: f32,
    pub offset_y: f32,
    pub parallax_x: f32,
    pub parallax_y: f32,
    pub properties: Properties,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Tiles(TileLayer),
    Objects(ObjectLayer),
    Image(ImageLayer),
    Group(GroupLayer),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileLayer {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub data: Option<Data>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLayer {
    pub x: i32,
    pub y: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: Option<Color>,
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageLayer {
    pub x: i32,
    pub y: i32,
    pub image: Option<Image>,
    pub repeat_x: bool,
    pub repeat_y: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLayer {
    pub layers: Vec<Layer>,
}

impl Layer {
    /// A layer with the documented attribute defaults.
    pub fn new(id: u32, kind: LayerKind) -> Self {
        Self {
            id,
            name: String::new(),
            class: String::new(),
            opacity: 1.0,
            visible: true,
            tint_color: None,
            offset_x: 0.0,
            offset_y: 0.0,
            parallax_x: 1.0,
            parallax_y: 1.0,
            properties: Properties::new(),
            kind,
        }
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match &self.kind {
            LayerKind::Tiles(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_object_layer(&self) -> Option<&ObjectLayer> {
        match &self.kind {
            LayerKind::Objects(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_image_layer(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupLayer> {
        match &self.kind {
            LayerKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Depth-first walk over this layer and all nested children.
    pub fn walk(&self) -> Vec<&Layer> {
        let mut out = vec![self];
        if let LayerKind::Group(group) = &self.kind {
            for child in &group.layers {
                out.extend(child.walk());
            }
        }
        out
    }
}

impl TileLayer {
    /// The cell at `(x, y)` of a finite layer.
    pub fn get(&self, x: u32, y: u32) -> Option<(u32, FlippingFlags)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.as_ref()?.get(x, y, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataContent, DataEncoding, TileGrid};

    #[test]
    fn test_new_layer_uses_documented_defaults() {
        let layer = Layer::new(3, LayerKind::Group(GroupLayer::default()));
        assert_eq!(layer.opacity, 1.0);
        assert!(layer.visible);
        assert_eq!(layer.parallax_x, 1.0);
        assert_eq!(layer.parallax_y, 1.0);
        assert_eq!(layer.offset_x, 0.0);
        assert!(layer.as_group().is_some());
        assert!(layer.as_tile_layer().is_none());
    }

    #[test]
    fn test_walk_is_depth_first() {
        let inner = Layer::new(3, LayerKind::Objects(ObjectLayer::default()));
        let nested = Layer::new(
            2,
            LayerKind::Group(GroupLayer {
                layers: vec![inner],
            }),
        );
        let tiles = Layer::new(4, LayerKind::Tiles(TileLayer::default()));
        let root = Layer::new(
            1,
            LayerKind::Group(GroupLayer {
                layers: vec![nested, tiles],
            }),
        );

        let ids: Vec<u32> = root.walk().iter().map(|layer| layer.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_tile_layer_get() {
        let layer = TileLayer {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            data: Some(Data {
                encoding: Some(DataEncoding::Csv),
                compression: None,
                content: DataContent::Flat(TileGrid::from_raw(&[1, 2, 3, 0x8000_0004])),
            }),
        };
        assert_eq!(layer.get(0, 1), Some((3, FlippingFlags::empty())));
        assert_eq!(
            layer.get(1, 1),
            Some((4, FlippingFlags::FLIPPED_HORIZONTALLY))
        );
        assert_eq!(layer.get(2, 0), None);
    }

    #[test]
    fn test_tile_layer_get_with_huge_dimensions_does_not_overflow() {
        let layer = TileLayer {
            x: 0,
            y: 0,
            width: u32::MAX,
            height: u32::MAX,
            data: Some(Data {
                encoding: Some(DataEncoding::Csv),
                compression: None,
                content: DataContent::Flat(TileGrid::from_raw(&[7])),
            }),
        };
        assert_eq!(layer.get(0, 0), Some((7, FlippingFlags::empty())));
        assert_eq!(layer.get(u32::MAX - 1, u32::MAX - 1), None);
    }
}
