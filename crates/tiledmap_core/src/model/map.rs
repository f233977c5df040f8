use crate::literal::literal_enum;
use crate::model::{Color, GID_MASK, Layer, Tileset};
use crate::properties::Properties;

literal_enum! {
    pub enum MapOrientation {
        Orthogonal => "orthogonal",
        Isometric => "isometric",
        Staggered => "staggered",
        Hexagonal => "hexagonal",
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum RenderOrder {
        #[default]
        RightDown => "right-down",
        RightUp => "right-up",
        LeftDown => "left-down",
        LeftUp => "left-up",
    }
}

literal_enum! {
    pub enum StaggerAxis {
        X => "x",
        Y => "y",
    }
}

literal_enum! {
    pub enum StaggerIndex {
        Odd => "odd",
        Even => "even",
    }
}

/// A fully resolved map: every external tileset and template is inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub version: String,
    pub tiled_version: Option<String>,
    pub class: String,
    pub orientation: MapOrientation,
    pub render_order: RenderOrder,
    /// -1 means the compressor's default level.
    pub compression_level: i32,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub hex_side_length: Option<u32>,
    pub stagger_axis: Option<StaggerAxis>,
    pub stagger_index: Option<StaggerIndex>,
    pub parallax_origin_x: f32,
    pub parallax_origin_y: f32,
    pub background_color: Option<Color>,
    pub next_layer_id: u32,
    pub next_object_id: u32,
    pub infinite: bool,
    pub properties: Properties,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
}

impl Map {
    /// The tileset whose first-gid range contains `gid`.
    ///
    /// Flipping bits are stripped first, so raw GIDs are accepted too.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|tileset| tileset.first_gid.is_some_and(|first| first <= gid))
            .max_by_key(|tileset| tileset.first_gid)
    }

    /// Every layer, depth-first through groups.
    pub fn all_layers(&self) -> Vec<&Layer> {
        self.layers.iter().flat_map(Layer::walk).collect()
    }
}
