use crate::literal::literal_enum;
use crate::model::{Color, Layer, Wangset};
use crate::properties::Properties;

literal_enum! {
    /// Anchor point used when placing tile objects.
    #[derive(Default)]
    pub enum ObjectAlignment {
        #[default]
        Unspecified => "unspecified",
        TopLeft => "topleft",
        Top => "top",
        TopRight => "topright",
        Left => "left",
        Center => "center",
        Right => "right",
        BottomLeft => "bottomleft",
        Bottom => "bottom",
        BottomRight => "bottomright",
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum TileRenderSize {
        #[default]
        Tile => "tile",
        Grid => "grid",
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum FillMode {
        #[default]
        Stretch => "stretch",
        PreserveAspectFit => "preserve-aspect-fit",
    }
}

literal_enum! {
    pub enum ImageFormat {
        Png => "png",
        Jpg => "jpg",
        Bmp => "bmp",
        Gif => "gif",
    }
}

impl ImageFormat {
    /// Infer the format from a source path's extension.
    pub fn from_source(source: &str) -> Option<Self> {
        let (_, extension) = source.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

literal_enum! {
    #[derive(Default)]
    pub enum GridOrientation {
        #[default]
        Orthogonal => "orthogonal",
        Isometric => "isometric",
    }
}

/// A referenced image. Pixels are never decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub format: Option<ImageFormat>,
    pub source: Option<String>,
    pub transparent_color: Option<Color>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileOffset {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub orientation: GridOrientation,
    pub width: u32,
    pub height: u32,
}

/// Transformations allowed when painting tiles from this tileset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transformations {
    pub hflip: bool,
    pub vflip: bool,
    pub rotate: bool,
    pub prefer_untransformed: bool,
}

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub tile_id: u32,
    /// Milliseconds.
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: u32,
    pub class: String,
    pub probability: f32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub image: Option<Image>,
    /// Collision shapes, stored as an object layer.
    pub object_layer: Option<Layer>,
    pub animation: Vec<Frame>,
    pub properties: Properties,
}

impl Tile {
    pub fn is_animated(&self) -> bool {
        !self.animation.is_empty()
    }
}

/// A tileset after reference resolution.
///
/// `first_gid` and `source` are set by the referencing map, never by the
/// tileset document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub version: Option<String>,
    pub tiled_version: Option<String>,
    pub first_gid: Option<u32>,
    pub source: Option<String>,
    pub name: String,
    pub class: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub object_alignment: ObjectAlignment,
    pub tile_render_size: TileRenderSize,
    pub fill_mode: FillMode,
    pub image: Option<Image>,
    pub tile_offset: Option<TileOffset>,
    pub grid: Option<Grid>,
    pub transformations: Option<Transformations>,
    pub tiles: Vec<Tile>,
    pub wangsets: Vec<Wangset>,
    pub properties: Properties,
}

impl Tileset {
    /// The explicitly described tile with local id `id`, if any.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    /// Whether a cleared GID falls inside this tileset's range.
    pub fn contains_gid(&self, gid: u32) -> bool {
        match self.first_gid {
            Some(first) => gid >= first && gid - first < self.tile_count,
            None => false,
        }
    }

    /// Local tile id for a cleared GID.
    pub fn local_id(&self, gid: u32) -> Option<u32> {
        self.contains_gid(gid)
            .then(|| gid - self.first_gid.unwrap_or_default())
    }
}
