//! The unified document model produced by both readers.
//!
//! Every type here derives `PartialEq` so a map read from XML can be
//! compared directly against the same map read from JSON.

mod color;
mod data;
mod layer;
mod map;
mod object;
mod template;
mod tileset;
mod wangset;

pub use color::Color;
pub use data::{
    Chunk, Data, DataCompression, DataContent, DataEncoding, FLIP_MASK, FlippingFlags, GID_MASK,
    TileGrid, split_gid,
};
pub use layer::{DrawOrder, GroupLayer, ImageLayer, Layer, LayerKind, ObjectLayer, TileLayer};
pub use map::{Map, MapOrientation, RenderOrder, StaggerAxis, StaggerIndex};
pub use object::{
    HorizontalAlignment, Object, ObjectFields, ObjectKind, Point, Text, VerticalAlignment,
};
pub use template::Template;
pub use tileset::{
    FillMode, Frame, Grid, GridOrientation, Image, ImageFormat, ObjectAlignment, Tile,
    TileOffset, TileRenderSize, Tileset, Transformations,
};
pub use wangset::{MAX_WANG_COLORS, MAX_WANG_ID_LEN, WangColor, WangTile, Wangset, WangsetType};
