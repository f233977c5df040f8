use crate::error::{Error, Result};
use crate::literal::literal_enum;
use crate::model::Color;
use crate::properties::Properties;

/// Most colors one wangset may declare.
pub const MAX_WANG_COLORS: usize = 254;

/// Corner/edge slots in a wang id.
pub const MAX_WANG_ID_LEN: usize = 8;

literal_enum! {
    #[derive(Default)]
    pub enum WangsetType {
        Corner => "corner",
        Edge => "edge",
        #[default]
        Mixed => "mixed",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WangColor {
    pub name: String,
    pub class: String,
    pub color: Color,
    pub tile: i32,
    pub probability: f32,
    pub properties: Properties,
}

/// Corner/edge color indices for one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WangTile {
    pub tile_id: u32,
    wang_id: Vec<u8>,
}

impl WangTile {
    pub fn new(tile_id: u32, wang_id: Vec<u8>) -> Result<Self> {
        if wang_id.len() > MAX_WANG_ID_LEN {
            return Err(Error::malformed(format!(
                "wang id of tile {tile_id} has {} indices, at most {MAX_WANG_ID_LEN} allowed",
                wang_id.len()
            )));
        }
        Ok(Self { tile_id, wang_id })
    }

    pub fn wang_id(&self) -> &[u8] {
        &self.wang_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wangset {
    pub name: String,
    pub class: String,
    pub wangset_type: WangsetType,
    pub tile: i32,
    colors: Vec<WangColor>,
    pub wang_tiles: Vec<WangTile>,
    pub properties: Properties,
}

impl Wangset {
    pub fn new(
        name: String,
        class: String,
        wangset_type: WangsetType,
        tile: i32,
        colors: Vec<WangColor>,
        wang_tiles: Vec<WangTile>,
        properties: Properties,
    ) -> Result<Self> {
        if colors.len() > MAX_WANG_COLORS {
            return Err(Error::malformed(format!(
                "wangset '{name}' has {} colors, at most {MAX_WANG_COLORS} allowed",
                colors.len()
            )));
        }
        Ok(Self {
            name,
            class,
            wangset_type,
            tile,
            colors,
            wang_tiles,
            properties,
        })
    }

    pub fn colors(&self) -> &[WangColor] {
        &self.colors
    }
}
