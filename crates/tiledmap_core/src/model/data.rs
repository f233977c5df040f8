use bitflags::bitflags;

use crate::literal::literal_enum;

literal_enum! {
    /// Text encoding of a tile-data payload.
    pub enum DataEncoding {
        Csv => "csv",
        Base64 => "base64",
    }
}

literal_enum! {
    /// Compression applied to Base64 tile data before encoding.
    pub enum DataCompression {
        GZip => "gzip",
        ZLib => "zlib",
        ZStd => "zstd",
    }
}

/// High bits of a raw GID that carry flipping flags.
pub const FLIP_MASK: u32 = 0xF000_0000;

/// Low bits of a raw GID that carry the tile id.
pub const GID_MASK: u32 = 0x0FFF_FFFF;

bitflags! {
    /// Per-cell flipping/rotation flags packed into the top four GID bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlippingFlags: u32 {
        const FLIPPED_HORIZONTALLY = 0x8000_0000;
        const FLIPPED_VERTICALLY = 0x4000_0000;
        const FLIPPED_DIAGONALLY = 0x2000_0000;
        const ROTATED_HEXAGONAL_120 = 0x1000_0000;
    }
}

/// Split a raw GID into its cleared tile id and flipping flags.
pub fn split_gid(raw: u32) -> (u32, FlippingFlags) {
    (raw & GID_MASK, FlippingFlags::from_bits_retain(raw & FLIP_MASK))
}

/// Parallel arrays of cleared GIDs and their flipping flags.
///
/// Both arrays always have the same length. A GID of 0 is an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileGrid {
    pub global_tile_ids: Vec<u32>,
    pub flipping_flags: Vec<FlippingFlags>,
}

impl TileGrid {
    /// Build a grid from raw GIDs, splitting each one into id and flags.
    pub fn from_raw(raw: &[u32]) -> Self {
        let (global_tile_ids, flipping_flags) = raw.iter().map(|&gid| split_gid(gid)).unzip();
        Self {
            global_tile_ids,
            flipping_flags,
        }
    }

    pub fn len(&self) -> usize {
        self.global_tile_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_tile_ids.is_empty()
    }

    /// The cell at row-major `index`.
    pub fn get(&self, index: usize) -> Option<(u32, FlippingFlags)> {
        Some((
            *self.global_tile_ids.get(index)?,
            *self.flipping_flags.get(index)?,
        ))
    }

    /// Raw GIDs with the flags folded back into the high bits.
    pub fn raw_gids(&self) -> impl Iterator<Item = u32> + '_ {
        self.global_tile_ids
            .iter()
            .zip(&self.flipping_flags)
            .map(|(gid, flags)| gid | flags.bits())
    }
}

/// A rectangular piece of an infinite map's tile data.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub tiles: TileGrid,
}

impl Chunk {
    /// Non-empty cells as `(x, y, gid, flags)` in map tile coordinates.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (i32, i32, u32, FlippingFlags)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles
            .global_tile_ids
            .iter()
            .zip(&self.tiles.flipping_flags)
            .enumerate()
            .filter(|(_, (gid, _))| **gid != 0)
            .map(move |(i, (gid, flags))| {
                (
                    self.x + (i % width) as i32,
                    self.y + (i / width) as i32,
                    *gid,
                    *flags,
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataContent {
    /// Row-major cells for a finite layer.
    Flat(TileGrid),
    /// Chunks for an infinite layer.
    Chunked(Vec<Chunk>),
}

/// Decoded tile data of a tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    /// `None` means the payload was a list of `<tile>` children.
    pub encoding: Option<DataEncoding>,
    pub compression: Option<DataCompression>,
    pub content: DataContent,
}

impl Data {
    pub fn tiles(&self) -> Option<&TileGrid> {
        match &self.content {
            DataContent::Flat(grid) => Some(grid),
            DataContent::Chunked(_) => None,
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        match &self.content {
            DataContent::Flat(_) => &[],
            DataContent::Chunked(chunks) => chunks,
        }
    }

    /// The cell at `(x, y)` of flat data laid out `layer_width` cells wide.
    ///
    /// Chunked data has no flat layout and always yields `None`.
    pub fn get(&self, x: u32, y: u32, layer_width: u32) -> Option<(u32, FlippingFlags)> {
        if x >= layer_width {
            return None;
        }
        let index = usize::try_from(y)
            .ok()?
            .checked_mul(usize::try_from(layer_width).ok()?)?
            .checked_add(usize::try_from(x).ok()?)?;
        self.tiles()?.get(index)
    }

    /// Non-empty cells as `(x, y, gid, flags)`.
    ///
    /// `layer_width` is used to place the cells of flat data; chunks carry
    /// their own geometry.
    pub fn iter_tiles(
        &self,
        layer_width: u32,
    ) -> Box<dyn Iterator<Item = (i32, i32, u32, FlippingFlags)> + '_> {
        match &self.content {
            DataContent::Flat(grid) => {
                let width = layer_width.max(1) as usize;
                Box::new(
                    grid.global_tile_ids
                        .iter()
                        .zip(&grid.flipping_flags)
                        .enumerate()
                        .filter(|(_, (gid, _))| **gid != 0)
                        .map(move |(i, (gid, flags))| {
                            ((i % width) as i32, (i / width) as i32, *gid, *flags)
                        }),
                )
            }
            DataContent::Chunked(chunks) => Box::new(chunks.iter().flat_map(Chunk::iter_tiles)),
        }
    }
}
