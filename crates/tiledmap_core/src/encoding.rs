//! Tile-data decoding: CSV and Base64 payloads, optional gzip/zlib
//! compression, and the split of raw GIDs into ids and flipping flags.

use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::trace;

use crate::error::{Error, Result};
use crate::model::{DataCompression, DataEncoding, TileGrid};

/// Decode a text payload into parallel GID and flag arrays.
pub fn decode_tile_data(
    payload: &str,
    encoding: DataEncoding,
    compression: Option<DataCompression>,
) -> Result<TileGrid> {
    let raw = match encoding {
        DataEncoding::Csv => parse_csv(payload)?,
        DataEncoding::Base64 => decode_base64(payload, compression)?,
    };
    Ok(TileGrid::from_raw(&raw))
}

/// Parse comma/line separated decimal GIDs. Empty fields are ignored.
pub fn parse_csv(payload: &str) -> Result<Vec<u32>> {
    payload
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            field
                .parse::<u32>()
                .map_err(|_| Error::format("CSV tile id", field))
        })
        .collect()
}

/// Decode Base64 tile data, decompressing it first when requested.
///
/// Whitespace around and inside the payload is ignored.
pub fn decode_base64(payload: &str, compression: Option<DataCompression>) -> Result<Vec<u32>> {
    if compression == Some(DataCompression::ZStd) {
        return Err(Error::UnsupportedCompression(DataCompression::ZStd));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::format("base64 tile data", e.to_string()))?;
    let bytes = decompress(bytes, compression)?;
    Ok(gids_from_le_bytes(&bytes))
}

/// Inflate `bytes` with the given compression.
pub fn decompress(bytes: Vec<u8>, compression: Option<DataCompression>) -> Result<Vec<u8>> {
    match compression {
        None => Ok(bytes),
        Some(DataCompression::GZip) => {
            read_all(GzDecoder::new(bytes.as_slice()), DataCompression::GZip)
        }
        Some(DataCompression::ZLib) => {
            read_all(ZlibDecoder::new(bytes.as_slice()), DataCompression::ZLib)
        }
        Some(DataCompression::ZStd) => Err(Error::UnsupportedCompression(DataCompression::ZStd)),
    }
}

fn read_all(mut reader: impl Read, compression: DataCompression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| Error::format(format!("{compression} tile data"), e.to_string()))?;
    Ok(out)
}

/// Read consecutive little-endian u32s; a trailing partial word is dropped.
pub fn gids_from_le_bytes(bytes: &[u8]) -> Vec<u32> {
    let chunks = bytes.chunks_exact(4);
    let remainder = chunks.remainder().len();
    if remainder != 0 {
        trace!(
            remainder,
            "dropping trailing partial GID from decoded tile data"
        );
    }
    chunks
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}
