//! Format-agnostic entry points.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use tiledmap_core::model::{Map, Template, Tileset};
use tiledmap_core::{
    CustomTypes, NoExternals, ReadContext, Result, TemplateResolver, TilesetResolver,
};
use tracing::debug;

/// Wire format of a Tiled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.tmx`, `.tsx`, `.tx`
    Xml,
    /// `.tmj`, `.tsj`, `.tj`, `.json`
    Json,
}

impl Format {
    /// Detect the format from a file extension, without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "tmx" | "tsx" | "tx" => Some(Format::Xml),
            "tmj" | "tsj" | "tj" | "json" => Some(Format::Json),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .and_then(Format::from_extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xml => f.write_str("XML"),
            Format::Json => f.write_str("JSON"),
        }
    }
}

/// Reads maps, tilesets and templates in either format.
///
/// The reader owns the resolvers for external tilesets and templates and the
/// custom-type catalog; every read borrows them for the duration of the call.
///
/// # Example
///
/// ```rust
/// use tiledmap::prelude::*;
///
/// let reader = TiledReader::without_externals(CustomTypes::default());
/// let map = reader
///     .read_map(
///         Format::Json,
///         r#"{"type": "map", "version": "1.10", "orientation": "orthogonal",
///             "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
///             "nextlayerid": 1, "nextobjectid": 1}"#,
///     )
///     .unwrap();
/// assert_eq!(map.tile_width, 8);
/// ```
pub struct TiledReader {
    tilesets: Box<dyn TilesetResolver>,
    templates: Box<dyn TemplateResolver>,
    custom_types: CustomTypes,
}

impl TiledReader {
    pub fn new(
        tilesets: impl TilesetResolver + 'static,
        templates: impl TemplateResolver + 'static,
        custom_types: CustomTypes,
    ) -> Self {
        Self {
            tilesets: Box::new(tilesets),
            templates: Box::new(templates),
            custom_types,
        }
    }

    /// A reader for self-contained documents: any external reference fails.
    pub fn without_externals(custom_types: CustomTypes) -> Self {
        Self::new(NoExternals, NoExternals, custom_types)
    }

    pub fn custom_types(&self) -> &CustomTypes {
        &self.custom_types
    }

    fn context(&self) -> ReadContext<'_> {
        ReadContext::new(&*self.tilesets, &*self.templates, &self.custom_types)
    }

    pub fn read_map(&self, format: Format, text: &str) -> Result<Map> {
        debug!(%format, "reading map");
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_map(text, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_map(text, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }

    pub fn read_map_from(&self, format: Format, reader: impl BufRead) -> Result<Map> {
        debug!(%format, "reading map from stream");
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_map_from(reader, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_map_from(reader, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }

    pub fn read_tileset(&self, format: Format, text: &str) -> Result<Tileset> {
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_tileset(text, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_tileset(text, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }

    pub fn read_tileset_from(&self, format: Format, reader: impl BufRead) -> Result<Tileset> {
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_tileset_from(reader, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_tileset_from(reader, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }

    pub fn read_template(&self, format: Format, text: &str) -> Result<Template> {
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_template(text, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_template(text, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }

    pub fn read_template_from(&self, format: Format, reader: impl BufRead) -> Result<Template> {
        match format {
            #[cfg(feature = "tmx")]
            Format::Xml => tiledmap_tmx::read_template_from(reader, &self.context()),
            #[cfg(feature = "tmj")]
            Format::Json => tiledmap_tmj::read_template_from(reader, &self.context()),
            #[cfg(not(feature = "tmx"))]
            Format::Xml => Err(disabled(format)),
            #[cfg(not(feature = "tmj"))]
            Format::Json => Err(disabled(format)),
        }
    }
}

impl fmt::Debug for TiledReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiledReader")
            .field("custom_types", &self.custom_types.len())
            .finish_non_exhaustive()
    }
}

#[cfg(not(all(feature = "tmx", feature = "tmj")))]
fn disabled(format: Format) -> tiledmap_core::Error {
    tiledmap_core::Error::malformed(format!(
        "{format} support is not compiled in; enable the matching cargo feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("tmx"), Some(Format::Xml));
        assert_eq!(Format::from_extension("TSX"), Some(Format::Xml));
        assert_eq!(Format::from_extension("tj"), Some(Format::Json));
        assert_eq!(Format::from_extension("json"), Some(Format::Json));
        assert_eq!(Format::from_extension("png"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("maps/level1.tmj"), Some(Format::Json));
        assert_eq!(Format::from_path("templates/enemy.tx"), Some(Format::Xml));
        assert_eq!(Format::from_path("README"), None);
    }

    #[cfg(feature = "tmx")]
    #[test]
    fn test_without_externals_rejects_external_tileset() {
        let reader = TiledReader::without_externals(CustomTypes::default());
        let err = reader
            .read_map(
                Format::Xml,
                r#"<map version="1.10" orientation="orthogonal" width="1" height="1" tilewidth="8" tileheight="8" nextlayerid="1" nextobjectid="1">
  <tileset firstgid="1" source="terrain.tsx"/>
</map>"#,
            )
            .unwrap_err();
        assert!(matches!(err, tiledmap_core::Error::Resolver { ref source_id, .. } if source_id == "terrain.tsx"));
    }

    #[cfg(not(feature = "tmj"))]
    #[test]
    fn test_disabled_json_is_reported() {
        let reader = TiledReader::without_externals(CustomTypes::default());
        let err = reader.read_map(Format::Json, "{}").unwrap_err();
        assert!(matches!(err, tiledmap_core::Error::MalformedDocument(ref msg) if msg.contains("JSON")));
    }

    #[cfg(not(feature = "tmx"))]
    #[test]
    fn test_disabled_xml_is_reported() {
        let reader = TiledReader::without_externals(CustomTypes::default());
        let err = reader.read_tileset(Format::Xml, "<tileset/>").unwrap_err();
        assert!(matches!(err, tiledmap_core::Error::MalformedDocument(ref msg) if msg.contains("XML")));
    }

    #[cfg(all(feature = "tmx", feature = "tmj"))]
    #[test]
    fn test_both_formats_dispatch() {
        let reader = TiledReader::without_externals(CustomTypes::default());
        let xml = reader
            .read_tileset(
                Format::Xml,
                r#"<tileset name="t" tilewidth="8" tileheight="8" tilecount="1" columns="1"/>"#,
            )
            .unwrap();
        let json = reader
            .read_tileset(
                Format::Json,
                r#"{"type": "tileset", "name": "t", "tilewidth": 8, "tileheight": 8, "tilecount": 1, "columns": 1}"#,
            )
            .unwrap();
        assert_eq!(xml, json);
    }
}
