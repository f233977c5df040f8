//! # tiledmap
//!
//! Reader for maps, tilesets and object templates made with the
//! [Tiled](https://www.mapeditor.org/) editor.
//!
//! This is a meta-crate that combines the `tiledmap_*` sub-crates behind one
//! [`TiledReader`] with feature flags for the wire formats.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tiledmap::prelude::*;
//!
//! let types = CustomTypes::from_project_json(&std::fs::read_to_string("game.tiled-project")?)?;
//! let tilesets = |source: &str| -> ResolverResult<Tileset> {
//!     let text = std::fs::read_to_string(source)?;
//!     let types = CustomTypes::default();
//!     let context = ReadContext::new(&NoExternals, &NoExternals, &types);
//!     Ok(tiledmap::tmx::read_tileset(&text, &context)?)
//! };
//! let reader = TiledReader::new(tilesets, NoExternals, types);
//!
//! let map = reader.read_map(Format::Xml, &std::fs::read_to_string("level1.tmx")?)?;
//! for layer in map.all_layers() {
//!     println!("{}", layer.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - **default**: both formats
//! - **tmx**: XML documents (`.tmx`, `.tsx`, `.tx`) via `tiledmap_tmx`
//! - **tmj**: JSON documents (`.tmj`, `.tsj`, `.tj`) via `tiledmap_tmj`
//!
//! ## Architecture
//!
//! - [`core`]: document model, properties and custom types, tile-data
//!   decoding, resolver seams and errors
//! - [`tmx`] / [`tmj`]: one parser per wire format, both producing the same model
//! - [`TiledReader`]: owns resolvers and the custom-type catalog and
//!   dispatches on [`Format`]

#[cfg(not(any(feature = "tmx", feature = "tmj")))]
compile_error!("enable at least one of the `tmx` or `tmj` features");

pub mod reader;

pub use reader::{Format, TiledReader};

// Re-export sub-crates for advanced usage
pub use tiledmap_core as core;

#[cfg(feature = "tmx")]
pub use tiledmap_tmx as tmx;

#[cfg(feature = "tmj")]
pub use tiledmap_tmj as tmj;

/// Unified prelude for tiledmap.
pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::reader::{Format, TiledReader};
    pub use crate::core::BoxError;
}
