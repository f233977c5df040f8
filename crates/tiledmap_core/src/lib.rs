//! # `tiledmap_core`
//!
//! Format-agnostic backbone for the tiledmap readers. Both the XML reader
//! (`tiledmap_tmx`) and the JSON reader (`tiledmap_tmj`) build the same
//! [`model::Map`] through the pieces in this crate.
//!
//! **This crate does NOT tokenize documents or touch the filesystem** - wire
//! formats live in the reader crates, and external tilesets/templates are
//! fetched by caller-supplied resolvers.
//!
//! ## What this crate provides
//!
//! 1. **Document model**: maps, tilesets, layers, objects, wangsets, templates
//! 2. **Property system**: typed values plus the caller's custom class/enum catalog
//! 3. **Tile-data decoding**: CSV/Base64 payloads, gzip/zlib, flipping flags
//! 4. **Resolver seams**: [`TilesetResolver`], [`TemplateResolver`], [`ReadContext`]
//! 5. **Errors**: one [`Error`] taxonomy for every reader

pub mod encoding;
pub mod error;
pub mod literal;
pub mod model;
pub mod project;
pub mod properties;
pub mod resolver;

pub mod prelude {
    //! Common imports for `tiledmap_core` users.

    pub use crate::error::{Error, Result};
    pub use crate::literal::Literal;
    pub use crate::model::*;
    pub use crate::properties::{
        CustomClassDefinition, CustomClassUseAs, CustomEnumDefinition, CustomEnumStorageType,
        CustomTypeDefinition, CustomTypes, Properties, PropertyKind, PropertyValue,
    };
    pub use crate::resolver::{
        NoExternals, ReadContext, ResolverResult, TemplateResolver, TilesetResolver,
    };
}

pub use error::{BoxError, Error, Result};
pub use literal::Literal;
pub use properties::{CustomTypes, Properties, PropertyValue};
pub use resolver::{NoExternals, ReadContext, ResolverResult, TemplateResolver, TilesetResolver};
