//! External reference resolution.
//!
//! The readers never open files. When a tileset or object carries a
//! `source`/`template` reference, they ask a caller-supplied resolver for the
//! already-parsed entity. Resolvers are plain synchronous calls; any closure
//! of the right shape works:
//!
//! ```rust
//! use tiledmap_core::prelude::*;
//!
//! let tilesets = |source: &str| -> ResolverResult<Tileset> {
//!     Err(format!("no tileset named {source}").into())
//! };
//! let types = CustomTypes::default();
//! let context = ReadContext::new(&tilesets, &NoExternals, &types);
//! assert!(context.resolve_tileset("terrain.tsx", Some(1)).is_err());
//! ```
//!
//! Nothing is cached: resolving the same identifier twice calls the resolver
//! twice. Recursion and cycle protection are up to the resolver.

use tracing::debug;

use crate::error::{BoxError, Error, Result};
use crate::model::{Template, Tileset};
use crate::properties::CustomTypes;

/// Result returned by caller resolvers.
pub type ResolverResult<T> = std::result::Result<T, BoxError>;

/// Produces a parsed tileset for an external `source` identifier.
pub trait TilesetResolver {
    fn resolve_tileset(&self, source: &str) -> ResolverResult<Tileset>;
}

/// Produces a parsed template for an object's `template` identifier.
pub trait TemplateResolver {
    fn resolve_template(&self, source: &str) -> ResolverResult<Template>;
}

impl<F> TilesetResolver for F
where
    F: Fn(&str) -> ResolverResult<Tileset>,
{
    fn resolve_tileset(&self, source: &str) -> ResolverResult<Tileset> {
        self(source)
    }
}

impl<F> TemplateResolver for F
where
    F: Fn(&str) -> ResolverResult<Template>,
{
    fn resolve_template(&self, source: &str) -> ResolverResult<Template> {
        self(source)
    }
}

/// Resolver for self-contained documents: every external reference fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternals;

impl TilesetResolver for NoExternals {
    fn resolve_tileset(&self, source: &str) -> ResolverResult<Tileset> {
        Err(format!("external tileset '{source}' requested but no resolver is configured").into())
    }
}

impl TemplateResolver for NoExternals {
    fn resolve_template(&self, source: &str) -> ResolverResult<Template> {
        Err(format!("template '{source}' requested but no resolver is configured").into())
    }
}

/// Everything one parse call needs besides the document itself.
#[derive(Clone, Copy)]
pub struct ReadContext<'a> {
    tilesets: &'a dyn TilesetResolver,
    templates: &'a dyn TemplateResolver,
    custom_types: &'a CustomTypes,
}

impl<'a> ReadContext<'a> {
    pub fn new(
        tilesets: &'a dyn TilesetResolver,
        templates: &'a dyn TemplateResolver,
        custom_types: &'a CustomTypes,
    ) -> Self {
        Self {
            tilesets,
            templates,
            custom_types,
        }
    }

    pub fn custom_types(&self) -> &'a CustomTypes {
        self.custom_types
    }

    /// Resolve an external tileset and stamp the referencing document's
    /// `first_gid` and `source` onto the returned copy.
    pub fn resolve_tileset(&self, source: &str, first_gid: Option<u32>) -> Result<Tileset> {
        debug!(source, ?first_gid, "resolving external tileset");
        let mut tileset =
            self.tilesets
                .resolve_tileset(source)
                .map_err(|e| Error::Resolver {
                    source_id: source.to_string(),
                    source: e,
                })?;
        tileset.first_gid = first_gid;
        tileset.source = Some(source.to_string());
        Ok(tileset)
    }

    pub fn resolve_template(&self, source: &str) -> Result<Template> {
        debug!(source, "resolving object template");
        self.templates
            .resolve_template(source)
            .map_err(|e| Error::Resolver {
                source_id: source.to_string(),
                source: e,
            })
    }
}

impl std::fmt::Debug for ReadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadContext")
            .field("custom_types", &self.custom_types.len())
            .finish_non_exhaustive()
    }
}
