use crate::model::{Object, Tileset};

/// A reusable object definition placed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Tileset owning the object's tile, for tile objects.
    pub tileset: Option<Tileset>,
    pub object: Object,
}
