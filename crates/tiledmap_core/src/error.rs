//! Error taxonomy shared by every reader.
//!
//! A parse call either returns a fully resolved entity or one of these errors;
//! partially built entities are dropped.

use thiserror::Error;

use crate::model::DataCompression;

/// Boxed error returned by caller-supplied resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the tiledmap crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required attribute '{attribute}' on '{element}'")]
    MissingRequiredAttribute { element: String, attribute: String },

    #[error("'{element}' may contain at most one '{child}'")]
    DuplicateElement { element: String, child: String },

    #[error("invalid value '{value}' for '{attribute}'")]
    InvalidEnumValue { attribute: String, value: String },

    /// A numeric, CSV or binary literal could not be decoded.
    #[error("malformed {what}: '{value}'")]
    Format { what: String, value: String },

    #[error("unsupported tile data compression '{0}'")]
    UnsupportedCompression(DataCompression),

    #[error("property '{name}' is not a valid {expected}: '{value}'")]
    InvalidPropertyValue {
        name: String,
        expected: String,
        value: String,
    },

    #[error("custom class '{class}' has no member '{member}'")]
    UnknownCustomClassMember { class: String, member: String },

    /// A caller resolver failed; the original error is kept as the source.
    #[error("failed to resolve external reference '{source_id}'")]
    Resolver {
        source_id: String,
        #[source]
        source: BoxError,
    },

    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl Error {
    pub fn missing(element: &str, attribute: &str) -> Self {
        Error::MissingRequiredAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn duplicate(element: &str, child: &str) -> Self {
        Error::DuplicateElement {
            element: element.to_string(),
            child: child.to_string(),
        }
    }

    pub fn invalid_enum(attribute: &str, value: &str) -> Self {
        Error::InvalidEnumValue {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn format(what: impl Into<String>, value: impl Into<String>) -> Self {
        Error::Format {
            what: what.into(),
            value: value.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument(message.into())
    }
}

/// Stores `value` in `slot`, failing if the slot was already filled.
///
/// Used for children that may occur at most once (`image`, `properties`, ...).
pub fn set_at_most_once<T>(
    slot: &mut Option<T>,
    value: T,
    element: &str,
    child: &str,
) -> Result<()> {
    if slot.is_some() {
        return Err(Error::duplicate(element, child));
    }
    *slot = Some(value);
    Ok(())
}
