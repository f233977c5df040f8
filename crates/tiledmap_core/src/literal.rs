//! Closed enumerations spelled as fixed string literals in both wire formats.
//!
//! Unrecognized literals are never defaulted: [`parse_literal`] fails with
//! [`Error::InvalidEnumValue`].

use crate::error::{Error, Result};

/// A closed enumeration with one exact spelling per variant.
pub trait Literal: Sized + Copy {
    /// Look up the variant spelled `value`.
    fn from_literal(value: &str) -> Option<Self>;

    /// The exact spelling used by Tiled.
    fn as_literal(self) -> &'static str;
}

/// Parse `value` as a `T`, reporting `attribute` on failure.
pub fn parse_literal<T: Literal>(attribute: &str, value: &str) -> Result<T> {
    T::from_literal(value).ok_or_else(|| Error::invalid_enum(attribute, value))
}

macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::literal::Literal for $name {
            fn from_literal(value: &str) -> Option<Self> {
                match value {
                    $( $lit => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn as_literal(self) -> &'static str {
                match self {
                    $( Self::$variant => $lit, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::literal::Literal::as_literal(*self))
            }
        }
    };
}

pub(crate) use literal_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataCompression, MapOrientation, RenderOrder};

    #[test]
    fn test_literals_match_exact_spelling() {
        assert_eq!(
            DataCompression::from_literal("gzip"),
            Some(DataCompression::GZip)
        );
        assert_eq!(
            RenderOrder::from_literal("left-up"),
            Some(RenderOrder::LeftUp)
        );
        assert_eq!(MapOrientation::Hexagonal.to_string(), "hexagonal");
        assert_eq!(DataCompression::from_literal("GZIP"), None);
    }

    #[test]
    fn test_parse_literal_reports_attribute() {
        let err = parse_literal::<MapOrientation>("orientation", "hexagon").unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { ref attribute, ref value }
            if attribute == "orientation" && value == "hexagon"));
    }
}
