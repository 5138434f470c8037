//! Property type classification.
//!
//! Every value that can appear in a configuration resolves to exactly one
//! [`Kind`], which selects the marshalling strategy used for it. The
//! classification of a Rust type is fixed at compile time by its
//! [`Property`] implementation; [`classify`] just reads it back.

use std::fmt;

use crate::property::Property;

/// Marshalling strategy of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// `true` / `false` text content.
    Boolean,
    /// Single precision floating-point text content.
    Float,
    /// Double precision floating-point text content.
    Double,
    /// Integer text content.
    Integer,
    /// Raw text content.
    String,
    /// One of a fixed set of names, matched exactly.
    Enum,
    /// Repeated sibling elements, one per item.
    List(Box<Kind>),
    /// Repeated sibling elements carrying a `key` attribute.
    ///
    /// Keys are always strings; only the value kind is recorded.
    Map(Box<Kind>),
    /// Nested object described by its own field descriptors.
    Object,
    /// A value with no tree representation.
    Opaque,
}

impl Kind {
    /// Whether the value is stored as the text content of a single element.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Float | Kind::Double | Kind::Integer | Kind::String | Kind::Enum
        )
    }

    /// Whether the value expands into repeated sibling elements.
    pub fn is_collection(&self) -> bool {
        matches!(self, Kind::List(_) | Kind::Map(_))
    }

    /// The element (list) or value (map) kind of a collection.
    pub fn contained(&self) -> Option<&Kind> {
        match self {
            Kind::List(inner) | Kind::Map(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Boolean => f.pad("Boolean"),
            Kind::Float => f.pad("Float"),
            Kind::Double => f.pad("Double"),
            Kind::Integer => f.pad("Integer"),
            Kind::String => f.pad("String"),
            Kind::Enum => f.pad("Enum"),
            Kind::List(inner) => write!(f, "List<{inner}>"),
            Kind::Map(inner) => write!(f, "Map<String, {inner}>"),
            Kind::Object => f.pad("Object"),
            Kind::Opaque => f.pad("Opaque"),
        }
    }
}

/// Returns the classification of `T`.
pub fn classify<T: Property>() -> Kind {
    T::kind()
}
