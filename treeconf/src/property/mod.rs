//! Marshalling strategies for configuration values.
//!
//! Every type that can be stored in a configuration implements [`Property`].
//! The implementation fixes the type's [`Kind`] and knows how to move a value
//! between the object graph and the tree:
//!
//! - scalars ([`scalar`]) live in the text content of one element,
//! - collections ([`collection`]) expand into repeated sibling elements,
//! - objects recurse through their [`Descriptor`](crate::Descriptor), see
//!   [`config_object!`](crate::config_object),
//! - enumerations match declared names, see [`config_enum!`](crate::config_enum),
//! - [`Opaque`] values have no tree form at all.

use crate::{
    engine::Context,
    error::{LoadError, Result},
    kind::Kind,
    tree::Element,
};

/// Scalar implementations: booleans, numbers, strings and enumerations.
pub mod scalar;

/// Lists, string-keyed maps and optional values.
pub mod collection;

/// Values without a tree representation.
pub mod opaque;

pub use opaque::Opaque;
pub use scalar::{ConfigEnum, read_enum, write_enum};

/// Attribute carrying the key of a map entry.
pub const KEY_ATTRIBUTE: &str = "key";

/// Conversion between a value and its place in the tree.
///
/// `read_element` / `write_element` work on the element that *is* the value.
/// `read_field` / `write_field` work on the parent and the element name the
/// value is stored under; the default implementations locate or create one
/// child element and delegate. Collections override them because a single
/// value spans several sibling elements.
pub trait Property: Sized {
    /// Marshalling strategy of this type.
    fn kind() -> Kind;

    /// Decodes a value from the element that holds it.
    fn read_element(element: &Element, ctx: &Context<'_>) -> Result<Self>;

    /// Encodes this value into `element`.
    fn write_element(&self, element: &mut Element, ctx: &Context<'_>) -> Result<()>;

    /// Decodes the value stored under `name` in `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingElement`] when `parent` has no such child.
    fn read_field(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<Self> {
        let element = parent
            .child(ctx.namespace(), name)
            .ok_or_else(|| LoadError::MissingElement(name.to_string()))?;
        Self::read_element(element, ctx)
    }

    /// Appends the value to `parent` under `name`.
    fn write_field(&self, parent: &mut Element, name: &str, ctx: &Context<'_>) -> Result<()> {
        let mut element = Element::new(ctx.namespace(), name);
        self.write_element(&mut element, ctx)?;
        parent.push_element(element);
        Ok(())
    }
}
