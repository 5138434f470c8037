use std::{
    any::type_name,
    ops::{Deref, DerefMut},
};

use crate::{
    engine::Context,
    error::{ProcessorError, Result, SaveError},
    kind::Kind,
    property::Property,
    tree::Element,
};

/// A value carried on a configuration type that has no tree representation.
///
/// Declaring an `Opaque` field is allowed, but saving it fails with
/// [`SaveError::Unclassifiable`] and decoding it fails with
/// [`ProcessorError::OpaqueDecode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Opaque<T>(pub T);

impl<T> Deref for Opaque<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Opaque<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> Property for Opaque<T> {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn read_element(_element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Err(ProcessorError::OpaqueDecode(type_name::<T>()).into())
    }

    fn write_element(&self, element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        Err(SaveError::Unclassifiable {
            field: element.name().to_string(),
            type_name: type_name::<T>(),
        }
        .into())
    }

    fn read_field(_parent: &Element, _name: &str, _ctx: &Context<'_>) -> Result<Self> {
        Err(ProcessorError::OpaqueDecode(type_name::<T>()).into())
    }

    fn write_field(&self, _parent: &mut Element, name: &str, _ctx: &Context<'_>) -> Result<()> {
        Err(SaveError::Unclassifiable {
            field: name.to_string(),
            type_name: type_name::<T>(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_opaque_is_rejected_both_ways() {
        let ctx = Context::new("");
        let mut parent = Element::new("", "root");

        let err = Opaque(3u8).write_field(&mut parent, "handle", &ctx).unwrap_err();
        match err {
            Error::Save(SaveError::Unclassifiable { field, type_name }) => {
                assert_eq!(field, "handle");
                assert_eq!(type_name, "u8");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parent.nodes().is_empty());

        parent.push_element(Element::new("", "handle"));
        let err = Opaque::<u8>::read_field(&parent, "handle", &ctx).unwrap_err();
        assert!(matches!(err, Error::Processor(ProcessorError::OpaqueDecode("u8"))));
    }

    #[test]
    fn test_deref() {
        let mut value = Opaque(vec![1, 2]);
        value.push(3);
        assert_eq!(value.len(), 3);
    }
}
