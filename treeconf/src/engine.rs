//! Recursive object walkers.
//!
//! [`read_object`] and [`write_object`] drive a [`Descriptor`](crate::Descriptor)
//! over one element: wrapper resolution, comments and per-field error policy
//! live here, while the per-type strategies live in [`property`](crate::property).

use crate::{
    error::{Error, ProcessorError, Result, SaveError},
    kind::Kind,
    meta::Object,
    tree::Element,
};

/// State shared by every read or write of one document.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    namespace: &'a str,
}

impl<'a> Context<'a> {
    /// Creates a context for documents in `namespace`.
    pub fn new(namespace: &'a str) -> Self {
        Self { namespace }
    }

    /// Namespace URI of every element read or written.
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }
}

/// Decodes an object of type `T` from `element`.
///
/// The object starts as [`Object::empty`]. Each field is decoded from its
/// element (inside its wrapper, if one is declared). A [`LoadError`] on a
/// field that is not required leaves that field at its starting value;
/// anything else aborts the decode.
///
/// [`LoadError`]: crate::error::LoadError
pub fn read_object<T: Object>(element: &Element, ctx: &Context<'_>) -> Result<T> {
    let descriptor = T::descriptor();
    descriptor.validate()?;
    let mut object = T::empty();

    for field in descriptor.fields() {
        let parent = match field.wrapper_name() {
            Some(wrapper) => match element.child(ctx.namespace(), wrapper) {
                Some(parent) => parent,
                None if field.is_required() => {
                    return Err(ProcessorError::MissingWrapper {
                        wrapper: wrapper.to_string(),
                        property: field.element_name().to_string(),
                    }
                    .into());
                }
                None => {
                    debug!(
                        "wrapper `{wrapper}` missing in `{}`, `{}` keeps its default",
                        element.name(),
                        field.name()
                    );
                    continue;
                }
            },
            None => element,
        };

        match field.read_into(&mut object, parent, ctx) {
            Ok(()) => {}
            Err(Error::Load(err)) if !field.is_required() => {
                debug!("`{}` keeps its default: {err}", field.name());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(object)
}

/// Encodes `object` into `element`.
///
/// Fields are written in declaration order. A wrapper element is created the
/// first time a field names it and reused by later fields of the same object.
///
/// # Errors
///
/// - [`ProcessorError`] when the descriptor of `T` fails
///   [`Descriptor::validate`](crate::Descriptor::validate), whatever the
///   field values are.
/// - [`SaveError::Unclassifiable`] for fields classified as [`Kind::Opaque`].
pub fn write_object<T: Object>(
    object: &T,
    element: &mut Element,
    ctx: &Context<'_>,
) -> Result<()> {
    let descriptor = T::descriptor();
    descriptor.validate()?;
    let ns = ctx.namespace();

    for field in descriptor.fields() {
        if *field.kind() == Kind::Opaque {
            return Err(SaveError::Unclassifiable {
                field: field.name().to_string(),
                type_name: field.type_name(),
            }
            .into());
        }

        let parent = match field.wrapper_name() {
            Some(wrapper) => element.child_or_insert(ns, wrapper),
            None => &mut *element,
        };

        if let Some(comment) = field.comment_text() {
            parent.push_comment(comment);
        }
        field.write_from(object, parent, ctx)?;
    }

    Ok(())
}
