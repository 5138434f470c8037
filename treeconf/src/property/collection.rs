use std::{
    any::type_name,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::{
    engine::Context,
    error::{ProcessorError, Result},
    kind::Kind,
    property::{KEY_ATTRIBUTE, Property},
    tree::Element,
};

fn nested<T>() -> crate::error::Error {
    ProcessorError::NestedCollection(type_name::<T>()).into()
}

impl<T: Property> Property for Vec<T> {
    fn kind() -> Kind {
        Kind::List(Box::new(T::kind()))
    }

    fn read_element(_element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Err(nested::<Self>())
    }

    fn write_element(&self, _element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        Err(nested::<Self>())
    }

    /// Every child named `name`, in document order. No children is an empty list.
    fn read_field(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<Self> {
        parent
            .children_named(ctx.namespace(), name)
            .map(|element| T::read_element(element, ctx))
            .collect()
    }

    fn write_field(&self, parent: &mut Element, name: &str, ctx: &Context<'_>) -> Result<()> {
        for item in self {
            let mut element = Element::new(ctx.namespace(), name);
            item.write_element(&mut element, ctx)?;
            parent.push_element(element);
        }
        Ok(())
    }
}

/// Decodes every keyed child named `name` into `map`.
///
/// Entries without a key attribute are skipped. Later entries replace earlier
/// ones with the same key.
fn read_entries<V, M>(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<M>
where
    V: Property,
    M: Default + Extend<(String, V)>,
{
    let mut map = M::default();
    for element in parent.children_named(ctx.namespace(), name) {
        let Some(key) = element.attribute(KEY_ATTRIBUTE) else {
            trace!("skipping `{name}` entry without a `{KEY_ATTRIBUTE}` attribute");
            continue;
        };
        let value = V::read_element(element, ctx)?;
        map.extend(Some((key.to_string(), value)));
    }
    Ok(map)
}

fn write_entries<'a, V, I>(
    entries: I,
    parent: &mut Element,
    name: &str,
    ctx: &Context<'_>,
) -> Result<()>
where
    V: Property + 'a,
    I: IntoIterator<Item = (&'a String, &'a V)>,
{
    for (key, value) in entries {
        let mut element = Element::new(ctx.namespace(), name);
        element.set_attribute(KEY_ATTRIBUTE, key.as_str());
        value.write_element(&mut element, ctx)?;
        parent.push_element(element);
    }
    Ok(())
}

impl<V: Property> Property for BTreeMap<String, V> {
    fn kind() -> Kind {
        Kind::Map(Box::new(V::kind()))
    }

    fn read_element(_element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Err(nested::<Self>())
    }

    fn write_element(&self, _element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        Err(nested::<Self>())
    }

    fn read_field(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<Self> {
        read_entries(parent, name, ctx)
    }

    fn write_field(&self, parent: &mut Element, name: &str, ctx: &Context<'_>) -> Result<()> {
        write_entries(self, parent, name, ctx)
    }
}

impl<V: Property, S: BuildHasher + Default> Property for HashMap<String, V, S> {
    fn kind() -> Kind {
        Kind::Map(Box::new(V::kind()))
    }

    fn read_element(_element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Err(nested::<Self>())
    }

    fn write_element(&self, _element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        Err(nested::<Self>())
    }

    fn read_field(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<Self> {
        read_entries(parent, name, ctx)
    }

    fn write_field(&self, parent: &mut Element, name: &str, ctx: &Context<'_>) -> Result<()> {
        write_entries(self, parent, name, ctx)
    }
}

/// An optional value classifies as its inner type. A missing element reads
/// as `None` and `None` writes nothing.
///
/// Absence is only expressible for a field, so an `Option` used as a list item
/// or map value is rejected like a nested collection.
impl<T: Property> Property for Option<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn read_element(_element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Err(nested::<Self>())
    }

    fn write_element(&self, _element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        Err(nested::<Self>())
    }

    fn read_field(parent: &Element, name: &str, ctx: &Context<'_>) -> Result<Self> {
        if parent.has_child(ctx.namespace(), name) {
            T::read_field(parent, name, ctx).map(Some)
        } else {
            Ok(None)
        }
    }

    fn write_field(&self, parent: &mut Element, name: &str, ctx: &Context<'_>) -> Result<()> {
        match self {
            Some(value) => value.write_field(parent, name, ctx),
            None => Ok(()),
        }
    }
}
