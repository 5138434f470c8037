use std::{fmt::Display, str::FromStr};

use crate::{
    engine::Context,
    error::{LoadError, Result},
    kind::Kind,
    property::Property,
    tree::Element,
};

/// Parses the trimmed text content of `element`.
fn parse_text<T>(element: &Element, kind: Kind) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text = element.text();
    let text = text.trim();
    text.parse()
        .map_err(|e| LoadError::invalid_value(element.name(), kind, text, e).into())
}

macro_rules! impl_scalar {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Property for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }

                fn read_element(element: &Element, _ctx: &Context<'_>) -> Result<Self> {
                    parse_text(element, Kind::$kind)
                }

                fn write_element(&self, element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
                    element.set_text(self.to_string());
                    Ok(())
                }
            }
        )+
    };
}

impl_scalar!(Boolean => bool);
impl_scalar!(Float => f32);
impl_scalar!(Double => f64);
impl_scalar!(Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Property for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn read_element(element: &Element, _ctx: &Context<'_>) -> Result<Self> {
        Ok(element.text())
    }

    fn write_element(&self, element: &mut Element, _ctx: &Context<'_>) -> Result<()> {
        element.set_text(self.as_str());
        Ok(())
    }
}

/// An enumeration stored by the name of its variant.
///
/// Usually implemented through [`config_enum!`](crate::config_enum).
pub trait ConfigEnum: Sized + 'static {
    /// All variant names, in declaration order.
    const NAMES: &'static [&'static str];

    /// The variant with exactly this name (case-sensitive).
    fn from_name(name: &str) -> Option<Self>;

    /// The declared name of this variant.
    fn name(&self) -> &'static str;
}

/// Decodes an enumeration from the text content of `element`.
///
/// # Errors
///
/// Returns [`LoadError::UnknownVariant`] if the text does not match a declared
/// name exactly.
pub fn read_enum<T: ConfigEnum>(element: &Element) -> Result<T> {
    let text = element.text();
    let value = text.trim();
    T::from_name(value).ok_or_else(|| {
        LoadError::UnknownVariant {
            element: element.name().to_string(),
            value: value.to_string(),
            expected: T::NAMES.to_vec(),
        }
        .into()
    })
}

/// Encodes an enumeration as its declared name.
pub fn write_enum<T: ConfigEnum>(value: &T, element: &mut Element) -> Result<()> {
    element.set_text(value.name());
    Ok(())
}
