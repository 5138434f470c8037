/// Declares an enumeration stored by name.
///
/// Each variant is paired with the exact text it is stored as. Matching on
/// load is case-sensitive.
///
/// ```rust
/// treeconf::config_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum GameMode {
///         Survival => "SURVIVAL",
///         Creative => "CREATIVE",
///     }
/// }
///
/// use treeconf::ConfigEnum;
/// assert_eq!(GameMode::from_name("CREATIVE"), Some(GameMode::Creative));
/// assert_eq!(GameMode::from_name("creative"), None);
/// assert_eq!(GameMode::Survival.name(), "SURVIVAL");
/// ```
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::ConfigEnum for $name {
            const NAMES: &'static [&'static str] = &[$($text),+];

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    $($text => ::core::option::Option::Some(Self::$variant),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl $crate::Property for $name {
            fn kind() -> $crate::Kind {
                $crate::Kind::Enum
            }

            fn read_element(
                element: &$crate::tree::Element,
                _ctx: &$crate::Context<'_>,
            ) -> $crate::Result<Self> {
                $crate::property::read_enum(element)
            }

            fn write_element(
                &self,
                element: &mut $crate::tree::Element,
                _ctx: &$crate::Context<'_>,
            ) -> $crate::Result<()> {
                $crate::property::write_enum(self, element)
            }
        }
    };
}

/// Registers types implementing [`Object`](crate::Object) as nested objects.
///
/// After registration a type can be used as a field of another object, as a
/// list item or as a map value.
#[macro_export]
macro_rules! config_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Property for $ty {
                fn kind() -> $crate::Kind {
                    $crate::Kind::Object
                }

                fn read_element(
                    element: &$crate::tree::Element,
                    ctx: &$crate::Context<'_>,
                ) -> $crate::Result<Self> {
                    $crate::engine::read_object(element, ctx)
                }

                fn write_element(
                    &self,
                    element: &mut $crate::tree::Element,
                    ctx: &$crate::Context<'_>,
                ) -> $crate::Result<()> {
                    $crate::engine::write_object(self, element, ctx)
                }
            }
        )+
    };
}
