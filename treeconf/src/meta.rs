//! Declarative metadata of configuration types.
//!
//! A configuration type is described once, by a [`Descriptor`] listing its
//! fields. Each [`Field`] names the Rust field, how to reach it, and how it
//! appears in the tree:
//!
//! ```rust
//! use std::sync::OnceLock;
//! use treeconf::{Configuration, Descriptor, Field, Object, config_object};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Greeter {
//!     motd: String,
//!     max_players: u32,
//! }
//!
//! impl Object for Greeter {
//!     fn empty() -> Self {
//!         Self::default()
//!     }
//!
//!     fn descriptor() -> &'static Descriptor<Self> {
//!         static DESCRIPTOR: OnceLock<Descriptor<Greeter>> = OnceLock::new();
//!         DESCRIPTOR.get_or_init(|| {
//!             Descriptor::builder()
//!                 .field(
//!                     Field::new("motd", |c: &Greeter| &c.motd, |c| &mut c.motd)
//!                         .element("message")
//!                         .comment("Shown to players when they join"),
//!                 )
//!                 .field(
//!                     Field::new("max_players", |c: &Greeter| &c.max_players, |c| {
//!                         &mut c.max_players
//!                     })
//!                     .wrapper("limits"),
//!                 )
//!                 .build()
//!         })
//!     }
//! }
//!
//! impl Configuration for Greeter {
//!     const ROOT: &'static str = "greeter";
//!     const NAMESPACE: &'static str = "urn:example:greeter";
//! }
//!
//! config_object!(Greeter);
//! ```

use std::{any::type_name, collections::HashSet, sync::OnceLock};

use crate::{
    engine::Context,
    error::{ProcessorError, Result},
    kind::Kind,
    property::Property,
    tree::Element,
};

/// A type whose fields are marshalled through a [`Descriptor`].
pub trait Object: Sized + 'static {
    /// A fresh value used as the starting point of a load.
    ///
    /// Fields missing from the document keep the value they have here.
    fn empty() -> Self;

    /// The field metadata of this type, built once and shared.
    fn descriptor() -> &'static Descriptor<Self>;
}

/// An [`Object`] that can be the root of a configuration document.
pub trait Configuration: Object {
    /// Name of the root element.
    const ROOT: &'static str;
    /// Namespace URI of every element in the document.
    const NAMESPACE: &'static str;
}

type ReadFn<T> = Box<dyn Fn(&mut T, &Element, &str, &Context<'_>) -> Result<()> + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&T, &mut Element, &str, &Context<'_>) -> Result<()> + Send + Sync>;

/// Metadata of a single field.
pub struct Field<T> {
    name: &'static str,
    element: Option<String>,
    wrapper: Option<String>,
    comment: Option<String>,
    required: bool,
    kind: Kind,
    type_name: &'static str,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T: 'static> Field<T> {
    /// Describes field `name` of `T`, reached through `get` and `get_mut`.
    ///
    /// The element name defaults to `name`.
    pub fn new<V: Property + 'static>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        Self {
            name,
            element: None,
            wrapper: None,
            comment: None,
            required: false,
            kind: V::kind(),
            type_name: type_name::<V>(),
            read: Box::new(
                move |target: &mut T,
                      parent: &Element,
                      element: &str,
                      ctx: &Context<'_>|
                      -> Result<()> {
                    *get_mut(target) = V::read_field(parent, element, ctx)?;
                    Ok(())
                },
            ),
            write: Box::new(
                move |source: &T,
                      parent: &mut Element,
                      element: &str,
                      ctx: &Context<'_>|
                      -> Result<()> {
                    get(source).write_field(parent, element, ctx)
                },
            ),
        }
    }
}

impl<T> Field<T> {
    /// Stores the field under `element` instead of the field name.
    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Groups the field under an intermediate `wrapper` element.
    ///
    /// Fields of the same object sharing a wrapper name share one wrapper element.
    pub fn wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    /// Emits `comment` right before the field's element on save.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Makes load failures of this field fail the whole load.
    ///
    /// By default a field that is missing or unreadable keeps its value from
    /// [`Object::empty`].
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The Rust field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The element name used in the tree.
    pub fn element_name(&self) -> &str {
        self.element.as_deref().unwrap_or(self.name)
    }

    /// The wrapper element name, if any.
    pub fn wrapper_name(&self) -> Option<&str> {
        self.wrapper.as_deref()
    }

    /// The comment emitted on save, if any.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether load failures of this field propagate.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Classification of the field's type.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Rust type name of the field.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Decodes this field from `parent` into `target`.
    ///
    /// `target` is left untouched on failure.
    pub(crate) fn read_into(
        &self,
        target: &mut T,
        parent: &Element,
        ctx: &Context<'_>,
    ) -> Result<()> {
        (self.read)(target, parent, self.element_name(), ctx)
    }

    /// Encodes this field of `source` into `parent`.
    pub(crate) fn write_from(
        &self,
        source: &T,
        parent: &mut Element,
        ctx: &Context<'_>,
    ) -> Result<()> {
        (self.write)(source, parent, self.element_name(), ctx)
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("element", &self.element_name())
            .field("wrapper", &self.wrapper)
            .field("comment", &self.comment)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Field metadata of an [`Object`] type.
#[derive(Debug)]
pub struct Descriptor<T> {
    type_name: &'static str,
    fields: Vec<Field<T>>,
    checked: OnceLock<std::result::Result<(), ProcessorError>>,
}

impl<T: 'static> Descriptor<T> {
    /// Starts describing `T`.
    pub fn builder() -> DescriptorBuilder<T> {
        DescriptorBuilder { fields: Vec::new() }
    }
}

impl<T> Descriptor<T> {
    /// Rust type name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order. Save emits them in this order.
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Looks up a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks that every declared name is a valid element name, that no two
    /// fields occupy the same element and that no wrapper shares its name with
    /// an unwrapped property element.
    ///
    /// The check runs once per descriptor; later calls return the first result.
    pub fn validate(&self) -> std::result::Result<(), ProcessorError> {
        self.checked.get_or_init(|| self.check()).clone()
    }

    fn check(&self) -> std::result::Result<(), ProcessorError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let names = std::iter::once(field.element_name()).chain(field.wrapper_name());
            for name in names {
                if !is_valid_name(name) {
                    return Err(ProcessorError::InvalidName {
                        owner: format!("{}::{}", self.type_name, field.name),
                        name: name.to_string(),
                    });
                }
            }
            if !seen.insert((field.wrapper_name(), field.element_name())) {
                return Err(ProcessorError::DuplicateElement {
                    owner: self.type_name.to_string(),
                    element: field.element_name().to_string(),
                });
            }
        }

        let unwrapped: HashSet<&str> = self
            .fields
            .iter()
            .filter(|f| f.wrapper_name().is_none())
            .map(|f| f.element_name())
            .collect();
        for field in &self.fields {
            if let Some(wrapper) = field.wrapper_name().filter(|w| unwrapped.contains(w)) {
                return Err(ProcessorError::WrapperCollision {
                    wrapper: wrapper.to_string(),
                    property: field.element_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`Descriptor`].
pub struct DescriptorBuilder<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> DescriptorBuilder<T> {
    /// Appends a field.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> Descriptor<T> {
        Descriptor {
            type_name: type_name::<T>(),
            fields: self.fields,
            checked: OnceLock::new(),
        }
    }
}

/// Whether `name` can be used as an unprefixed XML element name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Limits {
        players: u32,
        worlds: Vec<String>,
    }

    #[test]
    fn test_field_defaults() {
        let field = Field::new("players", |l: &Limits| &l.players, |l| &mut l.players);
        assert_eq!(field.name(), "players");
        assert_eq!(field.element_name(), "players");
        assert_eq!(field.wrapper_name(), None);
        assert!(!field.is_required());
        assert_eq!(field.kind(), &Kind::Integer);
        assert_eq!(field.type_name(), "u32");

        let field = field.element("max").wrapper("limits").comment("cap").required();
        assert_eq!(field.element_name(), "max");
        assert_eq!(field.wrapper_name(), Some("limits"));
        assert_eq!(field.comment_text(), Some("cap"));
        assert!(field.is_required());
    }

    #[test]
    fn test_field_accessors() {
        let field = Field::new("worlds", |l: &Limits| &l.worlds, |l| &mut l.worlds);
        assert_eq!(field.kind(), &Kind::List(Box::new(Kind::String)));

        let ctx = Context::new("urn:x");
        let mut limits = Limits::default();
        limits.worlds = vec!["nether".into(), "end".into()];

        let mut element = Element::new("urn:x", "limits");
        field.write_from(&limits, &mut element, &ctx).unwrap();
        assert_eq!(element.children_named("urn:x", "worlds").count(), 2);

        let mut loaded = Limits::default();
        field.read_into(&mut loaded, &element, &ctx).unwrap();
        assert_eq!(loaded.worlds, limits.worlds);
    }

    #[test]
    fn test_validate() {
        let descriptor = Descriptor::builder()
            .field(Field::new("players", |l: &Limits| &l.players, |l| &mut l.players))
            .field(
                Field::new("worlds", |l: &Limits| &l.worlds, |l| &mut l.worlds).wrapper("limits"),
            )
            .build();
        assert!(descriptor.validate().is_ok());
        assert!(descriptor.field("worlds").is_some());
        assert!(descriptor.type_name().ends_with("Limits"));

        let descriptor = Descriptor::builder()
            .field(Field::new("players", |l: &Limits| &l.players, |l| &mut l.players))
            .field(
                Field::new("worlds", |l: &Limits| &l.worlds, |l| &mut l.worlds).element("players"),
            )
            .build();
        assert!(matches!(
            descriptor.validate(),
            Err(ProcessorError::DuplicateElement { ref element, .. }) if element == "players"
        ));

        let descriptor = Descriptor::builder()
            .field(
                Field::new("players", |l: &Limits| &l.players, |l| &mut l.players).element("1st"),
            )
            .build();
        assert!(matches!(
            descriptor.validate(),
            Err(ProcessorError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_validate_wrapper_collision() {
        // The wrapped field comes first so the clash is visible without any data.
        let descriptor = Descriptor::builder()
            .field(
                Field::new("worlds", |l: &Limits| &l.worlds, |l| &mut l.worlds).wrapper("players"),
            )
            .field(Field::new("players", |l: &Limits| &l.players, |l| &mut l.players))
            .build();
        match descriptor.validate() {
            Err(ProcessorError::WrapperCollision { wrapper, property }) => {
                assert_eq!(wrapper, "players");
                assert_eq!(property, "worlds");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_runs_once() {
        let descriptor = Descriptor::builder()
            .field(
                Field::new("players", |l: &Limits| &l.players, |l| &mut l.players).element("a b"),
            )
            .build();
        assert!(descriptor.checked.get().is_none());
        let first = descriptor.validate().unwrap_err().to_string();
        assert!(descriptor.checked.get().is_some());
        assert_eq!(descriptor.validate().unwrap_err().to_string(), first);

        let descriptor = Descriptor::builder()
            .field(Field::new("players", |l: &Limits| &l.players, |l| &mut l.players))
            .build();
        assert!(descriptor.validate().is_ok());
        assert!(matches!(descriptor.checked.get(), Some(Ok(()))));
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("motd"));
        assert!(is_valid_name("max-players"));
        assert!(is_valid_name("_x.y"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("9lives"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("c:name"));
    }
}
