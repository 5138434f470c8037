//! Error types for loading and saving configurations.
//!
//! Three kinds of failure are distinguished:
//!
//! - [`LoadError`] - the input document is bad (malformed, missing elements,
//!   unparseable values).
//! - [`SaveError`] - the tree could not be written, or a value has no tree form.
//! - [`ProcessorError`] - the declared metadata of a type is wrong. These are
//!   programming mistakes and retrying will not help.

use std::io;

use thiserror::Error;

/// Top-level error returned by [`Processor`](crate::Processor) operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The input document could not be turned into an object.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed document: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("cannot read configuration: {0}")]
    Io(#[source] io::Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("unexpected root element `{found}`, expected `{expected}`")]
    RootMismatch { expected: String, found: String },

    #[error("missing element `{0}`")]
    MissingElement(String),

    #[error("invalid {kind} value `{value}` in `{element}`: {reason}")]
    InvalidValue {
        element: String,
        kind: String,
        value: String,
        reason: String,
    },

    #[error("unknown value `{value}` in `{element}`, expected one of: {expected:?}")]
    UnknownVariant {
        element: String,
        value: String,
        expected: Vec<&'static str>,
    },
}

/// The object could not be written out.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot write configuration: {0}")]
    Io(#[source] io::Error),

    #[error("failed to serialize document: {0}")]
    Write(String),

    #[error("field `{field}` of type `{type_name}` cannot be stored in configuration files")]
    Unclassifiable {
        field: String,
        type_name: &'static str,
    },
}

/// The declared metadata of a configuration type is inconsistent.
#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    #[error("wrapper `{wrapper}` of property `{property}` collides with a property element")]
    WrapperCollision { wrapper: String, property: String },

    #[error("wrapper `{wrapper}` of required property `{property}` not found")]
    MissingWrapper { wrapper: String, property: String },

    #[error("`{0}` cannot be nested directly inside another collection")]
    NestedCollection(&'static str),

    #[error("type `{0}` has no tree representation and cannot be decoded")]
    OpaqueDecode(&'static str),

    #[error("invalid element name `{name}` declared for `{owner}`")]
    InvalidName { owner: String, name: String },

    #[error("element `{element}` is declared more than once in `{owner}`")]
    DuplicateElement { owner: String, element: String },
}

impl LoadError {
    /// Builds an [`LoadError::InvalidValue`] from any displayable parse failure.
    pub fn invalid_value(
        element: &str,
        kind: impl ToString,
        value: &str,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            element: element.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl SaveError {
    /// Wraps a failure of the tree-to-stream transform.
    pub fn write(err: impl std::fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}
