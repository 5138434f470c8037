//! Namespaced element trees and their XML form.
//!
//! The marshalling engine only needs a narrow set of tree operations: create
//! an element, find children by qualified name, read and write text and
//! attributes, and add comments. [`Element`] provides exactly that, and
//! [`parse`] / [`write`] move trees in and out of byte streams using
//! `quick-xml`.

mod element;
mod reader;
mod writer;

pub use element::{Element, Node};
pub use reader::parse;
pub use writer::{DEFAULT_INDENT, write};
