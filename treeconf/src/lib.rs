//! # treeconf - declarative configuration trees
//!
//! Marshalling between typed configuration objects and namespaced XML
//! documents, driven by per-field metadata instead of hand-written
//! (de)serialization code.
//!
//! ## Features
//!
//! - Field metadata declared once: element name, wrapper grouping, comments,
//!   required flag
//! - Booleans, numbers, strings, enumerations, lists, string-keyed maps and
//!   nested objects
//! - Fields missing from a document keep their defaults
//! - Comments written ahead of the elements they describe
//! - Atomic file saves, timestamped backups and "create on first start"
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::OnceLock;
//! use treeconf::{Configuration, Descriptor, Field, Object, Processor, config_enum};
//!
//! config_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub enum Mode {
//!         Survival => "SURVIVAL",
//!         Creative => "CREATIVE",
//!     }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct Lobby {
//!     motd: String,
//!     mode: Mode,
//!     worlds: Vec<String>,
//! }
//!
//! impl Object for Lobby {
//!     fn empty() -> Self {
//!         Self {
//!             motd: "Welcome".into(),
//!             mode: Mode::Survival,
//!             worlds: vec!["world".into()],
//!         }
//!     }
//!
//!     fn descriptor() -> &'static Descriptor<Self> {
//!         static DESCRIPTOR: OnceLock<Descriptor<Lobby>> = OnceLock::new();
//!         DESCRIPTOR.get_or_init(|| {
//!             Descriptor::builder()
//!                 .field(Field::new("motd", |l: &Lobby| &l.motd, |l| &mut l.motd))
//!                 .field(Field::new("mode", |l: &Lobby| &l.mode, |l| &mut l.mode))
//!                 .field(
//!                     Field::new("worlds", |l: &Lobby| &l.worlds, |l| &mut l.worlds)
//!                         .element("world")
//!                         .wrapper("worlds"),
//!                 )
//!                 .build()
//!         })
//!     }
//! }
//!
//! impl Configuration for Lobby {
//!     const ROOT: &'static str = "lobby";
//!     const NAMESPACE: &'static str = "urn:example:lobby";
//! }
//!
//! let processor = Processor::<Lobby>::new()?;
//! let lobby = processor.load_str(
//!     r#"<lobby xmlns="urn:example:lobby">
//!          <mode>CREATIVE</mode>
//!          <worlds><world>hub</world><world>arena</world></worlds>
//!        </lobby>"#,
//! )?;
//! assert_eq!(lobby.motd, "Welcome");
//! assert_eq!(lobby.mode, Mode::Creative);
//! assert_eq!(lobby.worlds, ["hub", "arena"]);
//! # Ok::<(), treeconf::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`meta`] - field metadata and the [`Object`] / [`Configuration`] traits
//! - [`property`] - per-type marshalling strategies
//! - [`engine`] - the recursive object walkers
//! - [`tree`] - element trees and their XML form
//! - [`processor`] - load / save entry points and file helpers

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod engine;
pub mod error;
pub mod kind;
pub mod meta;
pub mod processor;
pub mod property;
pub mod tree;

pub use engine::Context;
pub use error::{Error, LoadError, ProcessorError, Result, SaveError};
pub use kind::{Kind, classify};
pub use meta::{Configuration, Descriptor, DescriptorBuilder, Field, Object};
pub use processor::Processor;
pub use property::{ConfigEnum, Opaque, Property};
