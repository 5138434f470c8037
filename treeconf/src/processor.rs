//! Load and save entry points bound to one configuration type.

use std::{
    any::type_name,
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tempfile::NamedTempFile;

use crate::{
    engine::{Context, read_object, write_object},
    error::{LoadError, ProcessorError, Result, SaveError},
    meta::{Configuration, is_valid_name},
    tree::{self, DEFAULT_INDENT, Element},
};

/// Reads and writes documents of the configuration type `T`.
///
/// ```rust
/// # use std::sync::OnceLock;
/// # use treeconf::{Configuration, Descriptor, Field, Object, Processor};
/// # #[derive(Debug, Default, PartialEq)]
/// # struct Motd { text: String }
/// # impl Object for Motd {
/// #     fn empty() -> Self { Self { text: "Welcome!".into() } }
/// #     fn descriptor() -> &'static Descriptor<Self> {
/// #         static D: OnceLock<Descriptor<Motd>> = OnceLock::new();
/// #         D.get_or_init(|| {
/// #             Descriptor::builder()
/// #                 .field(Field::new("text", |m: &Motd| &m.text, |m| &mut m.text))
/// #                 .build()
/// #         })
/// #     }
/// # }
/// # impl Configuration for Motd {
/// #     const ROOT: &'static str = "motd";
/// #     const NAMESPACE: &'static str = "urn:example:motd";
/// # }
/// let processor = Processor::<Motd>::new()?;
/// let xml = processor.save_to_string(&Motd::empty())?;
/// assert_eq!(processor.load_str(&xml)?, Motd::empty());
/// # Ok::<(), treeconf::Error>(())
/// ```
pub struct Processor<T> {
    indent: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Configuration> Processor<T> {
    /// Creates a processor after checking the root descriptor of `T`.
    ///
    /// # Errors
    ///
    /// [`ProcessorError::InvalidName`] for a root, element or wrapper name that
    /// is not a valid element name, [`ProcessorError::DuplicateElement`] when two
    /// fields would be stored in the same element, and
    /// [`ProcessorError::WrapperCollision`] when a wrapper is named like a
    /// property element.
    pub fn new() -> std::result::Result<Self, ProcessorError> {
        if !is_valid_name(T::ROOT) {
            return Err(ProcessorError::InvalidName {
                owner: type_name::<T>().to_string(),
                name: T::ROOT.to_string(),
            });
        }
        T::descriptor().validate()?;
        Ok(Self {
            indent: DEFAULT_INDENT,
            _marker: PhantomData,
        })
    }

    /// Sets the indentation width used by save.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Indentation width used by save.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Decodes a document from `reader`.
    pub fn load<R: BufRead>(&self, reader: R) -> Result<T> {
        let root = tree::parse(reader)?;
        if !root.is(T::NAMESPACE, T::ROOT) {
            return Err(LoadError::RootMismatch {
                expected: qualified(T::NAMESPACE, T::ROOT),
                found: qualified(root.namespace(), root.name()),
            }
            .into());
        }
        read_object(&root, &Context::new(T::NAMESPACE))
    }

    /// Encodes `value` as a document into `writer`.
    pub fn save<W: Write>(&self, value: &T, writer: W) -> Result<()> {
        let mut root = Element::new(T::NAMESPACE, T::ROOT);
        write_object(value, &mut root, &Context::new(T::NAMESPACE))?;
        tree::write(&root, writer, self.indent)?;
        Ok(())
    }

    pub fn load_str(&self, document: &str) -> Result<T> {
        self.load(document.as_bytes())
    }

    pub fn save_to_string(&self, value: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.save(value, &mut buf)?;
        String::from_utf8(buf).map_err(|e| SaveError::write(e).into())
    }

    /// Loads the document stored at `path`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        let file = File::open(path).map_err(LoadError::Io)?;
        debug!("loading {}", path.display());
        self.load(BufReader::new(file))
    }

    /// Saves `value` to `path`.
    ///
    /// The document is written to a temporary file next to `path` which then
    /// replaces it, so a failed save leaves an existing file untouched.
    pub fn save_file(&self, value: &T, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(SaveError::Io)?;
        self.save(value, BufWriter::new(tmp.as_file_mut()))?;
        tmp.persist(path).map_err(|e| SaveError::Io(e.error))?;

        debug!("wrote {}", path.display());
        Ok(())
    }

    /// Saves `value` to `path`, first copying an existing file aside.
    ///
    /// The copy is named `<stem>.bk-<unix seconds>.<ext>`. Returns its path,
    /// or `None` when there was nothing to back up.
    pub fn save_file_with_backup(
        &self,
        value: &T,
        path: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let backup = if path.exists() {
            let backup = backup_path(path).map_err(SaveError::Io)?;
            fs::copy(path, &backup).map_err(SaveError::Io)?;
            debug!("backed up {} to {}", path.display(), backup.display());
            Some(backup)
        } else {
            None
        };
        self.save_file(value, path)?;
        Ok(backup)
    }

    /// Loads `path`, or writes [`Object::empty`](crate::Object::empty) to it
    /// and returns that value if the file does not exist yet.
    pub fn load_or_create(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        if path.exists() {
            return self.load_file(path);
        }
        info!("creating default configuration at {}", path.display());
        let value = T::empty();
        self.save_file(&value, path)?;
        Ok(value)
    }
}

impl<T> std::fmt::Debug for Processor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("type", &type_name::<T>())
            .field("indent", &self.indent)
            .finish()
    }
}

fn qualified(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{{{namespace}}}{name}")
    }
}

fn backup_path(path: &Path) -> io::Result<PathBuf> {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(io::Error::other)?
        .as_secs();
    let bk = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("bk-{secs}.{ext}"),
        None => format!("bk-{secs}"),
    };
    Ok(path.with_extension(bk))
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use crate::{
        error::Error,
        meta::{Descriptor, Field, Object},
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Motd {
        text: String,
        slots: u32,
    }

    impl Object for Motd {
        fn empty() -> Self {
            Self {
                text: "Welcome!".into(),
                slots: 20,
            }
        }

        fn descriptor() -> &'static Descriptor<Self> {
            static DESCRIPTOR: OnceLock<Descriptor<Motd>> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| {
                Descriptor::builder()
                    .field(
                        Field::new("text", |m: &Motd| &m.text, |m| &mut m.text)
                            .comment("join message"),
                    )
                    .field(
                        Field::new("slots", |m: &Motd| &m.slots, |m| &mut m.slots)
                            .wrapper("limits"),
                    )
                    .build()
            })
        }
    }

    impl Configuration for Motd {
        const ROOT: &'static str = "motd";
        const NAMESPACE: &'static str = "urn:treeconf:motd";
    }

    #[derive(Debug, Default)]
    struct BadRoot;

    impl Object for BadRoot {
        fn empty() -> Self {
            BadRoot
        }

        fn descriptor() -> &'static Descriptor<Self> {
            static DESCRIPTOR: OnceLock<Descriptor<BadRoot>> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| Descriptor::builder().build())
        }
    }

    impl Configuration for BadRoot {
        const ROOT: &'static str = "bad root";
        const NAMESPACE: &'static str = "";
    }

    fn processor() -> Processor<Motd> {
        Processor::new().unwrap()
    }

    #[test]
    fn test_new_validates_root() {
        let err = Processor::<BadRoot>::new().unwrap_err();
        assert!(matches!(err, ProcessorError::InvalidName { ref name, .. } if name == "bad root"));
    }

    #[test]
    fn test_save_layout() {
        let xml = processor().with_indent(2).save_to_string(&Motd::empty()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <motd xmlns=\"urn:treeconf:motd\">\n\
             \x20 <!-- join message -->\n\
             \x20 <text>Welcome!</text>\n\
             \x20 <limits>\n\
             \x20   <slots>20</slots>\n\
             \x20 </limits>\n\
             </motd>\n"
        );
    }

    #[test]
    fn test_root_mismatch() {
        let err = processor()
            .load_str(r#"<other xmlns="urn:treeconf:motd"/>"#)
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::RootMismatch { .. })));

        let err = processor().load_str("<motd/>").unwrap_err();
        match err {
            Error::Load(LoadError::RootMismatch { expected, found }) => {
                assert_eq!(expected, "{urn:treeconf:motd}motd");
                assert_eq!(found, "motd");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed() {
        let err = processor()
            .load_str(r#"<motd xmlns="urn:treeconf:motd"><text>hi</motd>"#)
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::Malformed(_))));
        assert!(matches!(
            processor().load_str("").unwrap_err(),
            Error::Load(LoadError::NoRoot)
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motd.xml");
        let value = Motd {
            text: "Be nice".into(),
            slots: 64,
        };

        processor().save_file(&value, &path).unwrap();
        assert_eq!(processor().load_file(&path).unwrap(), value);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let err = processor().load_file(dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::Io(_))));
    }

    #[test]
    fn test_save_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motd.xml");

        assert_eq!(processor().save_file_with_backup(&Motd::empty(), &path).unwrap(), None);

        let mut value = Motd::empty();
        value.slots = 5;
        let backup = processor()
            .save_file_with_backup(&value, &path)
            .unwrap()
            .unwrap();

        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("motd.bk-"));
        assert!(name.ends_with(".xml"));
        assert_eq!(processor().load_file(&backup).unwrap(), Motd::empty());
        assert_eq!(processor().load_file(&path).unwrap(), value);
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motd.xml");

        let created = processor().load_or_create(&path).unwrap();
        assert_eq!(created, Motd::empty());
        assert!(path.exists());

        let mut edited = created.clone();
        edited.text = "Edited".into();
        processor().save_file(&edited, &path).unwrap();
        assert_eq!(processor().load_or_create(&path).unwrap(), edited);
    }
}
