//! Serialization of [`Element`] trees into indented UTF-8 XML.

use std::io::Write;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::SaveError,
    tree::{Element, Node},
};

/// Default indentation width in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Writes `root` as a complete document, including the XML declaration.
///
/// The namespace of each element is declared as the default namespace
/// whenever it differs from the one in scope, so a tree whose elements all
/// share the root namespace carries a single `xmlns` on the root.
pub fn write<W: Write>(root: &Element, out: W, indent: usize) -> Result<(), SaveError> {
    let mut writer = if indent > 0 {
        Writer::new_with_indent(out, b' ', indent)
    } else {
        Writer::new(out)
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(SaveError::write)?;
    write_element(&mut writer, root, "")?;

    let out = writer.get_mut();
    out.write_all(b"\n").map_err(SaveError::Io)?;
    out.flush().map_err(SaveError::Io)?;
    Ok(())
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    scope: &str,
) -> Result<(), SaveError> {
    let mut start = BytesStart::new(element.name());
    if element.namespace() != scope {
        start.push_attribute(("xmlns", element.namespace()));
    }
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.nodes().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(SaveError::write);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(SaveError::write)?;
    for node in element.nodes() {
        match node {
            Node::Element(child) => write_element(writer, child, element.namespace())?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(SaveError::write)?,
            Node::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(comment_body(comment))))
                .map_err(SaveError::write)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(SaveError::write)
}

/// `--` may not appear inside a comment.
fn comment_body(comment: &str) -> String {
    let mut body = comment.replace("--", "- -");
    if body.ends_with('-') {
        body.push(' ');
    }
    format!(" {body} ")
}
