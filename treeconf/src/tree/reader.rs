//! Parsing of XML documents into [`Element`] trees.

use std::io::BufRead;

use quick_xml::{
    events::{BytesStart, Event},
    name::ResolveResult,
    reader::NsReader,
};

use crate::{error::LoadError, tree::Element};

/// Parses a complete document and returns its root element.
///
/// Element names are resolved against the namespace declarations in scope, so
/// `<c:server xmlns:c="urn:x">` and `<server xmlns="urn:x">` produce the same
/// element. Comments are kept, processing instructions and the declaration are
/// dropped.
pub fn parse<R: BufRead>(input: R) -> Result<Element, LoadError> {
    let mut reader = NsReader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(start) => stack.push(open(&ns, &start)?),
            Event::Empty(start) => {
                let element = open(&ns, &start)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    close(element, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(text.unescape()?.into_owned());
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(String::from_utf8_lossy(&data).into_owned());
                }
            }
            Event::Comment(comment) => {
                if let Some(current) = stack.last_mut() {
                    current.push_comment(String::from_utf8_lossy(&comment).trim().to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or(LoadError::NoRoot)
}

fn open(ns: &ResolveResult, start: &BytesStart) -> Result<Element, LoadError> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        _ => String::new(),
    };
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = Element::new(namespace, name);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.set_attribute(key, value);
    }

    Ok(element)
}

fn close(mut element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) {
    element.strip_layout_whitespace();
    match stack.last_mut() {
        Some(parent) => {
            parent.push_element(element);
        }
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_namespace() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<server xmlns="urn:greeter">
    <!-- greeting shown on join -->
    <motd>Welcome &amp; enjoy</motd>
    <limits>
        <players>20</players>
    </limits>
    <entry key="a">1</entry>
</server>"#;
        let root = parse(doc.as_bytes()).unwrap();
        assert!(root.is("urn:greeter", "server"));
        assert_eq!(
            root.child("urn:greeter", "motd").map(|e| e.text()),
            Some("Welcome & enjoy".to_string())
        );
        let players = root
            .child("urn:greeter", "limits")
            .and_then(|l| l.child("urn:greeter", "players"))
            .map(|e| e.text());
        assert_eq!(players, Some("20".to_string()));
        assert_eq!(
            root.child("urn:greeter", "entry").and_then(|e| e.attribute("key")),
            Some("a")
        );
        assert!(root
            .nodes()
            .iter()
            .any(|n| matches!(n, crate::tree::Node::Comment(c) if c == "greeting shown on join")));
    }

    #[test]
    fn test_parse_prefixed_namespace() {
        let doc = concat!(
            r#"<c:server xmlns:c="urn:greeter">"#,
            "<c:motd>hi</c:motd><motd>plain</motd>",
            "</c:server>",
        );
        let root = parse(doc.as_bytes()).unwrap();
        assert!(root.is("urn:greeter", "server"));
        assert_eq!(root.child("urn:greeter", "motd").map(|e| e.text()), Some("hi".into()));
        assert_eq!(root.child("", "motd").map(|e| e.text()), Some("plain".into()));
        assert!(root.attributes().is_empty());
    }

    #[test]
    fn test_parse_keeps_leaf_whitespace() {
        let root = parse(r#"<a><b>  spaced  </b><c><![CDATA[<raw>]]></c></a>"#.as_bytes()).unwrap();
        assert_eq!(root.child("", "b").map(|e| e.text()), Some("  spaced  ".into()));
        assert_eq!(root.child("", "c").map(|e| e.text()), Some("<raw>".into()));
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse("<a><b></a>".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_parse_empty() {
        let err = parse("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoRoot));
    }
}
