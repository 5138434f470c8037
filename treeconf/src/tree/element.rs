//! In-memory namespaced element tree.

/// A node in the children list of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (already unescaped).
    Text(String),
    /// Comment text, without the `<!--` / `-->` delimiters.
    Comment(String),
}

/// A namespace-qualified element.
///
/// Children are kept in document order, mixing elements, text and comments.
/// Attributes keep their insertion order so that saved files are stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    namespace: String,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element. An empty `namespace` means "no namespace".
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI of the element, empty when unqualified.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether this element has the given qualified name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }

    /// All child nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Child elements with the given qualified name, in document order.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |el| el.is(namespace, name))
    }

    /// First child element with the given qualified name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(namespace, name))
    }

    /// Mutable access to the first child element with the given qualified name.
    pub fn child_mut(&mut self, namespace: &str, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.is(namespace, name) => Some(el),
            _ => None,
        })
    }

    /// Whether a child element with the given qualified name exists.
    pub fn has_child(&self, namespace: &str, name: &str) -> bool {
        self.child(namespace, name).is_some()
    }

    /// Concatenated text content of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replaces all text children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|node| !matches!(node, Node::Text(_)));
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    /// Value of an unqualified attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets an attribute, replacing an existing value of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, current)) => *current = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Appends a child element and returns a reference to it.
    pub fn push_element(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Returns the first child element with the given name, creating it if needed.
    pub fn child_or_insert(&mut self, namespace: &str, name: &str) -> &mut Element {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.is(namespace, name)));
        match position {
            Some(idx) => match &mut self.children[idx] {
                Node::Element(el) => el,
                _ => unreachable!("position matched an element"),
            },
            None => self.push_element(Element::new(namespace, name)),
        }
    }

    /// Appends a comment node.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(Node::Comment(comment.into()));
    }

    /// Appends a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Drops whitespace-only text between child elements.
    ///
    /// Leaf elements keep their text untouched.
    pub(crate) fn strip_layout_whitespace(&mut self) {
        if self.elements().next().is_none() {
            return;
        }
        self.children.retain(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            _ => true,
        });
    }
}
