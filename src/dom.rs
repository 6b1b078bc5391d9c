//! Mutable XML tree for sprite frame documents
//!
//! roxmltree gives us fast, well-tested parsing but a read-only view, so the
//! parsed document is lifted into an owned tree that the substitution and
//! recoloring passes can mutate, then serialized back to text. Attribute
//! order is preserved so diffs between input and output stay readable; exact
//! whitespace of the original markup is not guaranteed.

use thiserror::Error;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Error type for document parsing failures.
#[derive(Debug, Error)]
#[error("malformed XML: {0}")]
pub struct ParseError(#[from] roxmltree::Error);

/// A node in the owned tree. Processing instructions are dropped at parse
/// time; text and comments round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with ordered attributes and child nodes.
///
/// Names are stored qualified (`use`, `xlink:href`, `ffdec:characterName`)
/// exactly as they appear in the source, with namespace declarations
/// reconstructed as ordinary `xmlns`/`xmlns:*` attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element { name: name.into(), attributes: Vec::new(), children: Vec::new() }
    }

    /// Get an attribute value by its qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place so attribute
    /// order stays stable.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The reference target of a `<use>` element, trying the SVG 2 `href`
    /// form first and falling back to `xlink:href`.
    pub fn href(&self) -> Option<&str> {
        self.attr("href").or_else(|| self.attr("xlink:href"))
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Mutable access to direct child elements, in document order.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Visit this element and every descendant element, document order.
    pub fn walk(&self, visit: &mut impl FnMut(&Element)) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }

    /// Mutable variant of [`walk`](Self::walk).
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in self.child_elements_mut() {
            child.walk_mut(visit);
        }
    }

    /// Find the first element in this subtree (self included) with the given
    /// id, document order.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_by_id(id))
    }

    /// Mutable variant of [`find_by_id`](Self::find_by_id).
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements_mut().find_map(|child| child.find_by_id_mut(id))
    }
}

/// A parsed sprite frame document.
///
/// Id lookups return the *first* match in document order. SVG ids are
/// supposed to be unique and the source format keeps them so; a document with
/// duplicate ids is not rejected, but lookups on it are first-match and the
/// later duplicates are unreachable.
#[derive(Debug, Clone)]
pub struct SpriteDocument {
    root: Element,
}

impl SpriteDocument {
    /// Parse a document from XML text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(SpriteDocument { root: convert_element(doc.root_element()) })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// First element with the given id, document order.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find_by_id(id)
    }

    /// Mutable variant of [`find_by_id`](Self::find_by_id).
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_by_id_mut(id)
    }

    /// Serialize back to XML text. Attribute order and child order match the
    /// in-memory tree; no XML declaration is emitted.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, &self.root);
        out
    }
}

/// Qualified tag name (`prefix:local` when the element's namespace is bound
/// to a prefix, plain local name otherwise).
fn qualified_tag_name(node: roxmltree::Node<'_, '_>) -> String {
    let local = node.tag_name().name();
    match node.tag_name().namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}

/// Qualified attribute name. Unprefixed attributes have no namespace.
fn qualified_attr_name(node: roxmltree::Node<'_, '_>, attr: &roxmltree::Attribute<'_, '_>) -> String {
    match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, attr.name()),
        _ => attr.name().to_string(),
    }
}

fn scope_of(node: roxmltree::Node<'_, '_>) -> Vec<(Option<String>, String)> {
    node.namespaces()
        .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
        .collect()
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(qualified_tag_name(node));

    // Namespace declarations introduced on this element: everything in scope
    // here that was not already in scope on the parent.
    let parent_scope = node.parent().map(scope_of).unwrap_or_default();
    for ns in node.namespaces() {
        if ns.uri() == XML_NS {
            continue;
        }
        let entry = (ns.name().map(str::to_string), ns.uri().to_string());
        if !parent_scope.contains(&entry) {
            let attr_name = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            element.attributes.push((attr_name, ns.uri().to_string()));
        }
    }

    for attr in node.attributes() {
        element.attributes.push((qualified_attr_name(node, &attr), attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(XmlNode::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(XmlNode::Text(text.to_string()));
            }
        } else if child.is_comment() {
            if let Some(text) = child.text() {
                element.children.push(XmlNode::Comment(text.to_string()));
            }
        }
    }

    element
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(out, el),
            XmlNode::Text(text) => escape_into(out, text, false),
            XmlNode::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str, in_attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
