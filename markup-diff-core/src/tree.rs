use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label reported by text nodes and carried by text snapshots.
pub const TEXT_LABEL: &str = "#text";

/// A node of a rendered markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with a tag, attributes and ordered children.
    Element(Element),
    /// Character data.
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element tag name.
    pub tag: String,
    /// Attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child nodes, in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Children that take part in matching and patching.
    pub fn significant_children(&self) -> Vec<&Node> {
        self.children.iter().filter(|c| !c.is_whitespace()).collect()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// Shorthand for an element node with no attributes or children.
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(Element::new(tag))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Tag name for elements, [`TEXT_LABEL`] for text.
    pub fn label(&self) -> &str {
        match self {
            Node::Element(el) => &el.tag,
            Node::Text(_) => TEXT_LABEL,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Text(text) => Some(text),
        }
    }

    /// Attribute value on an element. Text nodes carry no attributes.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.as_element().and_then(|el| el.attr(key))
    }

    /// True for text nodes made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        match self {
            Node::Element(_) => false,
            Node::Text(text) => text.trim().is_empty(),
        }
    }

    /// Children that take part in matching and patching.
    pub fn significant_children(&self) -> Vec<&Node> {
        match self {
            Node::Element(el) => el.significant_children(),
            Node::Text(_) => Vec::new(),
        }
    }

    /// Number of nodes in this subtree under the pre-order,
    /// whitespace-skipping enumeration (the node itself included).
    pub fn subtree_size(&self) -> usize {
        1 + self
            .significant_children()
            .iter()
            .map(|child| child.subtree_size())
            .sum::<usize>()
    }

    /// Deep copy with every whitespace-only text node removed.
    pub fn normalized(&self) -> Node {
        match self {
            Node::Element(el) => Node::Element(Element {
                tag: el.tag.clone(),
                attributes: el.attributes.clone(),
                children: el
                    .children
                    .iter()
                    .filter(|c| !c.is_whitespace())
                    .map(Node::normalized)
                    .collect(),
            }),
            Node::Text(text) => Node::Text(text.clone()),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => write!(f, "{text}"),
            Node::Element(el) => {
                write!(f, "<{}", el.tag)?;
                for (key, value) in &el.attributes {
                    write!(f, " {}=\"{}\"", key, value)?;
                }
                if el.children.is_empty() {
                    return write!(f, "/>");
                }
                write!(f, ">")?;
                for child in &el.children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", el.tag)
            }
        }
    }
}

/// A detached copy of a subtree, as carried by insert operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Element tag name, or [`TEXT_LABEL`] for text.
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&Node> for Snapshot {
    fn from(node: &Node) -> Self {
        match node {
            Node::Element(el) => Snapshot {
                tag: el.tag.clone(),
                attributes: el.attributes.clone(),
                children: el
                    .children
                    .iter()
                    .filter(|c| !c.is_whitespace())
                    .map(Snapshot::from)
                    .collect(),
                text: None,
            },
            Node::Text(text) => Snapshot {
                tag: TEXT_LABEL.to_string(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
                text: Some(text.clone()),
            },
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.tag == TEXT_LABEL {
            return write!(f, "{}", self.text.as_deref().unwrap_or_default());
        }

        write!(f, "<{}", self.tag)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Structural problems found when turning a [`Snapshot`] back into a [`Node`].
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("text snapshot has no text")]
    MissingText,
    #[error("text snapshot carries attributes or children")]
    TextWithStructure,
    #[error("element snapshot <{0}> carries text")]
    ElementWithText(String),
}

impl TryFrom<&Snapshot> for Node {
    type Error = SnapshotError;

    fn try_from(snapshot: &Snapshot) -> Result<Self, Self::Error> {
        if snapshot.tag == TEXT_LABEL {
            if !snapshot.attributes.is_empty() || !snapshot.children.is_empty() {
                return Err(SnapshotError::TextWithStructure);
            }
            let text = snapshot.text.clone().ok_or(SnapshotError::MissingText)?;
            return Ok(Node::Text(text));
        }

        if snapshot.text.is_some() {
            return Err(SnapshotError::ElementWithText(snapshot.tag.clone()));
        }

        let children = snapshot
            .children
            .iter()
            .map(Node::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node::Element(Element {
            tag: snapshot.tag.clone(),
            attributes: snapshot.attributes.clone(),
            children,
        }))
    }
}
