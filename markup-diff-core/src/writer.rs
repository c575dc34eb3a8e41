use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::tree::Node;

/// Errors that can occur while writing XML from a [`Node`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
    /// A bare text node cannot be a document root.
    #[error("document root must be an element")]
    TextRoot,
}

/// Serialize a [`Node`] tree into XML bytes.
pub fn write(node: &Node) -> Result<Vec<u8>, WriteError> {
    if matches!(node, Node::Text(_)) {
        return Err(WriteError::TextRoot);
    }
    let mut writer = Writer::new(Vec::new());
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Serialize a [`Node`] tree and write it to `path`.
pub fn write_file(node: &Node, path: &Path) -> Result<(), WriteError> {
    let bytes = write(node)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), quick_xml::Error> {
    let el = match node {
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
            return Ok(());
        }
        Node::Element(el) => el,
    };

    let mut start = BytesStart::new(el.tag.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.tag.as_str())))?;
    Ok(())
}
