//! Replays patch operations onto a tree.
//!
//! Nodes are addressed by a linear index: a pre-order walk from the root
//! (index 0) that skips whitespace-only text, the same enumeration the
//! differ uses. Child positions inside operations count significant
//! children only. Every function returns a new tree and leaves its input
//! untouched.

use thiserror::Error;

use crate::diff::patch::{PatchOp, PatchTree};
use crate::tree::{Element, Node, SnapshotError};

/// Structural invariant violations found while applying a patch.
#[derive(Debug, Error, PartialEq)]
pub enum ApplyError {
    #[error("no node at linear index {0}")]
    NoSuchNode(usize),
    #[error("node at linear index {0} is text and has no children or attributes")]
    TextTarget(usize),
    #[error("child position {position} out of range for {len} children")]
    OutOfRange { position: usize, len: usize },
    #[error("reorder needs at least two distinct positions, got {0:?}")]
    BadReorder(Vec<usize>),
    #[error("attribute {0:?} is not present")]
    MissingAttribute(String),
    #[error("invalid insert snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The node at `index` in pre-order, whitespace-only text skipped.
pub fn node_at(tree: &Node, index: usize) -> Option<&Node> {
    let mut remaining = index;
    locate(tree, &mut remaining)
}

fn locate<'a>(node: &'a Node, remaining: &mut usize) -> Option<&'a Node> {
    if *remaining == 0 {
        return Some(node);
    }
    *remaining -= 1;
    node.significant_children()
        .into_iter()
        .find_map(|child| locate(child, remaining))
}

fn locate_mut<'a>(node: &'a mut Node, remaining: &mut usize) -> Option<&'a mut Node> {
    if *remaining == 0 {
        return Some(node);
    }
    *remaining -= 1;
    match node {
        Node::Text(_) => None,
        Node::Element(el) => el
            .children
            .iter_mut()
            .filter(|child| !child.is_whitespace())
            .find_map(|child| locate_mut(child, remaining)),
    }
}

/// Apply one operation to the node at linear `index`.
pub fn apply_op(tree: &Node, index: usize, op: &PatchOp) -> Result<Node, ApplyError> {
    let mut out = tree.clone();
    let mut remaining = index;
    let target = locate_mut(&mut out, &mut remaining).ok_or(ApplyError::NoSuchNode(index))?;
    let element = match target {
        Node::Element(el) => el,
        Node::Text(_) => return Err(ApplyError::TextTarget(index)),
    };

    match op {
        PatchOp::Delete { index: position } => {
            let raw = raw_position(element, *position)?;
            element.children.remove(raw);
        }
        PatchOp::Insert {
            index: position,
            node,
        } => {
            let slots = slot_positions(element);
            let raw = match slots.get(*position) {
                Some(&raw) => raw,
                None if *position == slots.len() => element.children.len(),
                None => {
                    return Err(ApplyError::OutOfRange {
                        position: *position,
                        len: slots.len(),
                    })
                }
            };
            element.children.insert(raw, Node::try_from(node)?);
        }
        PatchOp::Reorder { permutation } => rotate(element, permutation)?,
        PatchOp::AttrSet { key, value } => {
            element.attributes.insert(key.clone(), value.clone());
        }
        PatchOp::AttrRemove { key } => {
            element
                .attributes
                .remove(key)
                .ok_or_else(|| ApplyError::MissingAttribute(key.clone()))?;
        }
    }

    Ok(out)
}

/// Apply a whole patch tree: each node's operations in order, then its
/// child patch trees at their after-tree positions. The root patch applies
/// to the root of `tree` whatever its own index is.
pub fn apply_patch(tree: &Node, patch: &PatchTree) -> Result<Node, ApplyError> {
    apply_at(tree.clone(), 0, patch)
}

fn apply_at(tree: Node, index: usize, patch: &PatchTree) -> Result<Node, ApplyError> {
    let mut tree = patch
        .patches
        .iter()
        .try_fold(tree, |current, op| apply_op(&current, index, op))?;

    for child in &patch.children {
        let child_index = child_linear_index(&tree, index, child.index)?;
        tree = apply_at(tree, child_index, child)?;
    }

    Ok(tree)
}

fn child_linear_index(tree: &Node, parent: usize, position: usize) -> Result<usize, ApplyError> {
    let node = node_at(tree, parent).ok_or(ApplyError::NoSuchNode(parent))?;
    let children = node.significant_children();
    if position >= children.len() {
        return Err(ApplyError::OutOfRange {
            position,
            len: children.len(),
        });
    }
    let preceding: usize = children[..position].iter().map(|c| c.subtree_size()).sum();
    Ok(parent + 1 + preceding)
}

// Raw indices of significant children, in order.
fn slot_positions(element: &Element) -> Vec<usize> {
    element
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.is_whitespace())
        .map(|(raw, _)| raw)
        .collect()
}

fn raw_position(element: &Element, position: usize) -> Result<usize, ApplyError> {
    let slots = slot_positions(element);
    slots
        .get(position)
        .copied()
        .ok_or(ApplyError::OutOfRange {
            position,
            len: slots.len(),
        })
}

// The child at permutation[i] moves to permutation[i + 1], the last wraps to
// the first.
fn rotate(element: &mut Element, permutation: &[usize]) -> Result<(), ApplyError> {
    let mut distinct = permutation.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if permutation.len() < 2 || distinct.len() != permutation.len() {
        return Err(ApplyError::BadReorder(permutation.to_vec()));
    }

    let raws = permutation
        .iter()
        .map(|&position| raw_position(element, position))
        .collect::<Result<Vec<_>, _>>()?;
    let moving: Vec<Node> = raws.iter().map(|&raw| element.children[raw].clone()).collect();

    for (i, node) in moving.into_iter().enumerate() {
        let destination = raws[(i + 1) % raws.len()];
        element.children[destination] = node;
    }
    Ok(())
}
