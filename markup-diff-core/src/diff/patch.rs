use serde::{Deserialize, Serialize};

use crate::tree::Snapshot;

/// One atomic edit at a patch-tree node.
///
/// Child positions count significant children only. `Delete` positions
/// refer to the before-tree; every other position refers to the after-tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatchOp {
    #[serde(rename = "insert")]
    Insert { index: usize, node: Snapshot },
    #[serde(rename = "delete")]
    Delete { index: usize },
    /// A cycle of child positions: the child at `permutation[i]` moves to
    /// `permutation[i + 1]`, the last one wraps around to the first slot.
    #[serde(rename = "reorder")]
    Reorder { permutation: Vec<usize> },
    #[serde(rename = "attrSet")]
    AttrSet { key: String, value: String },
    #[serde(rename = "attrRm")]
    AttrRemove { key: String },
}

impl PatchOp {
    /// Wire discriminator of this operation, one of [`OPERATION_KINDS`].
    pub fn kind(&self) -> &'static str {
        match self {
            PatchOp::Insert { .. } => "insert",
            PatchOp::Delete { .. } => "delete",
            PatchOp::Reorder { .. } => "reorder",
            PatchOp::AttrSet { .. } => "attrSet",
            PatchOp::AttrRemove { .. } => "attrRm",
        }
    }
}

/// Discriminators accepted on the wire.
pub const OPERATION_KINDS: [&str; 5] = ["insert", "delete", "reorder", "attrSet", "attrRm"];

/// Patches for one node plus the patch trees of its changed children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchTree {
    /// Position within the parent, in after-tree numbering.
    pub index: usize,
    #[serde(default)]
    pub patches: Vec<PatchOp>,
    #[serde(default)]
    pub children: Vec<PatchTree>,
}

impl PatchTree {
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            patches: Vec::new(),
            children: Vec::new(),
        }
    }

    /// True when neither this node nor any descendant carries an operation.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.children.iter().all(PatchTree::is_empty)
    }

    /// All operations in the tree, parents before children.
    pub fn operations(&self) -> Vec<&PatchOp> {
        let mut out: Vec<&PatchOp> = self.patches.iter().collect();
        for child in &self.children {
            out.extend(child.operations());
        }
        out
    }
}
