//! Structural diffing for rendered markup trees.
//!
//! Given a before- and an after-version of a tree, [`diff`] computes an
//! ordered list of inserts, deletes, reorders and attribute changes per node,
//! arranged as a [`PatchTree`] that mirrors the document. [`apply_patch`]
//! replays such a tree and exists mainly to verify diffs by round trip.
//!
//! ```
//! use markup_diff_core::{apply_patch, diff, parse};
//!
//! let before = parse(b"<ul><li>Hi!</li></ul>").unwrap();
//! let after = parse(b"<ul><li>Hi!</li><li>Bye!</li></ul>").unwrap();
//!
//! let patch = diff(1, &before, &after);
//! assert_eq!(apply_patch(&before, &patch).unwrap(), after);
//! ```

mod tracing_macros;

pub mod apply;
pub mod diff;
pub mod format;
pub mod parser;
pub mod tree;
pub mod writer;

pub use apply::{apply_op, apply_patch, node_at, ApplyError};
pub use diff::{
    diff, diff_with_options, match_children, score, DiffMatrix, DiffOptions, GeneratedIds, PatchOp,
    PatchTree,
};
pub use format::{
    decode_patch_tree, encode_patch_tree, format_summary, format_text, DecodeError,
};
pub use parser::{parse, parse_file, ParseError};
pub use tree::{Element, Node, Snapshot, SnapshotError, TEXT_LABEL};
pub use writer::{write, write_file, WriteError};
