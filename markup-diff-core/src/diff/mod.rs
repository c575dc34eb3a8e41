//! Tree diffing: similarity scoring, child matching, reorder extraction and
//! the recursive driver that assembles patch trees.

pub mod engine;
pub mod matrix;
pub mod options;
pub mod patch;
pub mod reorder;
pub mod score;

pub use engine::{diff, diff_with_options};
pub use matrix::{match_children, DiffMatrix};
pub use options::{DiffOptions, GeneratedIds};
pub use patch::{PatchOp, PatchTree};
pub use reorder::extract_reorders;
pub use score::score;
