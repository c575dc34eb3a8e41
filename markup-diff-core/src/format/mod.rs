//! Patch tree output formatters.

pub mod json;
pub mod text;

pub use json::{decode_patch_tree, encode_patch_tree, DecodeError};
pub use text::{format_summary, format_text};
