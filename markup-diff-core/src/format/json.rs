use serde_json::Value;
use thiserror::Error;

use crate::diff::patch::{PatchTree, OPERATION_KINDS};

/// Errors returned when decoding a patch tree from its JSON wire form.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// An operation carries a discriminator this version does not know.
    #[error("unknown patch operation {0:?}")]
    UnknownOperation(String),
    /// The payload is not a well-formed patch tree.
    #[error("malformed patch tree: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encode a patch tree as pretty-printed JSON.
pub fn encode_patch_tree(tree: &PatchTree) -> String {
    serde_json::to_string_pretty(tree).unwrap_or_else(|_| "{}".to_string())
}

/// Decode a patch tree from JSON.
///
/// Unknown operation discriminators are reported as
/// [`DecodeError::UnknownOperation`] before any typed decoding happens.
pub fn decode_patch_tree(json: &str) -> Result<PatchTree, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    if let Some(kind) = first_unknown_kind(&value) {
        return Err(DecodeError::UnknownOperation(kind));
    }
    Ok(serde_json::from_value(value)?)
}

fn first_unknown_kind(node: &Value) -> Option<String> {
    let patches = node.get("patches").and_then(Value::as_array);
    let unknown = patches.into_iter().flatten().find_map(|op| {
        op.get("type")
            .and_then(Value::as_str)
            .filter(|kind| !OPERATION_KINDS.contains(kind))
            .map(str::to_string)
    });
    if unknown.is_some() {
        return unknown;
    }

    node.get("children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(first_unknown_kind)
}

#[cfg(test)]
mod tests {
    use super::{decode_patch_tree, encode_patch_tree, DecodeError};
    use crate::diff::patch::{PatchOp, PatchTree};

    #[test]
    fn operations_carry_short_discriminators() {
        let tree = PatchTree {
            index: 1,
            patches: vec![
                PatchOp::Delete { index: 2 },
                PatchOp::AttrRemove {
                    key: "title".to_string(),
                },
            ],
            children: Vec::new(),
        };

        let json = encode_patch_tree(&tree);
        assert!(json.contains(r#""type": "delete""#));
        assert!(json.contains(r#""type": "attrRm""#));
        assert_eq!(decode_patch_tree(&json).expect("decode"), tree);
    }

    #[test]
    fn unknown_discriminator_is_distinguished() {
        let json = r#"{"index":1,"patches":[],"children":[
            {"index":0,"patches":[{"type":"teleport","index":3}],"children":[]}
        ]}"#;
        match decode_patch_tree(json) {
            Err(DecodeError::UnknownOperation(kind)) => assert_eq!(kind, "teleport"),
            other => panic!("expected unknown operation, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_malformed() {
        let json = r#"{"index":1,"patches":[{"type":"insert","index":0}],"children":[]}"#;
        assert!(matches!(
            decode_patch_tree(json),
            Err(DecodeError::Malformed(_))
        ));
    }
}
