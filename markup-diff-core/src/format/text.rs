use crate::diff::patch::{PatchOp, PatchTree};

/// Format a patch tree as indented plain text.
pub fn format_text(tree: &PatchTree) -> String {
    let mut lines = Vec::new();
    push_lines(tree, 0, &mut lines);
    lines.join("\n")
}

fn push_lines(tree: &PatchTree, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    lines.push(format!("{indent}@{}", tree.index));
    for op in &tree.patches {
        let (prefix, detail) = match op {
            PatchOp::Delete { index } => ('-', index.to_string()),
            PatchOp::Insert { index, node } => ('+', format!("{index} {node}")),
            PatchOp::Reorder { permutation } => ('~', format!("{permutation:?}")),
            PatchOp::AttrSet { key, value } => ('=', format!("{key}=\"{value}\"")),
            PatchOp::AttrRemove { key } => ('x', key.clone()),
        };
        lines.push(format!("{indent}  {prefix} {} {detail}", op.kind()));
    }
    for child in &tree.children {
        push_lines(child, depth + 1, lines);
    }
}

/// Format a simple summary of operation counts across the whole tree.
pub fn format_summary(tree: &PatchTree) -> String {
    let mut insert = 0;
    let mut delete = 0;
    let mut reorder = 0;
    let mut attr_set = 0;
    let mut attr_remove = 0;

    for op in tree.operations() {
        match op {
            PatchOp::Insert { .. } => insert += 1,
            PatchOp::Delete { .. } => delete += 1,
            PatchOp::Reorder { .. } => reorder += 1,
            PatchOp::AttrSet { .. } => attr_set += 1,
            PatchOp::AttrRemove { .. } => attr_remove += 1,
        }
    }

    format!(
        "insert={insert} delete={delete} reorder={reorder} attr_set={attr_set} attr_remove={attr_remove}"
    )
}
