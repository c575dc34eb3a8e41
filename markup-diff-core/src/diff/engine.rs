//! Recursive driver that turns two trees into a patch tree.

use std::collections::BTreeMap;

use crate::diff::matrix::{match_children, DiffMatrix};
use crate::diff::options::DiffOptions;
use crate::diff::patch::{PatchOp, PatchTree};
use crate::diff::reorder::extract_reorders;
use crate::tracing_macros::debug;
use crate::tree::{Element, Node, Snapshot};

/// Diff two trees with default options.
///
/// `index` becomes the index of the returned root patch tree; by convention
/// callers pass `1`.
pub fn diff(index: usize, before: &Node, after: &Node) -> PatchTree {
    diff_with_options(index, before, after, &DiffOptions::default())
}

/// Diff two trees with custom options.
pub fn diff_with_options(
    index: usize,
    before: &Node,
    after: &Node,
    opts: &DiffOptions,
) -> PatchTree {
    if is_skipped(before, opts) || is_skipped(after, opts) {
        debug!(index, "skip marker present, subtree left alone");
        return PatchTree::empty(index);
    }

    let before_children = before.significant_children();
    let after_children = after.significant_children();
    let matrix = match_children(&before_children, &after_children, opts);

    let deletions = deletions(&matrix);
    let insertions = insertions(&matrix, &after_children);
    let mapping: BTreeMap<usize, usize> = matrix
        .matches
        .iter()
        .map(|(&before, &(after, _))| (before, after))
        .collect();
    let reorders = extract_reorders(&mapping, &matrix.not_in_before, &matrix.not_in_after);
    let (sets, removals) = attribute_patches(before, after, opts);

    debug!(
        index,
        deletions = deletions.len(),
        insertions = insertions.len(),
        reorders = reorders.len(),
        attr_sets = sets.len(),
        attr_removals = removals.len(),
        "diffed node"
    );

    let patches = deletions
        .into_iter()
        .chain(insertions)
        .chain(reorders)
        .chain(sets)
        .chain(removals)
        .collect();

    let mut changed: Vec<(usize, usize, f64)> = matrix
        .matches
        .iter()
        .map(|(&before, &(after, score))| (before, after, score))
        .filter(|&(b, a, score)| score < 1.0 || before_children[b] != after_children[a])
        .collect();
    changed.sort_by_key(|&(_, after, _)| after);

    let children = changed
        .into_iter()
        .map(|(b, a, _)| diff_with_options(a, before_children[b], after_children[a], opts))
        .filter(|child| !child.patches.is_empty() || !child.children.is_empty())
        .collect();

    PatchTree {
        index,
        patches,
        children,
    }
}

fn is_skipped(node: &Node, opts: &DiffOptions) -> bool {
    node.attr(&opts.skip_attribute).is_some()
}

// Highest index first, so replaying them in order never shifts a pending one.
fn deletions(matrix: &DiffMatrix) -> Vec<PatchOp> {
    let mut indices = matrix.not_in_after.clone();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices
        .into_iter()
        .map(|index| PatchOp::Delete { index })
        .collect()
}

// Positions count text children as ordinary slots, both here and in
// `apply`, so an insert index is the after position unchanged.
fn insertions(matrix: &DiffMatrix, after_children: &[&Node]) -> Vec<PatchOp> {
    let matched = matrix.matched_after();
    let mut indices: Vec<usize> = matrix
        .not_in_before
        .iter()
        .copied()
        .filter(|index| !matched.contains(index))
        .collect();
    indices.sort_unstable();
    indices
        .into_iter()
        .map(|index| PatchOp::Insert {
            index,
            node: Snapshot::from(after_children[index]),
        })
        .collect()
}

fn attribute_patches(
    before: &Node,
    after: &Node,
    opts: &DiffOptions,
) -> (Vec<PatchOp>, Vec<PatchOp>) {
    let (before, after) = match (before, after) {
        (Node::Element(before), Node::Element(after)) => (before, after),
        (Node::Text(_), _) | (_, Node::Text(_)) => return (Vec::new(), Vec::new()),
    };

    let skip_name = has_generated_name(before, opts) || has_generated_name(after, opts);
    let compared =
        |key: &str| key != opts.id_attribute && !(skip_name && key == opts.name_attribute);

    let sets = after
        .attributes
        .iter()
        .filter(|(key, value)| {
            compared(key.as_str()) && before.attributes.get(*key) != Some(*value)
        })
        .map(|(key, value)| PatchOp::AttrSet {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();

    let removals = before
        .attributes
        .keys()
        .filter(|key| compared(key.as_str()) && !after.attributes.contains_key(*key))
        .map(|key| PatchOp::AttrRemove { key: key.clone() })
        .collect();

    (sets, removals)
}

fn has_generated_name(element: &Element, opts: &DiffOptions) -> bool {
    element.tag == opts.input_tag
        && element
            .attr(&opts.name_attribute)
            .is_some_and(|name| opts.generated_ids.matches(name))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{diff, diff_with_options};
    use crate::apply::apply_patch;
    use crate::diff::options::DiffOptions;
    use crate::diff::patch::{PatchOp, PatchTree};
    use crate::parser::parse;
    use crate::tree::{Node, Snapshot};

    fn tree(xml: &str) -> Node {
        parse(xml.as_bytes()).expect("parse")
    }

    #[test]
    fn appended_item_is_one_insert() {
        let before = tree("<ul><li>Hi!</li></ul>");
        let after = tree("<ul><li>Hi!</li><li>Bye!</li></ul>");

        let patch = diff(1, &before, &after);

        let bye = tree("<li>Bye!</li>");
        assert_eq!(
            patch,
            PatchTree {
                index: 1,
                patches: vec![PatchOp::Insert {
                    index: 1,
                    node: Snapshot::from(&bye),
                }],
                children: Vec::new(),
            }
        );
    }

    #[test]
    fn swapped_items_are_one_reorder() {
        let before = tree("<ul><li>A</li><li>B</li></ul>");
        let after = tree("<ul><li>B</li><li>A</li></ul>");

        let patch = diff(1, &before, &after);

        assert_eq!(
            patch.patches,
            vec![PatchOp::Reorder {
                permutation: vec![0, 1]
            }]
        );
        assert!(patch.children.is_empty());
    }

    #[test]
    fn renamed_input_is_replaced() {
        let before = tree(r#"<form><input name="x" type="text"/></form>"#);
        let after = tree(r#"<form><input name="y" type="text"/></form>"#);

        let patch = diff(1, &before, &after);

        let replacement = tree(r#"<input name="y" type="text"/>"#);
        assert_eq!(
            patch.patches,
            vec![
                PatchOp::Delete { index: 0 },
                PatchOp::Insert {
                    index: 0,
                    node: Snapshot::from(&replacement),
                },
            ]
        );
    }

    #[test]
    fn generated_ids_are_not_patched() {
        let before = tree(r#"<form><div id="F1234567890123456"><p>x</p></div></form>"#);
        let after = tree(r#"<form><div id="F9876543210987654"><p>x</p></div></form>"#);

        assert!(diff(1, &before, &after).is_empty());

        let before_divs = before.significant_children();
        let after_divs = after.significant_children();
        assert!(diff(1, before_divs[0], after_divs[0]).is_empty());
    }

    #[test]
    fn attribute_changes_are_sets_then_removals() {
        let before = tree(r#"<div class="a" title="t" id="one"/>"#);
        let after = tree(r#"<div class="b" lang="en" id="two"/>"#);

        let patch = diff(1, &before, &after);

        assert_eq!(
            patch.patches,
            vec![
                PatchOp::AttrSet {
                    key: "class".to_string(),
                    value: "b".to_string(),
                },
                PatchOp::AttrSet {
                    key: "lang".to_string(),
                    value: "en".to_string(),
                },
                PatchOp::AttrRemove {
                    key: "title".to_string(),
                },
            ]
        );
    }

    #[test]
    fn generated_input_name_is_not_patched() {
        let before = tree(r#"<input name="F1234567890123456" type="text"/>"#);
        let after = tree(r#"<input name="F6543210987654321" type="text"/>"#);
        assert!(diff(1, &before, &after).is_empty());
    }

    #[test]
    fn skip_marker_hides_the_subtree() {
        let before = tree(r#"<div data-diff-skip=""><p>old</p></div>"#);
        let after = tree(r#"<div><p>new</p><p>more</p></div>"#);

        assert_eq!(diff(3, &before, &after), PatchTree::empty(3));

        let opts = DiffOptions {
            skip_attribute: "data-frozen".to_string(),
            ..DiffOptions::default()
        };
        assert!(!diff_with_options(3, &before, &after, &opts).is_empty());
    }

    #[test]
    fn same_tree_yields_nothing() {
        let page = tree("<main><h1>T</h1><ul><li>a</li><li>b</li></ul><p>a</p></main>");
        let patch = diff(1, &page, &page);
        assert_eq!(patch, PatchTree::empty(1));
    }

    #[test]
    fn whitespace_text_is_invisible() {
        let before = tree("<ul><li>a</li><li>b</li></ul>");
        let after = tree("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
        assert_eq!(diff(1, &before, &after), PatchTree::empty(1));
    }

    #[test]
    fn nested_changes_land_on_child_patch_trees() {
        let before = tree(r#"<ul><li class="a">one</li><li>two</li></ul>"#);
        let after = tree(r#"<ul><li class="b">one</li><li>two</li></ul>"#);

        let patch = diff(1, &before, &after);

        assert!(patch.patches.is_empty());
        assert_eq!(
            patch.children,
            vec![PatchTree {
                index: 0,
                patches: vec![PatchOp::AttrSet {
                    key: "class".to_string(),
                    value: "b".to_string(),
                }],
                children: Vec::new(),
            }]
        );
    }

    #[test]
    fn repeated_equal_texts_rebuild_the_first_copy() {
        // Equal texts score 1.0 wherever they sit and ties go to the later
        // pair, so both `a`s compete for the last slot and the first loses.
        let before = tree("<div><span/>a<span/>a</div>");
        let after = tree("<div>\n<span/>a<span/>a</div>");

        let patch = diff(1, &before, &after);

        assert_eq!(
            patch.patches,
            vec![
                PatchOp::Delete { index: 1 },
                PatchOp::Insert {
                    index: 1,
                    node: Snapshot::from(&Node::text("a")),
                },
            ]
        );
        assert!(patch.children.is_empty());

        let rebuilt = apply_patch(&before, &patch).expect("patch should apply");
        assert_eq!(rebuilt.normalized(), after.normalized());
    }
}
