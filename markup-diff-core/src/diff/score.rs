//! Similarity between two nodes of the before- and after-trees.

use std::collections::BTreeSet;

use crate::diff::matrix::match_children;
use crate::diff::options::DiffOptions;
use crate::tree::{Element, Node};

/// Confidence in `[0, 1]` that `a` (at `index_a` among its siblings) and `b`
/// (at `index_b`) are the same logical node.
///
/// Rules are tried in order and the first that applies decides:
///
/// 1. the very same node instance scores `1.0` in place and `0.5` when moved;
/// 2. different labels score `0.0`;
/// 3. text nodes score `1.0` when their text is equal, `0.0` otherwise;
/// 4. two generated identifiers are interchangeable and score `1.0`;
/// 5. explicit identifiers decide alone: equal `1.0`, different `0.0`;
/// 6. inputs match on name and type, or score `0.0`;
/// 7. anything else blends children, attributes, position and tag.
pub fn score(a: &Node, index_a: usize, b: &Node, index_b: usize, opts: &DiffOptions) -> f64 {
    if std::ptr::eq(a, b) {
        return if index_a == index_b { 1.0 } else { 0.5 };
    }

    let (a, b) = match (a, b) {
        (Node::Text(text_a), Node::Text(text_b)) => return exact(text_a == text_b),
        (Node::Element(a), Node::Element(b)) if a.tag == b.tag => (a, b),
        (Node::Element(_), Node::Element(_))
        | (Node::Element(_), Node::Text(_))
        | (Node::Text(_), Node::Element(_)) => return 0.0,
    };

    let generated = &opts.generated_ids;
    match (explicit_id(a, opts), explicit_id(b, opts)) {
        (Some(id_a), Some(id_b)) if generated.matches(id_a) && generated.matches(id_b) => {
            return 1.0;
        }
        (Some(id_a), Some(id_b)) => return exact(id_a == id_b),
        _ => {}
    }

    if a.tag == opts.input_tag {
        let name_a = a.attr(&opts.name_attribute);
        let name_b = b.attr(&opts.name_attribute);
        let both_generated = matches!(
            (name_a, name_b),
            (Some(x), Some(y)) if generated.matches(x) && generated.matches(y)
        );
        let same_name = name_a == name_b || both_generated;
        let same_type = a.attr(&opts.type_attribute) == b.attr(&opts.type_attribute);
        return exact(same_name && same_type);
    }

    let (children, children_weight) = children_similarity(a, b, opts);
    let (attributes, attributes_weight) = attribute_similarity(a, b);
    let position = if index_a == index_b { 1.0 } else { 0.0 };
    let tag = 1.0;

    (children + attributes + position + tag) / (children_weight + attributes_weight + 1.0 + 1.0)
}

fn exact(equal: bool) -> f64 {
    if equal {
        1.0
    } else {
        0.0
    }
}

// Empty identifiers count as absent.
fn explicit_id<'a>(element: &'a Element, opts: &DiffOptions) -> Option<&'a str> {
    element
        .attr(&opts.id_attribute)
        .filter(|value| !value.is_empty())
}

fn children_similarity(a: &Element, b: &Element, opts: &DiffOptions) -> (f64, f64) {
    let children_a = a.significant_children();
    let children_b = b.significant_children();

    if let ([Node::Text(text_a)], [Node::Text(text_b)]) =
        (children_a.as_slice(), children_b.as_slice())
    {
        return (2.0 * exact(text_a == text_b), 2.0);
    }

    let matrix = match_children(&children_a, &children_b, opts);
    let total = matrix.matches.values().map(|&(_, score)| score).sum();
    let weight = children_a.len().max(children_b.len()) as f64;
    (total, weight)
}

fn attribute_similarity(a: &Element, b: &Element) -> (f64, f64) {
    let shared = a
        .attributes
        .iter()
        .filter(|(key, value)| b.attributes.get(*key) == Some(*value))
        .count();
    let union = a
        .attributes
        .keys()
        .chain(b.attributes.keys())
        .collect::<BTreeSet<_>>()
        .len();
    (shared as f64, union as f64)
}
