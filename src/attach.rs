//! The attachment engine.
//!
//! [`attach`] enumerates every way a candidate tree can be spliced into a
//! derivation. Each result is an independent copy of the derivation with the
//! candidate inserted at one site and the licensing rule consumed.

use crate::rule::Rule;
use crate::tree::{Child, ElementaryTree, NodeId, TreeNode};
use crate::Slot;
use tracing::{debug, trace};

/// Where the spine passes through a node's children.
///
/// For a node with a spine child, `index` is that child's position and
/// `width` is 1. For the bottom of a spine there is no such child; the spine
/// is the zero-width gap between left- and right-attached children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpineGap {
    index: usize,
    width: usize,
}

impl SpineGap {
    fn of(tree: &ElementaryTree, id: NodeId) -> Self {
        let node = tree.node(id);
        if let Some(index) = node.spine_child(tree) {
            return Self { index, width: 1 };
        }
        let mut index = 0;
        for child in &node.children {
            if let Child::Node(child_id) = child {
                match tree.node(*child_id).attached_slot {
                    Some(Slot::Left) => index += 1,
                    Some(Slot::Right) => {}
                    None => panic!(
                        "node {} has no spine child and an attached child without a slot",
                        node.label
                    ),
                }
            }
        }
        Self { index, width: 0 }
    }

    /// Children of the insertion node left and right of the spine.
    fn sibling_counts(self, child_count: usize) -> (usize, usize) {
        let left = self.index.min(child_count);
        let right = child_count - (self.index + self.width).min(child_count);
        (left, right)
    }
}

/// Every derivation obtained by splicing `candidate` into `derivation` at one
/// open site whose rule accepts the candidate's root label.
///
/// Sites are visited breadth-first; a node's rules are tried in applicable
/// order. Neither input is modified. An empty result means no open rule
/// accepts the label.
pub fn attach(derivation: &ElementaryTree, candidate: &ElementaryTree) -> Vec<ElementaryTree> {
    let label = candidate.label();
    let mut results = Vec::new();

    for (current, address) in derivation.breadth_first() {
        for rule in derivation.applicable_rules(current) {
            if rule.pos != label {
                continue;
            }
            match attach_at(derivation, current, rule, candidate) {
                Some(result) => results.push(result),
                None => trace!(
                    node = %address,
                    rule = %rule,
                    "attachment site rejected"
                ),
            }
        }
    }

    debug!(
        candidate = label,
        results = results.len(),
        "attachment enumerated"
    );
    results
}

/// Splice a copy of `candidate` at the site `rule` of `current` describes.
fn attach_at(
    derivation: &ElementaryTree,
    current: NodeId,
    rule: &Rule,
    candidate: &ElementaryTree,
) -> Option<ElementaryTree> {
    let mut result = derivation.clone();
    let insertion = result.resolve(current, rule.treeposition())?;

    let gap = SpineGap::of(&result, current);
    let child_count = result.node(insertion).children.len();
    let (left, right) = gap.sibling_counts(child_count);
    let order = rule.order();
    let index = match rule.slot() {
        Slot::Left if left == order => order,
        Slot::Right if right == order => order + gap.width + gap.index,
        _ => return None,
    };

    let grafted = result.graft(candidate);
    stamp(result.node_mut(grafted), rule);
    let children = &mut result.node_mut(insertion).children;
    let index = index.min(children.len());
    children.insert(index, Child::Node(grafted));

    result.node_mut(current).consume_rule(rule);
    Some(result)
}

fn stamp(root: &mut TreeNode, rule: &Rule) {
    root.semantic_role = rule.semantic_role.clone();
    root.attached = true;
    root.attached_slot = Some(rule.slot());
}
