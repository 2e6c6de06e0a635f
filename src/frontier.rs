//! Queries over the rules a derivation still has to satisfy.

use crate::rule::Rule;
use crate::tree::{ElementaryTree, NodeId};
use std::collections::BTreeSet;

impl ElementaryTree {
    /// The next legal rule per (treeposition, slot) site of one node.
    pub fn applicable_rules(&self, id: NodeId) -> Vec<&Rule> {
        self.node(id).applicable_rules()
    }

    /// Applicable rules of every node, in pre-order.
    pub fn all_applicable_rules(&self) -> Vec<&Rule> {
        self.depth_first()
            .into_iter()
            .flat_map(|id| self.applicable_rules(id))
            .collect()
    }

    /// Distinct labels some open rule would accept next.
    pub fn open_actions(&self) -> BTreeSet<String> {
        self.all_applicable_rules()
            .into_iter()
            .map(|rule| rule.pos.clone())
            .collect()
    }

    /// A derivation is complete once no rule remains applicable.
    pub fn is_terminal(&self) -> bool {
        self.all_applicable_rules().is_empty()
    }

    /// Total number of unconsumed rules, applicable or not.
    pub fn rule_count(&self) -> usize {
        self.depth_first()
            .into_iter()
            .map(|id| self.node(id).rules.len())
            .sum()
    }
}
