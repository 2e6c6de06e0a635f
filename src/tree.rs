//! Arena-backed elementary trees and derivations.
//!
//! An [`ElementaryTree`] owns a flat vector of [`TreeNode`]s addressed by
//! [`NodeId`]. Copying a derivation is a single vector clone in which every
//! id stays valid, so a node located in the source can be found in the copy
//! without walking addresses. Grafting another tree appends its nodes with an
//! id offset.
//!
//! The same type represents both grammar entries (elementary trees) and
//! derivations built from them; a derivation is just an elementary tree that
//! has had other trees attached to it.

use crate::rule::{self, Rule};
use crate::{Slot, TreeAddress};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Index of a node inside its owning tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child slot: either another node or a terminal word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Child {
    Node(NodeId),
    Leaf(String),
}

impl Child {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Child::Node(id) => Some(*id),
            Child::Leaf(_) => None,
        }
    }
}

/// A labeled node with its rules and annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<Child>,
    /// Unconsumed rules anchored here
    pub rules: Vec<Rule>,
    /// Adjunction foot marker (`^` suffix in spine notation)
    pub is_spine_foot: bool,
    /// Set on the root of a tree once the engine splices it somewhere
    pub attached: bool,
    /// Side of the host spine this subtree was attached on
    pub attached_slot: Option<Slot>,
    pub predicate: Option<String>,
    pub semantic_role: Option<String>,
    pub tree_type: Option<String>,
    pub roleset_id: Option<String>,
    pub num_args: Option<u32>,
    pub tree_id: Option<u64>,
    /// How often this lexicalization was observed
    pub lexicalization_count: u32,
    /// Sum of the counts over every lexicalization of the same unlexicalized tree
    pub tree_count: u32,
}

impl TreeNode {
    /// Create a node from a spine label. A trailing `^` marks an adjunction foot.
    pub fn new(label: impl Into<String>) -> Self {
        let mut label = label.into();
        let is_spine_foot = label.ends_with('^');
        if is_spine_foot {
            label.pop();
        }
        Self {
            label,
            children: Vec::new(),
            rules: Vec::new(),
            is_spine_foot,
            attached: false,
            attached_slot: None,
            predicate: None,
            semantic_role: None,
            tree_type: None,
            roleset_id: None,
            num_args: None,
            tree_id: None,
            lexicalization_count: 1,
            tree_count: 1,
        }
    }

    /// Anchor a rule here. Rules form a set, so an equal rule is not added twice.
    pub fn push_rule(&mut self, rule: Rule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    /// Remove a rule, returning whether it was present.
    pub fn consume_rule(&mut self, rule: &Rule) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r != rule);
        self.rules.len() != before
    }

    /// The next legal rule per (treeposition, slot) site.
    pub fn applicable_rules(&self) -> Vec<&Rule> {
        rule::applicable(&self.rules)
    }

    /// Position of the spine child: the first child that is a word or a
    /// node that was not attached by the engine.
    ///
    /// `None` means no child continues the spine, i.e. this node is the bottom
    /// of its own spine.
    pub fn spine_child(&self, tree: &ElementaryTree) -> Option<usize> {
        self.children.iter().position(|child| match child {
            Child::Leaf(_) => true,
            Child::Node(id) => !tree.node(*id).attached,
        })
    }
}

/// An elementary tree or a derivation. Owns all of its nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementaryTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl ElementaryTree {
    /// A single-node tree.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            nodes: vec![TreeNode::new(label)],
            root: NodeId(0),
        }
    }

    /// Build a spine chain `labels[0] -> labels[1] -> ...`, optionally ending
    /// in a terminal word under the last label.
    ///
    /// An empty `labels` yields a single node with an empty label.
    pub fn from_spine<I, S>(labels: I, terminal: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels = labels.into_iter().map(Into::<String>::into);
        let first = labels.next().unwrap_or_default();
        let mut tree = Self::new(first);
        let mut bottom = tree.root;
        for label in labels {
            bottom = tree.push_child(bottom, TreeNode::new(label));
        }
        if let Some(word) = terminal {
            tree.push_leaf(bottom, word);
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        self.node(self.root)
    }

    pub fn root_node_mut(&mut self) -> &mut TreeNode {
        let root = self.root;
        self.node_mut(root)
    }

    pub fn label(&self) -> &str {
        &self.root_node().label
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Append `node` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(Child::Node(id));
        id
    }

    /// Append a terminal word as the last child of `parent`.
    pub fn push_leaf(&mut self, parent: NodeId, word: impl Into<String>) {
        self.nodes[parent.0].children.push(Child::Leaf(word.into()));
    }

    /// Follow the last child repeatedly from the root; the spine's bottom node.
    pub fn spine_bottom(&self) -> NodeId {
        let mut current = self.root;
        while let Some(Child::Node(next)) = self.node(current).children.last() {
            current = *next;
        }
        current
    }

    /// Copy every node of `other` into this arena, unattached to anything.
    /// Returns the id of the copied root.
    pub fn graft(&mut self, other: &ElementaryTree) -> NodeId {
        let offset = self.nodes.len();
        self.nodes.extend(other.nodes.iter().cloned().map(|mut node| {
            for child in node.children.iter_mut() {
                if let Child::Node(id) = child {
                    *id = NodeId(id.0 + offset);
                }
            }
            node
        }));
        NodeId(other.root.0 + offset)
    }

    /// Resolve `address` relative to `from`. Only node children can be
    /// traversed; an index that is out of range or lands on a word yields `None`.
    pub fn resolve(&self, from: NodeId, address: &TreeAddress) -> Option<NodeId> {
        let mut current = from;
        for &index in address.indices() {
            current = self.node(current).children.get(index)?.as_node()?;
        }
        Some(current)
    }

    /// Node at `address` relative to the root.
    pub fn node_at(&self, address: &TreeAddress) -> Option<NodeId> {
        self.resolve(self.root, address)
    }

    /// Breadth-first order of reachable nodes with their addresses.
    pub fn breadth_first(&self) -> Vec<(NodeId, TreeAddress)> {
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((self.root, TreeAddress::root()));
        while let Some((id, address)) = queue.pop_front() {
            for (index, child) in self.node(id).children.iter().enumerate() {
                if let Child::Node(child_id) = child {
                    queue.push_back((*child_id, address.child(index)));
                }
            }
            order.push((id, address));
        }
        order
    }

    /// Pre-order (depth-first) ids of reachable nodes.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.node(id).children.iter().rev() {
                if let Child::Node(child_id) = child {
                    stack.push(*child_id);
                }
            }
        }
        order
    }

    /// Address of a reachable node relative to the root.
    pub fn address_of(&self, target: NodeId) -> Option<TreeAddress> {
        self.breadth_first()
            .into_iter()
            .find(|(id, _)| *id == target)
            .map(|(_, address)| address)
    }

    /// Terminal words under `id`, left to right.
    pub fn leaves_under(&self, id: NodeId) -> Vec<&str> {
        let mut words = Vec::new();
        self.collect_leaves(id, &mut words);
        words
    }

    fn collect_leaves<'a>(&'a self, id: NodeId, words: &mut Vec<&'a str>) {
        for child in &self.node(id).children {
            match child {
                Child::Leaf(word) => words.push(word),
                Child::Node(child_id) => self.collect_leaves(*child_id, words),
            }
        }
    }

    /// Terminal words of the whole tree, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        self.leaves_under(self.root)
    }

    /// Surface string: the leaves joined by single spaces.
    pub fn sentence(&self) -> String {
        self.leaves().join(" ")
    }

    /// Every node label plus every rule POS in the tree.
    pub fn pos_set(&self) -> BTreeSet<String> {
        let mut pos = BTreeSet::new();
        for id in self.depth_first() {
            let node = self.node(id);
            pos.insert(node.label.clone());
            pos.extend(node.rules.iter().map(|r| r.pos.clone()));
        }
        pos
    }

    /// Serialize the derivation as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(8)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config)
    }

    /// Deserialize a derivation written by [`ElementaryTree::to_ron_string`].
    pub fn from_ron_string(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(id);
        write!(f, "({}", node.label)?;
        for child in &node.children {
            f.write_str(" ")?;
            match child {
                Child::Leaf(word) => f.write_str(word)?,
                Child::Node(child_id) => self.fmt_node(*child_id, f)?,
            }
        }
        f.write_str(")")
    }
}

/// Bracketed form: `(S (NP dog) (VP runs))`.
impl fmt::Display for ElementaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}
