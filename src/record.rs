//! Grammar interchange records.
//!
//! A grammar file is a JSON array of [`TreeRecord`]s, one per unlexicalized
//! elementary tree:
//!
//! ```json
//! [{
//!   "spine": "(S (VP (VB",
//!   "lexicalization": {"ran": 3, "walked": 1},
//!   "predicate": "run",
//!   "rules": [
//!     {"rule_type": "att", "pos": "NP", "treeposition": [], "slot": 0, "order": 0,
//!      "semantic_role": "ARG0"}
//!   ]
//! }]
//! ```

use crate::tree::ElementaryTree;
use crate::{ActionLocation, GrammarError, GrammarResult, Rule, RuleType, Slot, TreeAddress};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::warn;

static SPINE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").expect("valid regex"));

/// One unlexicalized elementary tree with its rules and observed words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Bracketed spine, e.g. `(S (VP (VB`
    pub spine: String,
    /// Single word, for records that are already lexicalized
    #[serde(default)]
    pub terminal: Option<String>,
    /// Word frequencies; each word yields one lexicalized tree
    #[serde(default)]
    pub lexicalization: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub tree_type: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub roleset_id: Option<String>,
    #[serde(default)]
    pub num_args: Option<u32>,
    #[serde(default)]
    pub tree_id: Option<u64>,
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub rule_type: RuleType,
    pub pos: String,
    pub treeposition: AddressRecord,
    #[serde(default)]
    pub slot: Option<i64>,
    #[serde(default)]
    pub order: Option<usize>,
    #[serde(default)]
    pub semantic_role: Option<String>,
    #[serde(default, rename = "desc")]
    pub role_description: Option<String>,
    #[serde(default)]
    pub attach_counts: BTreeMap<String, u32>,
}

/// Rule addresses come either as a list of child indices or in dotted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressRecord {
    Indices(Vec<usize>),
    Dotted(String),
}

impl AddressRecord {
    pub fn to_address(&self) -> GrammarResult<TreeAddress> {
        match self {
            AddressRecord::Indices(indices) => Ok(TreeAddress::new(indices.clone())),
            AddressRecord::Dotted(dotted) => TreeAddress::from_dotted(dotted),
        }
    }
}

impl RuleRecord {
    /// Convert to a [`Rule`]. Coordination rules may omit slot and order.
    pub fn to_rule(&self, index: usize) -> GrammarResult<Rule> {
        let defaults = match self.rule_type {
            RuleType::Coordinate => (Some(0), Some(0)),
            _ => (None, None),
        };
        let slot = self.slot.or(defaults.0).ok_or_else(|| GrammarError::Record {
            index,
            message: format!("{} rule for {} has no slot", self.rule_type.code(), self.pos),
        })?;
        let order = self.order.or(defaults.1).ok_or_else(|| GrammarError::Record {
            index,
            message: format!("{} rule for {} has no order", self.rule_type.code(), self.pos),
        })?;

        let location = ActionLocation::new(self.treeposition.to_address()?, Slot::from_code(slot)?, order);
        let mut rule = Rule::new(self.rule_type, self.pos.clone(), location)
            .with_attach_counts(self.attach_counts.clone());
        rule.semantic_role = self.semantic_role.clone();
        rule.role_description = self.role_description.clone();
        Ok(rule)
    }
}

impl TreeRecord {
    /// Labels of the spine, root first.
    pub fn spine_labels(&self) -> Vec<String> {
        SPINE_PUNCT
            .replace_all(&self.spine, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Build the unlexicalized tree: the spine chain with its rules anchored
    /// on the nodes they act on.
    pub fn to_unlexicalized(&self, index: usize) -> GrammarResult<ElementaryTree> {
        let labels = self.spine_labels();
        if labels.is_empty() {
            return Err(GrammarError::Record {
                index,
                message: format!("empty spine `{}`", self.spine),
            });
        }

        let mut tree = ElementaryTree::from_spine(labels, None);
        for id in tree.depth_first() {
            tree.node_mut(id).tree_type = self.tree_type.clone();
        }
        let root = tree.root_node_mut();
        root.predicate = self.predicate.clone();
        root.roleset_id = self.roleset_id.clone();
        root.num_args = self.num_args;
        root.tree_id = self.tree_id;

        for record in &self.rules {
            let mut rule = record.to_rule(index)?;
            match tree.node_at(rule.treeposition()) {
                Some(target) => {
                    rule.action_location.treeposition = TreeAddress::root();
                    tree.node_mut(target).push_rule(rule);
                }
                None => {
                    warn!(
                        record = index,
                        rule = %rule,
                        "rule address does not resolve; keeping it at the root"
                    );
                    tree.root_node_mut().push_rule(rule);
                }
            }
        }
        Ok(tree)
    }

    /// Every lexicalized tree this record describes.
    ///
    /// Each lexicalization word yields a tree with the word under the bottom
    /// spine node. A bare `terminal` yields one tree; neither yields the
    /// unlexicalized tree. Counts feed the tree prior.
    pub fn to_trees(&self, index: usize) -> GrammarResult<Vec<ElementaryTree>> {
        let base = self.to_unlexicalized(index)?;

        if let Some(words) = self.lexicalization.as_ref().filter(|w| !w.is_empty()) {
            let tree_count: u32 = words.values().sum();
            return Ok(words
                .iter()
                .map(|(word, &count)| lexicalize(&base, word, count, tree_count))
                .collect());
        }

        match &self.terminal {
            Some(word) => Ok(vec![lexicalize(&base, word, 1, 1)]),
            None => Ok(vec![base]),
        }
    }
}

fn lexicalize(base: &ElementaryTree, word: &str, count: u32, tree_count: u32) -> ElementaryTree {
    let mut tree = base.clone();
    let bottom = tree.spine_bottom();
    tree.push_leaf(bottom, word);
    let root = tree.root_node_mut();
    root.lexicalization_count = count;
    root.tree_count = tree_count;
    tree
}

/// Decode a JSON array of records.
pub fn parse_records(json: &str) -> GrammarResult<Vec<TreeRecord>> {
    serde_json::from_str(json).map_err(|e| GrammarError::Parse {
        message: e.to_string(),
    })
}

/// Decode a JSON array of records from a reader.
pub fn read_records<R: Read>(reader: R) -> GrammarResult<Vec<TreeRecord>> {
    serde_json::from_reader(reader).map_err(|e| GrammarError::Parse {
        message: e.to_string(),
    })
}
