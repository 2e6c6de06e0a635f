//! First-order-logic projection of the predicate-argument graph.

use crate::amr::{amr_semantics, SemanticEdge};
use serde::{Deserialize, Serialize};
use spinal_ltag::{Child, ElementaryTree, NodeId, TreeAddress};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const NOUN_TAGS: [&str; 4] = ["NN", "NNS", "NNP", "NNPS"];

/// `name(arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Atom {
    pub name: String,
    pub args: Vec<String>,
}

impl Atom {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

/// Entities and atoms describing what a derivation asserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolSemantics {
    pub entities: BTreeSet<String>,
    pub atoms: BTreeSet<Atom>,
}

impl FolSemantics {
    /// Atoms in their textual form, sorted.
    pub fn atom_strings(&self) -> BTreeSet<String> {
        self.atoms.iter().map(Atom::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Project the derivation's numbered-argument edges into atoms.
///
/// Every predicate yields one atom whose arguments are its numbered roles in
/// role order. Roles not yet filled become placeholder entities `ARGi`;
/// filled ones become `<label>_<address>`, plus a unary atom naming the
/// entity after the longest run of nouns under it.
pub fn fol_semantics(tree: &ElementaryTree) -> FolSemantics {
    let graph = amr_semantics(tree);

    let mut arguments: BTreeMap<&str, Vec<&SemanticEdge>> = graph
        .nodes
        .iter()
        .map(|predicate| (predicate.as_str(), Vec::new()))
        .collect();
    for edge in graph.edges.iter().filter(|e| e.is_numbered()) {
        if let Some(predicate) = &edge.predicate {
            arguments.entry(predicate.as_str()).or_default().push(edge);
        }
    }

    let mut semantics = FolSemantics::default();
    for (predicate, mut edges) in arguments {
        edges.sort_by(|a, b| a.role.cmp(&b.role).then_with(|| a.argument.cmp(&b.argument)));

        let mut args = Vec::with_capacity(edges.len());
        for (i, edge) in edges.iter().enumerate() {
            let resolved = edge
                .argument
                .as_ref()
                .and_then(|address| Some((address, entity_at(tree, address)?)));
            let entity = match resolved {
                Some((address, entity)) => {
                    if let Some(name) = longest_noun_run(tree, address) {
                        semantics.atoms.insert(Atom::new(name, vec![entity.clone()]));
                    }
                    entity
                }
                // Addresses come from walking this same tree, so only open
                // roles land here; the slot keeps its position either way.
                None => format!("ARG{}", i),
            };
            semantics.entities.insert(entity.clone());
            args.push(entity);
        }
        semantics.atoms.insert(Atom::new(predicate, args));
    }
    semantics
}

/// `<label>_<address>` for the node at `address`.
fn entity_at(tree: &ElementaryTree, address: &TreeAddress) -> Option<String> {
    let id = tree.node_at(address)?;
    Some(format!("{}_{}", tree.node(id).label, address.entity_suffix()))
}

/// Longest run of consecutive noun-tagged words under `address`, joined by
/// `_`. The first run wins ties.
fn longest_noun_run(tree: &ElementaryTree, address: &TreeAddress) -> Option<String> {
    let id = tree.node_at(address)?;
    let mut tagged = Vec::new();
    tag_words(tree, id, &mut tagged);

    let mut best: &[(&str, bool)] = &[];
    let mut start = 0;
    for end in 0..=tagged.len() {
        let in_run = tagged.get(end).map_or(false, |(_, noun)| *noun);
        if !in_run {
            if end - start > best.len() {
                best = &tagged[start..end];
            }
            start = end + 1;
        }
    }

    if best.is_empty() {
        return None;
    }
    Some(
        best.iter()
            .map(|(word, _)| *word)
            .collect::<Vec<_>>()
            .join("_"),
    )
}

/// Words under `id` in order, flagged when their preterminal is a noun tag.
fn tag_words<'a>(tree: &'a ElementaryTree, id: NodeId, out: &mut Vec<(&'a str, bool)>) {
    let node = tree.node(id);
    let noun = NOUN_TAGS.contains(&node.label.as_str());
    for child in &node.children {
        match child {
            Child::Leaf(word) => out.push((word.as_str(), noun)),
            Child::Node(child_id) => tag_words(tree, *child_id, out),
        }
    }
}
