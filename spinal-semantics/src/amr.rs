//! Predicate-argument graphs.

use serde::{Deserialize, Serialize};
use spinal_ltag::{is_numbered_role, Child, ElementaryTree, TreeAddress};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use tracing::debug;

/// One role filler for a predicate.
///
/// `argument` is `None` when the role comes from a rule that is still open,
/// i.e. the argument has not been attached yet. `predicate` is `None` when no
/// ancestor declares one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SemanticEdge {
    pub role: String,
    pub argument: Option<TreeAddress>,
    pub predicate: Option<String>,
}

impl SemanticEdge {
    pub fn new(
        role: impl Into<String>,
        argument: Option<TreeAddress>,
        predicate: Option<String>,
    ) -> Self {
        Self {
            role: role.into(),
            argument,
            predicate,
        }
    }

    pub fn is_numbered(&self) -> bool {
        is_numbered_role(&self.role)
    }
}

impl fmt::Display for SemanticEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let predicate = self.predicate.as_deref().unwrap_or("?");
        match &self.argument {
            Some(address) => write!(f, "{} -{}-> {}", predicate, self.role, address),
            None => write!(f, "{} -{}-> _", predicate, self.role),
        }
    }
}

/// Predicates and the role edges hanging off them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmrGraph {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<SemanticEdge>,
}

impl AmrGraph {
    /// Edges governed by `predicate`.
    pub fn edges_of<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a SemanticEdge> {
        self.edges
            .iter()
            .filter(move |e| e.predicate.as_deref() == Some(predicate))
    }
}

/// Walk the derivation breadth-first and collect its predicate-argument graph.
///
/// A node's predicate governs its own rules and every descendant until a
/// descendant declares another. A node's `semantic_role` is an edge from the
/// predicate governing it, i.e. the one inherited from its ancestors.
pub fn amr_semantics(tree: &ElementaryTree) -> AmrGraph {
    let mut graph = AmrGraph::default();
    let mut queue = VecDeque::new();
    queue.push_back((tree.root(), TreeAddress::root(), None::<&str>));

    while let Some((id, address, inherited)) = queue.pop_front() {
        let node = tree.node(id);
        let governing = node.predicate.as_deref().or(inherited);
        if let Some(predicate) = &node.predicate {
            graph.nodes.insert(predicate.clone());
        }

        if let Some(role) = &node.semantic_role {
            graph.edges.insert(SemanticEdge::new(
                role.clone(),
                Some(address.clone()),
                inherited.map(str::to_string),
            ));
        }

        for rule in &node.rules {
            if let Some(role) = &rule.semantic_role {
                graph.edges.insert(SemanticEdge::new(
                    role.clone(),
                    None,
                    governing.map(str::to_string),
                ));
            }
        }

        for (index, child) in node.children.iter().enumerate() {
            if let Child::Node(child_id) = child {
                queue.push_back((*child_id, address.child(index), governing));
            }
        }
    }

    debug!(
        predicates = graph.nodes.len(),
        edges = graph.edges.len(),
        "extracted predicate-argument graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinal_ltag::{ActionLocation, Rule, RuleType, Slot, TreeNode};

    fn role_rule(pos: &str, role: &str) -> Rule {
        Rule::new(
            RuleType::Attach,
            pos,
            ActionLocation::new(TreeAddress::root(), Slot::Right, 0),
        )
        .with_semantic_role(role)
    }

    #[test]
    fn test_attached_roles_use_inherited_predicate() {
        // (S:want (NP:ARG0 Kim) (VP (S:go (NP:ARG0 home))))
        let mut tree = ElementaryTree::new("S");
        let root = tree.root();
        tree.node_mut(root).predicate = Some("want".to_string());
        let mut kim = TreeNode::new("NP");
        kim.semantic_role = Some("ARG0".to_string());
        let kim = tree.push_child(root, kim);
        tree.push_leaf(kim, "Kim");
        let vp = tree.push_child(root, TreeNode::new("VP"));
        let mut inner = TreeNode::new("S");
        inner.predicate = Some("go".to_string());
        inner.semantic_role = Some("ARG1".to_string());
        let inner = tree.push_child(vp, inner);
        let mut home = TreeNode::new("NP");
        home.semantic_role = Some("ARG4".to_string());
        let home = tree.push_child(inner, home);
        tree.push_leaf(home, "home");

        let graph = amr_semantics(&tree);
        assert_eq!(graph.nodes.iter().collect::<Vec<_>>(), vec!["go", "want"]);

        let want: Vec<_> = graph.edges_of("want").map(|e| e.to_string()).collect();
        assert_eq!(want, vec!["want -ARG0-> (0)", "want -ARG1-> (1, 0)"]);
        let go: Vec<_> = graph.edges_of("go").map(|e| e.to_string()).collect();
        assert_eq!(go, vec!["go -ARG4-> (1, 0, 0)"]);
    }

    #[test]
    fn test_open_rules_use_own_predicate() {
        let mut tree = ElementaryTree::from_spine(["S", "VP"], None);
        let root = tree.root();
        tree.node_mut(root).predicate = Some("see".to_string());
        tree.node_mut(root).push_rule(role_rule("NP", "ARG0"));
        let vp = tree.node_at(&TreeAddress::new(vec![0])).unwrap();
        tree.node_mut(vp).push_rule(role_rule("NP", "ARG1"));

        let graph = amr_semantics(&tree);
        let edges: Vec<_> = graph.edges.iter().map(|e| e.to_string()).collect();
        assert_eq!(edges, vec!["see -ARG0-> _", "see -ARG1-> _"]);
    }

    #[test]
    fn test_edge_listing() {
        // (S:give (NP:ARG0 Kim) (VP (VB gave) (NP:ARG1 it))), ARG2 still open
        let mut tree = ElementaryTree::new("S");
        let root = tree.root();
        tree.node_mut(root).predicate = Some("give".to_string());
        tree.node_mut(root).push_rule(role_rule("PP", "ARG2"));
        tree.node_mut(root).push_rule(role_rule("ADVP", "ARGM-TMP"));
        let mut kim = TreeNode::new("NP");
        kim.semantic_role = Some("ARG0".to_string());
        let kim = tree.push_child(root, kim);
        tree.push_leaf(kim, "Kim");
        let vp = tree.push_child(root, TreeNode::new("VP"));
        let vb = tree.push_child(vp, TreeNode::new("VB"));
        tree.push_leaf(vb, "gave");
        let mut it = TreeNode::new("NP");
        it.semantic_role = Some("ARG1".to_string());
        let it = tree.push_child(vp, it);
        tree.push_leaf(it, "it");

        let graph = amr_semantics(&tree);
        let listing: Vec<_> = graph.edges.iter().map(|e| e.to_string()).collect();
        insta::assert_snapshot!(listing.join("\n"), @r###"
        give -ARG0-> (0)
        give -ARG1-> (1, 1)
        give -ARG2-> _
        give -ARGM-TMP-> _
        "###);
    }

    #[test]
    fn test_edges_without_predicate_are_kept() {
        let mut tree = ElementaryTree::new("NP");
        let root = tree.root();
        tree.node_mut(root).push_rule(role_rule("PP", "ARGM-LOC"));

        let graph = amr_semantics(&tree);
        assert!(graph.nodes.is_empty());
        assert_eq!(graph.edges.len(), 1);
        let edge = graph.edges.iter().next().unwrap();
        assert_eq!(edge.predicate, None);
        assert!(!edge.is_numbered());
    }
}
