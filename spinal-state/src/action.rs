use spinal_ltag::{attach, ElementaryTree};
use std::fmt;

/// A move in the derivation search: which grammar tree to use and how.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeAction {
    /// Start the derivation from this tree.
    Initial(ElementaryTree),
    /// Splice this tree into the current derivation.
    Substitute(ElementaryTree),
}

impl TreeAction {
    /// The grammar tree this action introduces.
    pub fn tree(&self) -> &ElementaryTree {
        match self {
            TreeAction::Initial(tree) | TreeAction::Substitute(tree) => tree,
        }
    }

    /// Every derivation this action can produce from `current`.
    ///
    /// `Initial` always has exactly one outcome. `Substitute` has one per
    /// legal splice site and none when there is no derivation yet.
    pub fn execute(&self, current: Option<&ElementaryTree>) -> Vec<ElementaryTree> {
        match self {
            TreeAction::Initial(tree) => vec![tree.clone()],
            TreeAction::Substitute(tree) => current
                .map(|derivation| attach(derivation, tree))
                .unwrap_or_default(),
        }
    }

    /// How often the introduced tree's word was observed.
    pub fn weight(&self) -> u32 {
        self.tree().root_node().lexicalization_count
    }

    /// Probability of the word given its unlexicalized tree.
    pub fn prior(&self) -> f64 {
        let root = self.tree().root_node();
        if root.tree_count == 0 {
            return 0.0;
        }
        f64::from(root.lexicalization_count) / f64::from(root.tree_count)
    }
}

impl fmt::Display for TreeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeAction::Initial(tree) => write!(f, "initial {}", tree),
            TreeAction::Substitute(tree) => write!(f, "substitute {}", tree),
        }
    }
}

/// How a caller names the action to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Position in [`DerivationState::actions`](crate::DerivationState::actions)
    Index(usize),
    Action(TreeAction),
}

impl From<usize> for Selection {
    fn from(index: usize) -> Self {
        Selection::Index(index)
    }
}

impl From<TreeAction> for Selection {
    fn from(action: TreeAction) -> Self {
        Selection::Action(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_needs_a_derivation() {
        let np = ElementaryTree::from_spine(["NP"], Some("dog"));
        assert!(TreeAction::Substitute(np.clone()).execute(None).is_empty());
        let outcomes = TreeAction::Initial(np.clone()).execute(None);
        assert_eq!(outcomes, vec![np]);
    }

    #[test]
    fn test_weight_and_prior() {
        let mut np = ElementaryTree::from_spine(["NP", "NN"], Some("dog"));
        np.root_node_mut().lexicalization_count = 3;
        np.root_node_mut().tree_count = 4;
        let action = TreeAction::Substitute(np);
        assert_eq!(action.weight(), 3);
        assert_eq!(action.prior(), 0.75);
        assert_eq!(action.to_string(), "substitute (NP (NN dog))");
    }
}
