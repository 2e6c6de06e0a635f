use crate::{Selection, StateError, StateResult, TreeAction};
use spinal_ltag::{ElementaryTree, Grammar};
use spinal_semantics::{fol_semantics, FolSemantics};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where a derivation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No tree chosen yet; only initial actions apply.
    Empty,
    InProgress,
    /// Rules remain open but the grammar has no tree for any of them.
    DeadEnd,
    /// No rule remains open.
    Terminal,
}

/// A point in the derivation search: the current derivation, if any, and the
/// grammar it draws from.
///
/// Cloning copies the derivation; the grammar stays shared.
#[derive(Debug, Clone)]
pub struct DerivationState {
    tree: Option<ElementaryTree>,
    grammar: Arc<Grammar>,
}

/// One expansion of a state.
#[derive(Debug, Clone)]
pub struct Successor {
    pub action: TreeAction,
    /// Which of the action's outcomes produced `state`
    pub outcome: usize,
    pub state: DerivationState,
}

impl DerivationState {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self {
            tree: None,
            grammar,
        }
    }

    /// Resume from an existing derivation.
    pub fn with_tree(grammar: Arc<Grammar>, tree: ElementaryTree) -> Self {
        Self {
            tree: Some(tree),
            grammar,
        }
    }

    pub fn tree(&self) -> Option<&ElementaryTree> {
        self.tree.as_ref()
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn phase(&self) -> Phase {
        match &self.tree {
            None => Phase::Empty,
            Some(tree) if tree.is_terminal() => Phase::Terminal,
            Some(tree) if self.is_stalled(tree) => Phase::DeadEnd,
            Some(_) => Phase::InProgress,
        }
    }

    /// No open label has a grammar tree.
    fn is_stalled(&self, tree: &ElementaryTree) -> bool {
        tree.open_actions()
            .iter()
            .all(|label| self.grammar.trees_for(label).next().is_none())
    }

    pub fn is_terminal(&self) -> bool {
        self.phase() == Phase::Terminal
    }

    /// Labels the derivation is waiting for. Empty before it starts.
    pub fn open_actions(&self) -> BTreeSet<String> {
        self.tree
            .as_ref()
            .map(ElementaryTree::open_actions)
            .unwrap_or_default()
    }

    /// Legal actions, in open-label order and then grammar order.
    pub fn actions(&self) -> Vec<TreeAction> {
        match &self.tree {
            None => self
                .grammar
                .start_trees()
                .cloned()
                .map(TreeAction::Initial)
                .collect(),
            Some(tree) => tree
                .open_actions()
                .iter()
                .flat_map(|label| self.grammar.trees_for(label))
                .cloned()
                .map(TreeAction::Substitute)
                .collect(),
        }
    }

    /// Every derivation `action` can lead to from here.
    pub fn outcomes(&self, action: &TreeAction) -> StateResult<Vec<ElementaryTree>> {
        if matches!(action, TreeAction::Substitute(_)) && self.tree.is_none() {
            return Err(StateError::NotStarted);
        }
        Ok(action.execute(self.tree.as_ref()))
    }

    /// Apply an action, keeping its `outcome`th result.
    ///
    /// The state is left untouched when the selection or outcome is invalid.
    pub fn execute_action(
        &mut self,
        selection: impl Into<Selection>,
        outcome: usize,
    ) -> StateResult<()> {
        let action = match selection.into() {
            Selection::Action(action) => {
                self.check_legal(&action)?;
                action
            }
            Selection::Index(index) => {
                let mut actions = self.actions();
                if index >= actions.len() {
                    return Err(StateError::ActionOutOfRange {
                        index,
                        available: actions.len(),
                    });
                }
                actions.swap_remove(index)
            }
        };

        let mut outcomes = self.outcomes(&action)?;
        if outcome >= outcomes.len() {
            return Err(StateError::OutcomeOutOfRange {
                index: outcome,
                available: outcomes.len(),
            });
        }
        self.tree = Some(outcomes.swap_remove(outcome));
        debug!(action = %action, outcome, phase = ?self.phase(), "executed action");
        Ok(())
    }

    /// An `Initial` action only starts an empty derivation, from a tree rooted
    /// at the start label. A `Substitute` needs a derivation to splice into.
    fn check_legal(&self, action: &TreeAction) -> StateResult<()> {
        match (action, &self.tree) {
            (TreeAction::Substitute(_), None) => Err(StateError::NotStarted),
            (TreeAction::Substitute(_), Some(_)) => Ok(()),
            (TreeAction::Initial(tree), None) if tree.label() == self.grammar.start_label() => {
                Ok(())
            }
            (TreeAction::Initial(tree), None) => Err(StateError::IllegalAction {
                action: action.to_string(),
                reason: format!("root {} is not the start label", tree.label()),
            }),
            (TreeAction::Initial(_), Some(_)) => Err(StateError::IllegalAction {
                action: action.to_string(),
                reason: "derivation already started".to_string(),
            }),
        }
    }

    /// Every (action, outcome) expansion as an independent state.
    pub fn successors(&self) -> Vec<Successor> {
        let mut successors = Vec::new();
        for action in self.actions() {
            let outcomes = action.execute(self.tree.as_ref());
            for (outcome, tree) in outcomes.into_iter().enumerate() {
                successors.push(Successor {
                    action: action.clone(),
                    outcome,
                    state: Self::with_tree(Arc::clone(&self.grammar), tree),
                });
            }
        }
        debug!(successors = successors.len(), "expanded state");
        successors
    }

    /// Words of the derivation so far.
    pub fn sentence(&self) -> String {
        self.tree
            .as_ref()
            .map(ElementaryTree::sentence)
            .unwrap_or_default()
    }

    pub fn fol_semantics(&self) -> FolSemantics {
        self.tree.as_ref().map(fol_semantics).unwrap_or_default()
    }
}

impl fmt::Display for DerivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(f, "{}", tree),
            None => f.write_str("(empty)"),
        }
    }
}
