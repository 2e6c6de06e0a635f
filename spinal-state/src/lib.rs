#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Derivation states for searching over a spinal-ltag [`Grammar`](spinal_ltag::Grammar).
//!
//! A [`DerivationState`] starts empty, takes one [`TreeAction::Initial`] to
//! install a start tree, then grows through [`TreeAction::Substitute`] until
//! no rule is left open ([`Phase::Terminal`]) or the grammar cannot satisfy
//! any open rule ([`Phase::DeadEnd`]). A search policy picks actions by
//! index or value; weights and priors on each action feed weighted policies,
//! and [`DerivationState::fol_semantics`] feeds reward functions.

mod action;
mod errors;
mod state;

pub use action::{Selection, TreeAction};
pub use errors::{StateError, StateResult};
pub use state::{DerivationState, Phase, Successor};
