#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! LTAG-Spinal elementary trees and the attachment engine that combines them.
//!
//! An elementary tree is a small syntactic fragment (a "spine") whose nodes
//! carry ordered attachment rules. A derivation grows by splicing other
//! elementary trees into the sites those rules license.
//!
//! ## Core Types
//!
//! - [`TreeAddress`] / [`ActionLocation`] / [`Slot`] - where a rule acts
//! - [`Rule`] - an attachment obligation anchored at a node
//! - [`ElementaryTree`] - an arena-backed tree of [`TreeNode`]s
//! - [`Grammar`] - elementary trees indexed by root label
//! - [`attach`] - the rewriting step that enumerates every legal splice
//!
//! ## Example
//!
//! ```
//! use spinal_ltag::{attach, ActionLocation, ElementaryTree, Rule, RuleType, Slot, TreeAddress};
//!
//! let mut s = ElementaryTree::new("S");
//! let root = s.root();
//! s.node_mut(root).push_rule(Rule::new(
//!     RuleType::Attach,
//!     "NP",
//!     ActionLocation::new(TreeAddress::root(), Slot::Right, 0),
//! ));
//! let np = ElementaryTree::from_spine(["NP"], Some("dog"));
//!
//! let results = attach(&s, &np);
//! assert_eq!(results.len(), 1);
//! assert!(results[0].is_terminal());
//! assert_eq!(results[0].sentence(), "dog");
//! ```

mod address;
mod attach;
mod config;
mod display;
mod errors;
mod frontier;
mod grammar;
mod record;
mod rule;
mod tree;

pub use address::{ActionLocation, Slot, TreeAddress};
pub use attach::attach;
pub use config::GrammarConfig;
pub use display::TreeDisplay;
pub use errors::{GrammarError, GrammarResult};
pub use grammar::{load_grammar, Grammar};
pub use record::{parse_records, read_records, AddressRecord, RuleRecord, TreeRecord};
pub use rule::{is_numbered_role, Rule, RuleType};
pub use tree::{Child, ElementaryTree, NodeId, TreeNode};

#[cfg(test)]
mod tests {
    mod attach;
    mod scenarios;
}
