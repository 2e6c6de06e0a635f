#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Semantics of spinal-ltag derivations.
//!
//! [`amr_semantics`] reads the predicate-argument graph off a derivation:
//! predicates declared on nodes, and role edges from attached subtrees and
//! still-open rules. [`fol_semantics`] projects the numbered-argument part of
//! that graph into first-order atoms such as `chase(NP_0, NP_1_1)` and
//! `cat(NP_0)`.

mod amr;
mod fol;

pub use amr::{amr_semantics, AmrGraph, SemanticEdge};
pub use fol::{fol_semantics, Atom, FolSemantics};
