//! Gorn addresses and attachment locations.
//!
//! A [`TreeAddress`] is a path of child indices from some subtree root. Rules
//! store the address of the node they act on relative to the node that owns
//! them, so a rule that has been pushed down onto its target node carries the
//! empty (root) address.

use crate::{GrammarError, GrammarResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of child indices from a subtree root. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeAddress(Vec<usize>);

impl TreeAddress {
    /// The empty address, i.e. the subtree root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Parse the dotted interchange form, where the leading `0` names the root.
    ///
    /// `"0"` is the root, `"0.1"` is the second child of the root.
    pub fn from_dotted(s: &str) -> GrammarResult<Self> {
        let mut parts = s.trim().split('.');
        match parts.next() {
            Some("0") => {}
            _ => return Err(GrammarError::InvalidAddress(s.to_string())),
        }
        let indices = parts
            .map(|p| p.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| GrammarError::InvalidAddress(s.to_string()))?;
        Ok(Self(indices))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address of the `index`th child of the node at this address.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Identifier fragment used to name entities: the tuple form with its
    /// punctuation stripped, indices joined by `_`.
    ///
    /// A single index gives `3`, not `3_`: no separator is emitted without a
    /// following index, so `NP_3` and `NP_0_1` share one shape.
    pub fn entity_suffix(&self) -> String {
        self.to_string()
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | ' '))
            .map(|c| if c == ',' { '_' } else { c })
            .collect()
    }
}

impl From<Vec<usize>> for TreeAddress {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Tuple form: `()` for the root, `(0, 1)` otherwise.
impl fmt::Display for TreeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str(")")
    }
}

/// Side of the spine a rule inserts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    /// Interchange encoding: `0` is left, `1` is right. Anything else is malformed rule data.
    pub fn from_code(code: i64) -> GrammarResult<Self> {
        match code {
            0 => Ok(Slot::Left),
            1 => Ok(Slot::Right),
            other => Err(GrammarError::InvalidSlot(other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Slot::Left => 0,
            Slot::Right => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Left => f.write_str("left"),
            Slot::Right => f.write_str("right"),
        }
    }
}

/// Where a rule inserts: the target node, the side of its spine, and the
/// position among competing rules for that side (consumed in ascending order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionLocation {
    pub treeposition: TreeAddress,
    pub slot: Slot,
    pub order: usize,
}

impl ActionLocation {
    pub fn new(treeposition: TreeAddress, slot: Slot, order: usize) -> Self {
        Self {
            treeposition,
            slot,
            order,
        }
    }

    /// Rules sharing this key compete for the same site.
    pub fn site_key(&self) -> (&TreeAddress, Slot) {
        (&self.treeposition, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_address_parsing() {
        assert_eq!(TreeAddress::from_dotted("0").unwrap(), TreeAddress::root());
        assert_eq!(
            TreeAddress::from_dotted("0.1.0").unwrap(),
            TreeAddress::new(vec![1, 0])
        );
        assert!(TreeAddress::from_dotted("1.0").is_err());
        assert!(TreeAddress::from_dotted("0.x").is_err());
        assert!(TreeAddress::from_dotted("").is_err());
    }

    #[test]
    fn test_address_display() {
        assert_eq!(TreeAddress::root().to_string(), "()");
        assert_eq!(TreeAddress::new(vec![0, 1]).to_string(), "(0, 1)");
        assert_eq!(TreeAddress::new(vec![2]).to_string(), "(2)");
    }

    #[test]
    fn test_entity_suffix() {
        assert_eq!(TreeAddress::new(vec![0, 1]).entity_suffix(), "0_1");
        assert_eq!(TreeAddress::new(vec![3]).entity_suffix(), "3");
        assert_eq!(TreeAddress::root().entity_suffix(), "");
    }

    #[test]
    fn test_child_address() {
        let addr = TreeAddress::root().child(1).child(0);
        assert_eq!(addr.indices(), &[1, 0]);
        assert_eq!(addr.len(), 2);
        assert!(!addr.is_root());
    }

    #[test]
    fn test_slot_codes() {
        assert_eq!(Slot::from_code(0).unwrap(), Slot::Left);
        assert_eq!(Slot::from_code(1).unwrap(), Slot::Right);
        assert!(matches!(Slot::from_code(2), Err(GrammarError::InvalidSlot(2))));
        assert_eq!(Slot::Right.code(), 1);
    }
}
