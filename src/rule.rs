//! Attachment rules.

use crate::{ActionLocation, Slot, TreeAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How the licensed tree combines with the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// `att`: substitution-like attachment
    #[serde(rename = "att")]
    Attach,
    /// `adj`: adjunction
    #[serde(rename = "adj")]
    Adjoin,
    /// `crd`: coordination
    #[serde(rename = "crd")]
    Coordinate,
}

impl RuleType {
    pub fn code(self) -> &'static str {
        match self {
            RuleType::Attach => "att",
            RuleType::Adjoin => "adj",
            RuleType::Coordinate => "crd",
        }
    }
}

/// An obligation to splice a tree labeled `pos` at `action_location`.
///
/// Rules are never mutated once anchored. Consuming a rule removes it from the
/// owning node of the derivation copy produced by the attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub rule_type: RuleType,
    /// Root label a candidate tree must carry
    pub pos: String,
    pub action_location: ActionLocation,
    /// Role the attached tree plays for the governing predicate (e.g. `ARG0`)
    pub semantic_role: Option<String>,
    /// Free-text description of the role
    pub role_description: Option<String>,
    /// Corpus frequencies of labels observed attaching at this site
    #[serde(default)]
    pub attach_counts: BTreeMap<String, u32>,
}

impl Rule {
    pub fn new(rule_type: RuleType, pos: impl Into<String>, action_location: ActionLocation) -> Self {
        Self {
            rule_type,
            pos: pos.into(),
            action_location,
            semantic_role: None,
            role_description: None,
            attach_counts: BTreeMap::new(),
        }
    }

    pub fn with_semantic_role(mut self, role: impl Into<String>) -> Self {
        self.semantic_role = Some(role.into());
        self
    }

    pub fn with_attach_counts(mut self, counts: BTreeMap<String, u32>) -> Self {
        self.attach_counts = counts;
        self
    }

    pub fn slot(&self) -> Slot {
        self.action_location.slot
    }

    pub fn order(&self) -> usize {
        self.action_location.order
    }

    pub fn treeposition(&self) -> &TreeAddress {
        &self.action_location.treeposition
    }

    /// Relative frequency of `label` among the labels seen at this site.
    pub fn attach_probability(&self, label: &str) -> Option<f64> {
        let total: u32 = self.attach_counts.values().sum();
        if total == 0 {
            return None;
        }
        let count = self.attach_counts.get(label).copied().unwrap_or(0);
        Some(f64::from(count) / f64::from(total))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {}, slot {}, order {}",
            self.rule_type.code(),
            self.pos,
            self.action_location.treeposition,
            self.action_location.slot,
            self.action_location.order
        )?;
        if let Some(role) = &self.semantic_role {
            write!(f, ", role {}", role)?;
        }
        Ok(())
    }
}

/// Numbered PropBank arguments (`ARG0`, `ARG1`, ...) end in a digit.
pub fn is_numbered_role(role: &str) -> bool {
    role.chars().last().map_or(false, |c| c.is_ascii_digit())
}

/// The next legal rule per (treeposition, slot) site: the one with the
/// smallest order. Sites appear in the order their first rule does; equal
/// orders keep insertion order.
pub(crate) fn applicable<'a>(rules: &'a [Rule]) -> Vec<&'a Rule> {
    let mut picked: Vec<&Rule> = Vec::new();
    for rule in rules {
        match picked
            .iter_mut()
            .find(|p| p.action_location.site_key() == rule.action_location.site_key())
        {
            Some(existing) => {
                if rule.order() < existing.order() {
                    *existing = rule;
                }
            }
            None => picked.push(rule),
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pos: &str, slot: Slot, order: usize) -> Rule {
        Rule::new(
            RuleType::Attach,
            pos,
            ActionLocation::new(TreeAddress::root(), slot, order),
        )
    }

    #[test]
    fn test_applicable_keeps_lowest_order_per_site() {
        let rules = vec![
            rule("JJ", Slot::Left, 1),
            rule("DT", Slot::Left, 0),
            rule("PP", Slot::Right, 0),
        ];
        let picked = applicable(&rules);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].pos, "DT");
        assert_eq!(picked[1].pos, "PP");
    }

    #[test]
    fn test_applicable_distinguishes_addresses() {
        let mut deeper = rule("RB", Slot::Left, 0);
        deeper.action_location.treeposition = TreeAddress::new(vec![0]);
        let rules = vec![rule("DT", Slot::Left, 0), deeper];
        assert_eq!(applicable(&rules).len(), 2);
    }

    #[test]
    fn test_applicable_tie_keeps_first() {
        let rules = vec![rule("NP", Slot::Right, 0), rule("PP", Slot::Right, 0)];
        let picked = applicable(&rules);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].pos, "NP");
    }

    #[test]
    fn test_numbered_roles() {
        assert!(is_numbered_role("ARG0"));
        assert!(is_numbered_role("ARG10"));
        assert!(!is_numbered_role("ARGM-LOC"));
        assert!(!is_numbered_role(""));
    }

    #[test]
    fn test_attach_probability() {
        let mut counts = BTreeMap::new();
        counts.insert("NP".to_string(), 3);
        counts.insert("S".to_string(), 1);
        let r = rule("NP", Slot::Right, 0).with_attach_counts(counts);
        assert_eq!(r.attach_probability("NP"), Some(0.75));
        assert_eq!(r.attach_probability("VP"), Some(0.0));
        assert_eq!(rule("NP", Slot::Right, 0).attach_probability("NP"), None);
    }

    #[test]
    fn test_rule_display() {
        let r = rule("NP", Slot::Left, 0).with_semantic_role("ARG0");
        assert_eq!(r.to_string(), "att NP on (), slot left, order 0, role ARG0");
    }
}
