//! The grammar: elementary trees indexed by root label.

use crate::record::{read_records, TreeRecord};
use crate::tree::ElementaryTree;
use crate::{GrammarConfig, GrammarError, GrammarResult};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// A read-only collection of elementary trees.
///
/// Built once, then shared (typically behind an `Arc`) by every derivation
/// state exploring it.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    trees: Vec<ElementaryTree>,
    start_label: String,
    index: BTreeMap<String, Vec<usize>>,
}

impl Grammar {
    pub fn new(trees: Vec<ElementaryTree>, start_label: impl Into<String>) -> Self {
        let mut index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, tree) in trees.iter().enumerate() {
            index.entry(tree.label().to_string()).or_default().push(i);
        }
        let start_label = start_label.into();
        debug!(
            trees = trees.len(),
            labels = index.len(),
            start = %start_label,
            "grammar indexed"
        );
        Self {
            trees,
            start_label,
            index,
        }
    }

    /// Convert records, applying the config's filters.
    pub fn from_records(records: &[TreeRecord], config: &GrammarConfig) -> GrammarResult<Self> {
        let limit = config.limit.unwrap_or(records.len());
        let patterns = config.compile_patterns()?;
        let mut seen = HashSet::new();
        let mut trees = Vec::new();

        for (index, record) in records.iter().take(limit).enumerate() {
            for tree in record.to_trees(index)? {
                if !config.allows(&tree.pos_set()) {
                    warn!(record = index, tree = %tree, "skipping tree outside the POS whitelist");
                    continue;
                }
                if !patterns.is_empty() {
                    let bracketed = tree.to_string();
                    if !patterns.iter().any(|p| p.is_match(&bracketed)) {
                        continue;
                    }
                }
                if config.dedupe && !seen.insert(dedupe_key(&tree)) {
                    continue;
                }
                trees.push(tree);
            }
        }

        Ok(Self::new(trees, config.start_label.clone()))
    }

    pub fn trees(&self) -> &[ElementaryTree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&ElementaryTree> {
        self.trees.get(index)
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    /// Trees whose root carries `label`, in grammar order.
    pub fn trees_for<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a ElementaryTree> + 'a {
        self.index
            .get(label)
            .into_iter()
            .flatten()
            .map(move |&i| &self.trees[i])
    }

    pub fn start_trees(&self) -> impl Iterator<Item = &ElementaryTree> + '_ {
        self.trees_for(&self.start_label)
    }

    /// Root labels present in the grammar.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Trees are duplicates when structure, words and rules all match.
fn dedupe_key(tree: &ElementaryTree) -> String {
    let rules: Vec<String> = tree
        .depth_first()
        .into_iter()
        .flat_map(|id| tree.node(id).rules.iter().map(|r| r.to_string()))
        .collect();
    format!("{} [{}]", tree, rules.join("; "))
}

/// Read a JSON grammar file and build a [`Grammar`] from it.
pub fn load_grammar(path: &Path, config: &GrammarConfig) -> GrammarResult<Grammar> {
    let file = File::open(path).map_err(|e| GrammarError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let records = read_records(BufReader::new(file)).map_err(|e| GrammarError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Grammar::from_records(&records, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_records;
    use std::io::Write;

    const RECORDS: &str = r#"[
        {"spine": "(S", "rules": [
            {"rule_type": "att", "pos": "NP", "treeposition": [], "slot": 1, "order": 0}
        ]},
        {"spine": "(NP", "lexicalization": {"dog": 2, "cat": 1}},
        {"spine": "(NP", "terminal": "dog"},
        {"spine": "(PP (IN", "terminal": "on"}
    ]"#;

    #[test]
    fn test_index_by_label() {
        let records = parse_records(RECORDS).unwrap();
        let config = GrammarConfig {
            dedupe: false,
            ..GrammarConfig::default()
        };
        let grammar = Grammar::from_records(&records, &config).unwrap();
        assert_eq!(grammar.len(), 5);
        assert_eq!(grammar.labels().collect::<Vec<_>>(), vec!["NP", "PP", "S"]);
        let nps: Vec<_> = grammar.trees_for("NP").map(|t| t.to_string()).collect();
        assert_eq!(nps, vec!["(NP cat)", "(NP dog)", "(NP dog)"]);
        assert_eq!(grammar.start_trees().count(), 1);
        assert_eq!(grammar.trees_for("VP").count(), 0);
    }

    #[test]
    fn test_dedupe_ignores_counts() {
        let records = parse_records(RECORDS).unwrap();
        let grammar = Grammar::from_records(&records, &GrammarConfig::default()).unwrap();
        assert_eq!(grammar.len(), 4);
        assert_eq!(grammar.trees_for("NP").count(), 2);
    }

    #[test]
    fn test_limit_and_whitelist() {
        let records = parse_records(RECORDS).unwrap();
        let config = GrammarConfig::from_toml_str(
            "limit = 3\npos_whitelist = [\"S\", \"NP\"]\ndedupe = false",
        )
        .unwrap();
        let grammar = Grammar::from_records(&records, &config).unwrap();
        assert_eq!(grammar.len(), 4);
        assert_eq!(grammar.trees_for("PP").count(), 0);
    }

    #[test]
    fn test_tree_patterns_filter() {
        let records = parse_records(RECORDS).unwrap();
        let config = GrammarConfig {
            tree_patterns: vec![r"^\(NP".to_string(), r"^\(S".to_string()],
            ..GrammarConfig::default()
        };
        let grammar = Grammar::from_records(&records, &config).unwrap();
        assert_eq!(grammar.labels().collect::<Vec<_>>(), vec!["NP", "S"]);
    }

    #[test]
    fn test_load_grammar_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORDS.as_bytes()).unwrap();
        let grammar = load_grammar(file.path(), &GrammarConfig::default()).unwrap();
        assert_eq!(grammar.start_label(), "S");
        assert!(!grammar.is_empty());
    }

    #[test]
    fn test_load_grammar_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_grammar(&dir.path().join("trees.json"), &GrammarConfig::default())
            .unwrap_err();
        assert!(matches!(err, GrammarError::Load { .. }));
    }
}
