//! Grammar loading options, read from TOML.

use crate::{GrammarError, GrammarResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Options applied while turning interchange records into a [`Grammar`](crate::Grammar).
///
/// ```toml
/// start_label = "S"
/// pos_whitelist = ["S", "NP", "VP", "NN", "VB"]
/// limit = 5000
/// dedupe = true
/// tree_patterns = ["^\\(NP \\(NN", "^\\(S \\(VP"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Root label of the trees a derivation may start from.
    pub start_label: String,
    /// When set, records mentioning any label or rule POS outside it are skipped.
    pub pos_whitelist: Option<BTreeSet<String>>,
    /// Maximum number of records to read.
    pub limit: Option<usize>,
    /// Drop trees whose bracketed form and rules were already seen.
    pub dedupe: bool,
    /// Regexes over the bracketed tree; when non-empty a tree must match one.
    pub tree_patterns: Vec<String>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            start_label: "S".to_string(),
            pos_whitelist: None,
            limit: None,
            dedupe: true,
            tree_patterns: Vec::new(),
        }
    }
}

impl GrammarConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> GrammarResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GrammarError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GrammarError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(s: &str) -> GrammarResult<Self> {
        toml::from_str(s).map_err(|e| GrammarError::Parse {
            message: e.to_string(),
        })
    }

    /// Compile `tree_patterns`.
    pub fn compile_patterns(&self) -> GrammarResult<Vec<Regex>> {
        self.tree_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| GrammarError::Pattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    /// Whether every label in `pos` passes the whitelist.
    pub fn allows(&self, pos: &BTreeSet<String>) -> bool {
        self.pos_whitelist
            .as_ref()
            .map_or(true, |allowed| pos.is_subset(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GrammarConfig::load(&dir.path().join("grammar.toml")).unwrap();
        assert_eq!(config, GrammarConfig::default());
        assert_eq!(config.start_label, "S");
        assert!(config.dedupe);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "start_label = \"ROOT\"\nlimit = 10").unwrap();
        let config = GrammarConfig::load(file.path()).unwrap();
        assert_eq!(config.start_label, "ROOT");
        assert_eq!(config.limit, Some(10));
        assert!(config.pos_whitelist.is_none());
        assert!(config.dedupe);
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limit = \"many\"").unwrap();
        let err = GrammarConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, GrammarError::Load { .. }));
    }

    #[test]
    fn test_tree_patterns() {
        let config = GrammarConfig::from_toml_str(r#"tree_patterns = ['^\(NP', "VB"]"#).unwrap();
        assert_eq!(config.compile_patterns().unwrap().len(), 2);

        let broken = GrammarConfig::from_toml_str(r#"tree_patterns = ["(NP"]"#).unwrap();
        assert!(matches!(
            broken.compile_patterns(),
            Err(GrammarError::Pattern { .. })
        ));
    }

    #[test]
    fn test_whitelist() {
        let config =
            GrammarConfig::from_toml_str("pos_whitelist = [\"S\", \"NP\", \"NN\"]").unwrap();
        let ok: BTreeSet<String> = ["S", "NP"].iter().map(|s| s.to_string()).collect();
        let bad: BTreeSet<String> = ["S", "PP"].iter().map(|s| s.to_string()).collect();
        assert!(config.allows(&ok));
        assert!(!config.allows(&bad));
        assert!(GrammarConfig::default().allows(&bad));
    }
}
