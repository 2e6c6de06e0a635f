use crate::tree::{Child, ElementaryTree, NodeId};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

/// Multi-line rendering of a derivation for debugging.
///
/// The first line holds the words; every node follows in pre-order with a
/// bracket under the words it dominates. A node without words is drawn as
/// `┆` at the position where its words would go.
pub struct TreeDisplay<'a> {
    tree: &'a ElementaryTree,
    show_rules: bool,
    show_semantics: bool,
}

/// Character columns of one node's span.
struct NodeSpan {
    id: NodeId,
    start: usize,
    end: usize,
}

// dog  runs
// ╰───────╯S pred=run
//   └─att NP on (), slot left, order 0, role ARG0
// ╰─╯NP
// ╰─╯NN
//      ╰──╯VP
//      ╰──╯VB
impl<'a> std::fmt::Display for TreeDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut word_starts = Vec::new();
        let mut word_ends = Vec::new();
        let mut opening_line = String::new();
        for (i, word) in self.tree.leaves().into_iter().enumerate() {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            word_starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(word);
            word_ends.push(UnicodeWidthStr::width(&*opening_line));
        }
        let line_end = UnicodeWidthStr::width(&*opening_line);

        f.write_str(&opening_line)?;

        let mut spans = Vec::new();
        self.collect_spans(self.tree.root(), &mut 0, &word_starts, &word_ends, line_end, &mut spans);

        for span in spans {
            f.write_char('\n')?;
            for _ in 0..span.start {
                f.write_char(' ')?;
            }

            let char_len = span.end - span.start;
            if char_len == 0 {
                f.write_char('┆')?;
            } else {
                f.write_char('╰')?;
                for _ in (span.start + 1)..span.end.saturating_sub(1) {
                    f.write_char('─')?;
                }
                if char_len > 1 {
                    f.write_char('╯')?;
                }
            }

            let node = self.tree.node(span.id);
            f.write_str(&node.label)?;
            if self.show_semantics {
                if let Some(predicate) = &node.predicate {
                    write!(f, " pred={}", predicate)?;
                }
                if let Some(role) = &node.semantic_role {
                    write!(f, " role={}", role)?;
                }
            }

            if self.show_rules {
                for rule in &node.rules {
                    f.write_char('\n')?;
                    for _ in 0..span.start + 2 {
                        f.write_char(' ')?;
                    }
                    write!(f, "└─{}", rule)?;
                }
            }
        }

        Ok(())
    }
}

impl<'a> TreeDisplay<'a> {
    pub fn new(tree: &'a ElementaryTree) -> Self {
        TreeDisplay {
            tree,
            show_rules: false,
            show_semantics: false,
        }
    }

    /// List each node's unconsumed rules under it.
    pub fn include_rules(mut self) -> Self {
        self.show_rules = true;
        self
    }

    /// Annotate nodes with their predicate and semantic role.
    pub fn include_semantics(mut self) -> Self {
        self.show_semantics = true;
        self
    }

    /// Pre-order walk; `next_word` counts the words already passed.
    fn collect_spans(
        &self,
        id: NodeId,
        next_word: &mut usize,
        word_starts: &[usize],
        word_ends: &[usize],
        line_end: usize,
        spans: &mut Vec<NodeSpan>,
    ) {
        let first_word = *next_word;
        let position = spans.len();
        spans.push(NodeSpan { id, start: 0, end: 0 });

        for child in &self.tree.node(id).children {
            match child {
                Child::Leaf(_) => *next_word += 1,
                Child::Node(child_id) => {
                    self.collect_spans(*child_id, next_word, word_starts, word_ends, line_end, spans)
                }
            }
        }

        let (start, end) = if *next_word > first_word {
            (word_starts[first_word], word_ends[*next_word - 1])
        } else {
            let gap = word_starts.get(first_word).copied().unwrap_or(line_end);
            (gap, gap)
        };
        spans[position].start = start;
        spans[position].end = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionLocation, Rule, RuleType, Slot, TreeAddress, TreeNode};

    fn sample() -> ElementaryTree {
        let mut tree = ElementaryTree::new("S");
        let root = tree.root();
        tree.root_node_mut().predicate = Some("run".to_string());
        let mut np = TreeNode::new("NP");
        np.semantic_role = Some("ARG0".to_string());
        let np = tree.push_child(root, np);
        let nn = tree.push_child(np, TreeNode::new("NN"));
        tree.push_leaf(nn, "dog");
        let vp = tree.push_child(root, TreeNode::new("VP"));
        let vb = tree.push_child(vp, TreeNode::new("VB"));
        tree.push_leaf(vb, "runs");
        tree
    }

    #[test]
    fn test_plain() {
        let tree = sample();
        insta::assert_snapshot!(TreeDisplay::new(&tree), @r###"
        dog  runs
        ╰───────╯S
        ╰─╯NP
        ╰─╯NN
             ╰──╯VP
             ╰──╯VB
        "###);
    }

    #[test]
    fn test_with_semantics_and_rules() {
        let mut tree = sample();
        let vp = tree.node_at(&TreeAddress::new(vec![1])).unwrap();
        tree.node_mut(vp).push_rule(
            Rule::new(
                RuleType::Attach,
                "NP",
                ActionLocation::new(TreeAddress::root(), Slot::Right, 0),
            )
            .with_semantic_role("ARG1"),
        );
        let display = TreeDisplay::new(&tree).include_semantics().include_rules();
        insta::assert_snapshot!(display, @r###"
        dog  runs
        ╰───────╯S pred=run
        ╰─╯NP role=ARG0
        ╰─╯NN
             ╰──╯VP
               └─att NP on (), slot right, order 0, role ARG1
             ╰──╯VB
        "###);
    }

    #[test]
    fn test_wordless_nodes() {
        let tree = ElementaryTree::from_spine(["S", "VP"], None);
        assert_eq!(TreeDisplay::new(&tree).to_string(), "\n┆S\n┆VP");
    }
}
