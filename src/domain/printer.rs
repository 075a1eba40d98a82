//! Text renderings of a [`Tree`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::tree::Tree;
use crate::domain::tree_traits::TreeConvert;

/// Output format of the printer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Label line plus brace block per node, nested by indentation
    #[default]
    Braces,
    /// Compact notation, parseable again
    Notation,
    /// Nested mapping, e.g. {23: {45: {}}}
    Mapping,
    /// Box-drawing outline
    Tree,
}

/// Renders trees; the indentation unit defaults to one tab per level.
#[derive(Debug, Clone)]
pub struct TreePrinter {
    indent: String,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

enum Step<'a> {
    Open(usize, &'a Tree),
    Close(usize),
}

impl TreePrinter {
    pub fn new() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }

    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    /// Brace rendering. For a node at level `d`:
    ///
    /// ```text
    /// indent(d) label ":\n" indent(d) "{" <children at d+1> "\n" indent(d) "}"
    /// ```
    ///
    /// Children are concatenated without separator.
    #[instrument(level = "trace", skip_all)]
    pub fn render(&self, tree: &Tree) -> String {
        let mut out = String::new();
        // explicit stack instead of recursion: arbitrarily deep trees stay renderable
        let mut stack = vec![Step::Open(0, tree)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(level, node) => {
                    let pad = self.indent.repeat(level);
                    out.push_str(&format!("{pad}{}:\n{pad}{{", node.label()));
                    stack.push(Step::Close(level));
                    for child in node.children().iter().rev() {
                        stack.push(Step::Open(level + 1, child));
                    }
                }
                Step::Close(level) => {
                    out.push('\n');
                    out.push_str(&self.indent.repeat(level));
                    out.push('}');
                }
            }
        }
        out
    }

    /// Absence of a tree renders to the empty string.
    pub fn render_optional(&self, tree: Option<&Tree>) -> String {
        tree.map(|t| self.render(t)).unwrap_or_default()
    }

    pub fn render_as(&self, tree: &Tree, format: Format) -> String {
        match format {
            Format::Braces => self.render(tree),
            Format::Notation => tree.to_string(),
            Format::Mapping => mapping(tree),
            Format::Tree => tree
                .to_termtree()
                .to_string()
                .trim_end_matches('\n')
                .to_string(),
        }
    }
}

enum Token<'a> {
    Node(&'a Tree),
    Text(&'static str),
}

/// Nested mapping view: `{23: {45: {}, 56: {3: {}}}}`.
fn mapping(tree: &Tree) -> String {
    let mut out = String::from("{");
    let mut stack = vec![Token::Node(tree)];
    while let Some(token) = stack.pop() {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Node(node) => {
                out.push_str(&format!("{}: {{", node.label()));
                stack.push(Token::Text("}"));
                for (i, child) in node.children().iter().enumerate().rev() {
                    stack.push(Token::Node(child));
                    if i > 0 {
                        stack.push(Token::Text(", "));
                    }
                }
            }
        }
    }
    out.push('}');
    out
}

/// Canonical compact notation: `23:(45,56:(3))`.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Token::Node(self)];
        while let Some(token) = stack.pop() {
            match token {
                Token::Text(text) => f.write_str(text)?,
                Token::Node(node) => {
                    write!(f, "{}", node.label())?;
                    if node.is_leaf() {
                        continue;
                    }
                    f.write_str(":(")?;
                    stack.push(Token::Text(")"));
                    for (i, child) in node.children().iter().enumerate().rev() {
                        stack.push(Token::Node(child));
                        if i > 0 {
                            stack.push(Token::Text(","));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
