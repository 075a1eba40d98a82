//! Parser for the compact tree notation.
//!
//! ```text
//! tree      := node
//! node      := INTEGER ( ':' '(' nodelist ')' )?
//! nodelist  := node (',' node)*
//! INTEGER   := one or more decimal digits
//! ```
//!
//! The parser only inspects characters and builds [`Tree`] values. Input is
//! expected to be normalized already (see [`crate::domain::normalize`]).
//! Open nodes are kept on an explicit stack, so nesting depth is limited by
//! memory only, unless a `max_depth` is set.

use tracing::{debug, instrument};

use crate::domain::error::{DomainError, MalformedReason, TreeResult};
use crate::domain::label::Label;
use crate::domain::normalize::normalize;
use crate::domain::tree::Tree;

const NEAR_CHARS: usize = 16;

/// Parser for normalized notation strings.
#[derive(Debug, Clone, Default)]
pub struct TreeParser {
    max_depth: Option<usize>,
}

impl TreeParser {
    /// Parser without a nesting limit.
    pub fn new() -> Self {
        Self { max_depth: None }
    }

    /// Parser that rejects children nested deeper than `max_depth` levels
    /// below the root.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Parse a whitespace-free notation string into a tree.
    ///
    /// Either the whole input is consumed and a complete tree returned, or a
    /// `MalformedInput` error points at the first offending position.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, input: &str) -> TreeResult<Tree> {
        if let Some((position, c)) = input.char_indices().find(|(_, c)| !is_notation_char(*c)) {
            return Err(malformed(input, position, MalformedReason::UnexpectedCharacter(c)));
        }

        let mut cursor = Cursor {
            input,
            pos: 0,
            max_depth: self.max_depth,
        };
        let root = cursor.parse_tree()?;
        if cursor.pos < input.len() {
            return Err(cursor.error(MalformedReason::TrailingCharacters));
        }

        debug!("parsed tree: root={}, nodes={}", root.label(), root.node_count());
        Ok(root)
    }
}

/// Normalize `raw` and parse it without a nesting limit.
pub fn parse(raw: &str) -> TreeResult<Tree> {
    TreeParser::new().parse(&normalize(raw))
}

fn is_notation_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ':' | '(' | ')' | ',')
}

fn malformed(input: &str, position: usize, reason: MalformedReason) -> DomainError {
    let rest = input.get(position..).unwrap_or("");
    let near = if rest.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", rest.chars().take(NEAR_CHARS).collect::<String>())
    };
    DomainError::MalformedInput {
        reason,
        position,
        near,
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    max_depth: Option<usize>,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn error(&self, reason: MalformedReason) -> DomainError {
        malformed(self.input, self.pos, reason)
    }

    fn read_label(&mut self) -> TreeResult<Label> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        Label::from_digits(&self.input[start..self.pos])
            .ok_or_else(|| self.error(MalformedReason::ExpectedInteger))
    }

    /// Parse one node and its whole subtree.
    ///
    /// Nodes whose `)` has not been seen yet live on `open`, with the
    /// children finished so far; its length is the nesting level of the node
    /// being read.
    fn parse_tree(&mut self) -> TreeResult<Tree> {
        let mut open: Vec<(Label, Vec<Tree>)> = Vec::new();
        'nodes: loop {
            let label = self.read_label()?;

            if self.peek() == Some(b':') && self.peek_at(1) == Some(b'(') {
                if let Some(limit) = self.max_depth {
                    if open.len() >= limit {
                        return Err(self.error(MalformedReason::TooDeep(limit)));
                    }
                }
                self.pos += 2;
                if self.peek() == Some(b')') {
                    return Err(self.error(MalformedReason::EmptyNodeList));
                }
                open.push((label, Vec::new()));
                continue;
            }

            let mut finished = Tree::leaf(label);
            loop {
                let Some((parent, mut siblings)) = open.pop() else {
                    return Ok(finished);
                };
                siblings.push(finished);
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        open.push((parent, siblings));
                        continue 'nodes;
                    }
                    Some(b')') => {
                        self.pos += 1;
                        finished = Tree::new(parent, siblings);
                    }
                    _ => return Err(self.error(MalformedReason::ExpectedCloseParen)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reason_of(input: &str) -> MalformedReason {
        match TreeParser::new().parse(input) {
            Err(DomainError::MalformedInput { reason, .. }) => reason,
            other => panic!("expected MalformedInput for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn given_documented_example_when_parsing_then_builds_expected_shape() {
        let tree = TreeParser::new().parse("23:(45,56:(3),17:(5,99,4))").unwrap();
        assert_eq!(tree.label().as_str(), "23");
        let children = tree.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].label().as_str(), "45");
        assert!(children[0].is_leaf());
        assert_eq!(children[1].label().as_str(), "56");
        assert_eq!(children[1].children().len(), 1);
        assert_eq!(children[1].children()[0].label().as_str(), "3");
        assert!(children[1].children()[0].is_leaf());
        let grandchildren: Vec<&str> = children[2]
            .children()
            .iter()
            .map(|c| c.label().as_str())
            .collect();
        assert_eq!(grandchildren, vec!["5", "99", "4"]);
        assert!(children[2].children().iter().all(Tree::is_leaf));
    }

    #[rstest]
    #[case("", MalformedReason::ExpectedInteger)]
    #[case("23:()", MalformedReason::EmptyNodeList)]
    #[case("23:(5", MalformedReason::ExpectedCloseParen)]
    #[case("23:(5,)", MalformedReason::ExpectedInteger)]
    #[case("23:(,5)", MalformedReason::ExpectedInteger)]
    #[case("23)", MalformedReason::TrailingCharacters)]
    #[case("23:", MalformedReason::TrailingCharacters)]
    #[case("23:5", MalformedReason::TrailingCharacters)]
    #[case("1,2", MalformedReason::TrailingCharacters)]
    #[case("1:(2:3)", MalformedReason::ExpectedCloseParen)]
    #[case("(1)", MalformedReason::ExpectedInteger)]
    #[case("1:(2))", MalformedReason::TrailingCharacters)]
    #[case("-1", MalformedReason::UnexpectedCharacter('-'))]
    #[case("1.5", MalformedReason::UnexpectedCharacter('.'))]
    fn test_malformed_inputs(#[case] input: &str, #[case] expected: MalformedReason) {
        assert_eq!(reason_of(input), expected);
    }

    #[test]
    fn given_missing_paren_when_parsing_then_error_points_at_end() {
        let err = TreeParser::new().parse("23:(5").unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedInput {
                reason: MalformedReason::ExpectedCloseParen,
                position: 5,
                near: "end of input".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "malformed input at position 5: expected ')' (near end of input)"
        );
    }

    #[test]
    fn given_code_like_input_when_parsing_then_rejected_as_data() {
        let err = parse("__import__('os').system('true')").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(reason_of("{23:{45:{}}}"), MalformedReason::UnexpectedCharacter('{'));
    }

    #[test]
    fn given_whitespace_when_parsing_raw_then_matches_compact_form() {
        let spaced = parse(" 2 3 : ( 4 ) ").unwrap();
        let compact = parse("23:(4)").unwrap();
        assert!(spaced.same_order(&compact));
    }

    #[test]
    fn given_leading_zeros_when_parsing_then_numeric_value_kept() {
        let tree = parse("007:(00,10)").unwrap();
        assert_eq!(tree.label().as_str(), "7");
        assert_eq!(tree.children()[0].label().as_str(), "0");
        assert_eq!(tree.children()[1].label().as_str(), "10");
    }

    #[test]
    fn given_duplicate_siblings_when_parsing_then_both_preserved_in_order() {
        let tree = parse("1:(2:(3),2:(4))").unwrap();
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].children()[0].label().as_str(), "3");
        assert_eq!(tree.children()[1].children()[0].label().as_str(), "4");
    }

    #[test]
    fn given_depth_limit_when_nesting_exceeds_then_too_deep() {
        let parser = TreeParser::with_max_depth(2);
        assert!(parser.parse("1:(2:(3))").is_ok());
        let err = parser.parse("1:(2:(3:(4)))").unwrap_err();
        assert!(matches!(
            err,
            DomainError::MalformedInput {
                reason: MalformedReason::TooDeep(2),
                ..
            }
        ));
    }

    #[test]
    fn given_deep_nesting_without_limit_when_parsing_then_succeeds() {
        let levels = 200;
        let mut input = String::new();
        for i in 0..levels {
            input.push_str(&format!("{i}:("));
        }
        input.push_str("999");
        input.push_str(&")".repeat(levels));
        let tree = TreeParser::new().parse(&input).unwrap();
        assert_eq!(tree.depth(), levels + 1);
    }

    #[test]
    fn given_hundred_thousand_levels_without_limit_when_parsing_then_succeeds() {
        let levels = 100_000;
        let input = format!("{}7{}", "1:(".repeat(levels), ")".repeat(levels));
        let tree = parse(&input).unwrap();
        assert_eq!(tree.depth(), levels + 1);
        assert_eq!(tree.leaf_labels(), vec![&Label::from(7u64)]);
    }

    #[test]
    fn given_deep_input_missing_one_paren_when_parsing_then_error_at_end() {
        let levels = 100_000;
        let input = format!("{}7{}", "1:(".repeat(levels), ")".repeat(levels - 1));
        let err = parse(&input).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MalformedInput {
                reason: MalformedReason::ExpectedCloseParen,
                position,
                ..
            } if position == input.len()
        ));
    }
}
