//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::label::Label;

/// Why a notation string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    ExpectedInteger,
    ExpectedCloseParen,
    EmptyNodeList,
    TrailingCharacters,
    UnexpectedCharacter(char),
    TooDeep(usize),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::ExpectedInteger => write!(f, "expected integer"),
            MalformedReason::ExpectedCloseParen => write!(f, "expected ')'"),
            MalformedReason::EmptyNodeList => write!(f, "empty node list"),
            MalformedReason::TrailingCharacters => write!(f, "trailing characters"),
            MalformedReason::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            MalformedReason::TooDeep(limit) => write!(f, "nesting deeper than {limit} levels"),
        }
    }
}

/// Domain errors represent notation and tree-shape violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// `position` is a byte offset into the normalized (whitespace-free) notation.
    #[error("malformed input at position {position}: {reason} (near {near})")]
    MalformedInput {
        reason: MalformedReason,
        position: usize,
        near: String,
    },

    #[error("duplicate sibling label {label} under {parent}")]
    DuplicateSibling { parent: Label, label: Label },
}

impl DomainError {
    /// True for grammar violations raised by the parser.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DomainError::MalformedInput { .. })
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
