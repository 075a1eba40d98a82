//! Compact labeled-tree notation: parse `23:(45,56:(3),17:(5,99,4))` into a
//! [`Tree`] and render it back as indented text.
//!
//! ```
//! let tree = treestr::parse(" 23 : ( 45 , 56:(3) ) ").unwrap();
//! assert_eq!(tree.children().len(), 2);
//! assert_eq!(treestr::render(&treestr::parse("5").unwrap()), "5:\n{\n}");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    normalize, parse, DomainError, DuplicatePolicy, Format, Label, MalformedReason, Tree,
    TreeParser, TreePrinter,
};

/// Render with the default printer (one tab per level).
pub fn render(tree: &Tree) -> String {
    TreePrinter::new().render(tree)
}
