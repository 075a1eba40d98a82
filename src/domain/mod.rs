//! Domain layer: the tree model, the notation parser and the printer
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod label;
pub mod normalize;
pub mod parser;
pub mod printer;
pub mod tree;
pub mod tree_traits;

pub use error::{DomainError, MalformedReason, TreeResult};
pub use label::Label;
pub use normalize::normalize;
pub use parser::{parse, TreeParser};
pub use printer::{Format, TreePrinter};
pub use tree::{DuplicatePolicy, Tree, TreeIterator};
pub use tree_traits::TreeConvert;
