use termtree::Tree as Outline;
use tracing::instrument;

use crate::domain::tree::Tree;

/// Conversion into a `termtree` outline for box-drawing display.
pub trait TreeConvert {
    fn to_termtree(&self) -> Outline<String>;
}

impl TreeConvert for Tree {
    #[instrument(level = "trace", skip(self))]
    fn to_termtree(&self) -> Outline<String> {
        // Each open outline waits for the rest of its node's children
        let mut open: Vec<(Outline<String>, std::slice::Iter<'_, Tree>)> = Vec::new();
        let mut current = (Outline::new(self.label().to_string()), self.children().iter());
        loop {
            if let Some(child) = current.1.next() {
                open.push(current);
                current = (Outline::new(child.label().to_string()), child.children().iter());
                continue;
            }
            match open.pop() {
                Some(mut parent) => {
                    parent.0.push(current.0);
                    current = parent;
                }
                None => return current.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parser::parse;

    #[test]
    fn given_nested_tree_when_converting_then_outline_keeps_child_order() {
        let outline = parse("1:(2:(3),4)").unwrap().to_termtree();
        assert_eq!(outline.root, "1");
        let children: Vec<&str> = outline.leaves.iter().map(|l| l.root.as_str()).collect();
        assert_eq!(children, vec!["2", "4"]);
        assert_eq!(outline.leaves[0].leaves[0].root, "3");
    }
}
