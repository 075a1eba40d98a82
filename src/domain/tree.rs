//! The labeled tree produced by the parser and consumed by the printer.
//!
//! Every whole-tree operation here (clone, drop, equality, duplicate
//! collapsing) walks the tree with an explicit stack, so nesting depth is
//! bounded by memory rather than by the call stack.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::label::Label;

/// A labeled node with an ordered list of children.
///
/// Sibling labels may repeat. Equality is structural and ignores sibling
/// order; use [`Tree::same_order`] when order matters.
#[derive(Debug)]
pub struct Tree {
    label: Label,
    children: Vec<Tree>,
}

/// What to do with sibling nodes that share a label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep every sibling in its original position
    #[default]
    Keep,
    /// Fail on the first repeated sibling label
    Reject,
    /// Collapse repeats: first position, last subtree
    LastWins,
}

impl Tree {
    pub fn leaf(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn new(label: impl Into<Label>, children: Vec<Tree>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    pub fn with_child(mut self, child: Tree) -> Self {
        self.children.push(child);
        self
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels; a lone leaf has depth 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(level, _)| level + 1).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Labels of all leaves, left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn leaf_labels(&self) -> Vec<&Label> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.label())
            .collect()
    }

    /// Pre-order traversal yielding `(nesting level, node)`, root at level 0.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Structural equality that also requires identical sibling order.
    pub fn same_order(&self, other: &Tree) -> bool {
        // label plus child count in pre-order determines an ordered tree
        fn shape<'a>((_, node): (usize, &'a Tree)) -> (&'a Label, usize) {
            (node.label(), node.children.len())
        }
        self.iter().map(shape).eq(other.iter().map(shape))
    }

    /// Every `(parent, label)` pair where `label` occurs more than once among
    /// the children of a `parent` node.
    pub fn duplicate_siblings(&self) -> Vec<(&Label, &Label)> {
        self.iter()
            .flat_map(|(_, node)| {
                node.children
                    .iter()
                    .map(Tree::label)
                    .duplicates()
                    .map(move |label| (node.label(), label))
            })
            .collect()
    }

    /// Apply a duplicate-sibling policy to the whole tree.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_duplicate_policy(self, policy: DuplicatePolicy) -> TreeResult<Tree> {
        match policy {
            DuplicatePolicy::Keep => Ok(self),
            DuplicatePolicy::Reject => {
                if let Some((parent, label)) = self.duplicate_siblings().first() {
                    return Err(DomainError::DuplicateSibling {
                        parent: (*parent).clone(),
                        label: (*label).clone(),
                    });
                }
                Ok(self)
            }
            DuplicatePolicy::LastWins => Ok(self.collapse_duplicates()),
        }
    }

    fn collapse_duplicates(self) -> Tree {
        let mut open: Vec<Rebuild> = Vec::new();
        let mut current = Rebuild::collapsing(self);
        loop {
            if let Some(child) = current.pending.next() {
                open.push(current);
                current = Rebuild::collapsing(child);
                continue;
            }
            let node = Tree::new(current.label, current.done);
            match open.pop() {
                Some(parent) => {
                    current = parent;
                    current.done.push(node);
                }
                None => return node,
            }
        }
    }

    /// Bottom-up id per subtree, shared through `table`: two subtrees get the
    /// same id iff they are equal ignoring sibling order.
    fn shape_id(&self, table: &mut HashMap<(Label, Vec<usize>), usize>) -> usize {
        let mut ids: Vec<usize> = Vec::new();
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let mut child_ids = ids.split_off(ids.len() - node.children.len());
                child_ids.sort_unstable();
                let next = table.len();
                let id = *table
                    .entry((node.label.clone(), child_ids))
                    .or_insert(next);
                ids.push(id);
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().map(|child| (child, false)));
            }
        }
        ids.pop().unwrap_or_default()
    }
}

/// A node whose children are being rebuilt one at a time.
struct Rebuild {
    label: Label,
    pending: std::vec::IntoIter<Tree>,
    done: Vec<Tree>,
}

impl Rebuild {
    /// Take `node` apart, collapsing repeated child labels to one slot that
    /// holds the last subtree.
    fn collapsing(mut node: Tree) -> Self {
        let children = std::mem::take(&mut node.children);
        let mut slots: HashMap<Label, usize> = HashMap::new();
        let mut kept: Vec<Tree> = Vec::with_capacity(children.len());
        for child in children {
            match slots.get(child.label()) {
                Some(&idx) => kept[idx] = child,
                None => {
                    slots.insert(child.label().clone(), kept.len());
                    kept.push(child);
                }
            }
        }
        Self {
            label: node.label.clone(),
            done: Vec::with_capacity(kept.len()),
            pending: kept.into_iter(),
        }
    }
}

impl Clone for Tree {
    fn clone(&self) -> Self {
        let mut open: Vec<(&Tree, std::slice::Iter<'_, Tree>, Vec<Tree>)> = Vec::new();
        let mut current = (self, self.children.iter(), Vec::with_capacity(self.children.len()));
        loop {
            if let Some(child) = current.1.next() {
                open.push(current);
                current = (child, child.children.iter(), Vec::with_capacity(child.children.len()));
                continue;
            }
            let node = Tree {
                label: current.0.label.clone(),
                children: current.2,
            };
            match open.pop() {
                Some(parent) => {
                    current = parent;
                    current.2.push(node);
                }
                None => return node,
            }
        }
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Order-insensitive structural equality.
///
/// Runs in O(n log n): every subtree of both trees is mapped to a canonical
/// id from its label and the sorted ids of its children.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        if self.label != other.label || self.children.len() != other.children.len() {
            return false;
        }
        let mut table = HashMap::new();
        self.shape_id(&mut table) == other.shape_id(&mut table)
    }
}

impl Eq for Tree {}

pub struct TreeIterator<'a> {
    stack: Vec<(usize, &'a Tree)>,
}

impl<'a> TreeIterator<'a> {
    fn new(root: &'a Tree) -> Self {
        Self {
            stack: vec![(0, root)],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (usize, &'a Tree);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((level + 1, child));
        }
        Some((level, node))
    }
}
