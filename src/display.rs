//! Display ordering and search over a built [`PathTree`].

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{TreeFilter, TreeModel};
use crate::path::{PathNode, PathTree};

/// Sibling order used when showing a tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayOrder {
    /// First-appearance order of the input entries.
    Insertion,
    /// Nodes with children first, then by label; ties keep insertion order.
    #[default]
    BranchesFirst,
}

/// A [`PathTree`] plus the sibling order it is shown in.
///
/// The tree's own child lists are left in insertion order.
#[derive(Clone, Debug)]
pub struct DisplayTree {
    tree: PathTree,
    order: DisplayOrder,
    children: Vec<Vec<usize>>,
}

impl DisplayTree {
    pub fn new(tree: PathTree, order: DisplayOrder) -> Self {
        let children = (0..tree.node_count())
            .map(|idx| {
                let mut children = tree.child_indices(idx).to_vec();
                if order == DisplayOrder::BranchesFirst {
                    children.sort_by(|&a, &b| compare_branches_first(&tree, a, b));
                }
                children
            })
            .collect();
        Self {
            tree,
            order,
            children,
        }
    }

    #[inline]
    pub const fn tree(&self) -> &PathTree {
        &self.tree
    }

    #[inline]
    pub const fn order(&self) -> DisplayOrder {
        self.order
    }

    pub fn into_tree(self) -> PathTree {
        self.tree
    }

    pub fn node(&self, idx: usize) -> Option<&PathNode> {
        self.tree.node(idx)
    }
}

fn compare_branches_first(tree: &PathTree, a: usize, b: usize) -> Ordering {
    tree.is_leaf(a)
        .cmp(&tree.is_leaf(b))
        .then_with(|| match (tree.node(a), tree.node(b)) {
            (Some(a), Some(b)) => a.label.cmp(&b.label),
            _ => Ordering::Equal,
        })
}

impl TreeModel for DisplayTree {
    type Id = usize;

    fn root(&self) -> Option<Self::Id> {
        Some(PathTree::ROOT)
    }

    fn children(&self, id: Self::Id) -> &[Self::Id] {
        self.children.get(id).map_or(&[][..], Vec::as_slice)
    }

    fn contains(&self, id: Self::Id) -> bool {
        self.tree.contains(id)
    }

    fn size_hint(&self) -> usize {
        self.tree.size_hint()
    }

    fn is_selectable(&self, id: Self::Id) -> bool {
        self.tree.is_selectable(id)
    }
}

/// Case-insensitive substring match on node labels.
///
/// An empty search matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSearch {
    text: String,
    needle: String,
}

impl LabelSearch {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let needle = text.trim().to_lowercase();
        Self { text, needle }
    }

    /// Search text as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if there is something to search for.
    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    pub fn matches_label(&self, label: &str) -> bool {
        self.needle.is_empty() || label.to_lowercase().contains(&self.needle)
    }
}

impl TreeFilter<DisplayTree> for LabelSearch {
    fn is_match(&self, model: &DisplayTree, id: usize) -> bool {
        model
            .node(id)
            .is_some_and(|node| self.matches_label(&node.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathTreeConfig;
    use pretty_assertions::assert_eq;

    fn labels(display: &DisplayTree, idx: usize) -> Vec<&str> {
        display
            .children(idx)
            .iter()
            .map(|&child| display.node(child).unwrap().label.as_str())
            .collect()
    }

    fn sample() -> PathTree {
        PathTreeConfig::default()
            .build([
                ("zeta", "file"),
                ("beta/x", "file"),
                ("alpha", "file"),
                ("gamma/y", "file"),
            ])
            .unwrap()
    }

    #[test]
    fn branches_first_then_labels() {
        let display = DisplayTree::new(sample(), DisplayOrder::BranchesFirst);

        assert_eq!(
            labels(&display, PathTree::ROOT),
            vec!["beta", "gamma", "alpha", "zeta"]
        );
    }

    #[test]
    fn insertion_order_is_untouched() {
        let display = DisplayTree::new(sample(), DisplayOrder::Insertion);

        assert_eq!(
            labels(&display, PathTree::ROOT),
            vec!["zeta", "beta", "alpha", "gamma"]
        );
    }

    #[test]
    fn sorting_does_not_reorder_the_built_tree() {
        let tree = sample();
        let original = tree.child_indices(PathTree::ROOT).to_vec();
        let display = DisplayTree::new(tree, DisplayOrder::BranchesFirst);

        assert_eq!(display.tree().child_indices(PathTree::ROOT), original.as_slice());
    }

    #[test]
    fn search_is_case_insensitive() {
        let display = DisplayTree::new(sample(), DisplayOrder::Insertion);
        let search = LabelSearch::new("  ALP ");
        let alpha = display.tree().index_of("alpha").unwrap();
        let zeta = display.tree().index_of("zeta").unwrap();

        assert!(search.is_active());
        assert!(search.is_match(&display, alpha));
        assert!(!search.is_match(&display, zeta));
        assert!(LabelSearch::default().is_match(&display, zeta));
    }
}
