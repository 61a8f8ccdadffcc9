use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PathTreeError, PathTreeResult};
use crate::model::TreeModel;

/// Id of the synthetic root node.
///
/// Real ids are built from non-empty segments, so they can never be empty.
pub const ROOT_ID: &str = "";
/// Type assigned to every interior node that no entry typed explicitly.
pub const BRANCH_TYPE: &str = "branch";
/// Icon catalog key used for the root node.
pub const ROOT_ICON_KEY: &str = "root";

/// Path -> type mapping; iteration order is insertion order.
pub type PathEntries = IndexMap<String, String>;

/// Parameters that shape a tree build.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTreeConfig {
    /// Label of the root node.
    pub root: String,
    /// Segment delimiter; must not be empty.
    pub separator: String,
    /// Initial expansion of every non-root node.
    pub expand: bool,
}

impl Default for PathTreeConfig {
    fn default() -> Self {
        Self {
            root: "root".to_string(),
            separator: "/".to_string(),
            expand: false,
        }
    }
}

impl PathTreeConfig {
    /// Builds a tree from `entries` using this configuration.
    pub fn build<I, K, V>(&self, entries: I) -> PathTreeResult<PathTree>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        build_path_tree(self, entries)
    }
}

/// One node of a built tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNode {
    /// Fully qualified path from the root, or [`ROOT_ID`].
    pub id: String,
    /// Last path segment (or the root label).
    pub label: String,
    /// Entry type, or [`BRANCH_TYPE`] for synthesized prefixes.
    pub node_type: String,
    /// Initial expansion.
    pub expanded: bool,
    /// Disabled nodes can never be selected.
    pub disabled: bool,
    /// Child indices in first-appearance order.
    pub children: Vec<usize>,
}

impl PathNode {
    /// Returns `true` if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed hierarchy produced by [`build_path_tree`].
///
/// The tree is immutable once built; any input change means building a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTree {
    nodes: Vec<PathNode>,
    index: FxHashMap<String, usize>,
}

impl PathTree {
    /// Arena index of the root node.
    pub const ROOT: usize = 0;

    fn with_root(label: &str) -> Self {
        let root = PathNode {
            id: ROOT_ID.to_string(),
            label: label.to_string(),
            node_type: BRANCH_TYPE.to_string(),
            expanded: true,
            disabled: true,
            children: Vec::new(),
        };
        let mut index = FxHashMap::with_capacity_and_hasher(1, FxBuildHasher);
        index.insert(root.id.clone(), Self::ROOT);
        Self {
            nodes: vec![root],
            index,
        }
    }

    fn push_child(&mut self, parent: usize, id: String, label: &str, expanded: bool) -> usize {
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(PathNode {
            id,
            label: label.to_string(),
            node_type: BRANCH_TYPE.to_string(),
            expanded,
            disabled: false,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Returns the root node.
    #[inline]
    pub fn root_node(&self) -> &PathNode {
        &self.nodes[Self::ROOT]
    }

    /// Returns the node stored at `idx`.
    #[inline]
    pub fn node(&self, idx: usize) -> Option<&PathNode> {
        self.nodes.get(idx)
    }

    /// Looks a node up by its fully qualified id.
    pub fn get(&self, id: &str) -> Option<&PathNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Returns the arena index of the node with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of nodes including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates all nodes in creation order (root first).
    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.iter()
    }

    /// Child indices of `idx` (empty for unknown indices).
    pub fn child_indices(&self, idx: usize) -> &[usize] {
        self.nodes
            .get(idx)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Returns `true` if `idx` exists and has no children.
    pub fn is_leaf(&self, idx: usize) -> bool {
        self.nodes.get(idx).is_some_and(PathNode::is_leaf)
    }

    /// Key used to look up the icon of `idx`.
    pub fn icon_key(&self, idx: usize) -> &str {
        if idx == Self::ROOT {
            return ROOT_ICON_KEY;
        }
        self.nodes
            .get(idx)
            .map_or(BRANCH_TYPE, |node| node.node_type.as_str())
    }
}

impl TreeModel for PathTree {
    type Id = usize;

    fn root(&self) -> Option<Self::Id> {
        Some(Self::ROOT)
    }

    fn children(&self, id: Self::Id) -> &[Self::Id] {
        self.child_indices(id)
    }

    fn contains(&self, id: Self::Id) -> bool {
        id < self.nodes.len()
    }

    fn size_hint(&self) -> usize {
        self.nodes.len()
    }

    fn is_selectable(&self, id: Self::Id) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| !node.disabled && node.is_leaf())
    }
}

/// Converts `(path, type)` entries into a deduplicated hierarchy.
///
/// Entries are processed in iteration order: shared prefixes map to a single
/// node, children keep first-appearance order, and a repeated path takes the
/// type of its last entry. Empty segments are skipped; a path with no
/// segments at all aborts the build.
pub fn build_path_tree<I, K, V>(config: &PathTreeConfig, entries: I) -> PathTreeResult<PathTree>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let separator = config.separator.as_str();
    if separator.is_empty() {
        return Err(PathTreeError::EmptySeparator);
    }

    let mut tree = PathTree::with_root(&config.root);
    let mut entry_count = 0usize;
    for (path, node_type) in entries {
        let path = path.as_ref();
        let mut segments = path
            .split(separator)
            .filter(|segment| !segment.is_empty())
            .peekable();
        if segments.peek().is_none() {
            return Err(PathTreeError::malformed_path(path, separator));
        }

        let mut current = PathTree::ROOT;
        let mut id = String::with_capacity(path.len());
        for segment in segments {
            if current != PathTree::ROOT {
                id.push_str(separator);
            }
            id.push_str(segment);
            current = match tree.index_of(&id) {
                Some(existing) => existing,
                None => tree.push_child(current, id.clone(), segment, config.expand),
            };
        }

        tree.nodes[current].node_type = node_type.into();
        entry_count += 1;
    }

    debug!(
        entries = entry_count,
        nodes = tree.node_count(),
        separator,
        "built path tree"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> PathTreeConfig {
        PathTreeConfig::default()
    }

    fn child_ids(tree: &PathTree, id: &str) -> Vec<String> {
        let idx = tree.index_of(id).unwrap();
        tree.child_indices(idx)
            .iter()
            .map(|&child| tree.node(child).unwrap().id.clone())
            .collect()
    }

    #[test]
    fn root_is_expanded_disabled_branch() {
        let tree = build_path_tree(&config(), [("a", "file")]).unwrap();
        let root = tree.root_node();

        assert_eq!(root.id, ROOT_ID);
        assert_eq!(root.label, "root");
        assert_eq!(root.node_type, BRANCH_TYPE);
        assert!(root.expanded);
        assert!(root.disabled);
        assert_eq!(tree.icon_key(PathTree::ROOT), ROOT_ICON_KEY);
    }

    #[test]
    fn shared_prefixes_become_one_branch() {
        let tree = build_path_tree(&config(), [("a/b", "leaf"), ("a/c", "leaf")]).unwrap();

        let a = tree.get("a").unwrap();
        assert_eq!(a.node_type, BRANCH_TYPE);
        assert_eq!(child_ids(&tree, "a"), vec!["a/b", "a/c"]);
        assert_eq!(child_ids(&tree, ROOT_ID), vec!["a"]);
        assert_eq!(tree.nodes().filter(|node| node.id == "a").count(), 1);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn repeated_path_takes_last_type() {
        let tree = build_path_tree(&config(), vec![("a", "x"), ("a", "y")]).unwrap();

        assert_eq!(tree.get("a").unwrap().node_type, "y");
        assert_eq!(tree.node_count(), 2);
        assert_eq!(child_ids(&tree, ROOT_ID), vec!["a"]);
    }

    #[test]
    fn typed_entry_can_also_have_children() {
        let tree = build_path_tree(&config(), [("a", "file"), ("a/b", "file")]).unwrap();

        let a = tree.get("a").unwrap();
        assert_eq!(a.node_type, "file");
        assert_eq!(child_ids(&tree, "a"), vec!["a/b"]);
        assert!(!tree.is_selectable(tree.index_of("a").unwrap()));
        assert!(tree.is_selectable(tree.index_of("a/b").unwrap()));
    }

    #[test]
    fn prefix_entry_after_child_keeps_its_type() {
        let tree = build_path_tree(&config(), [("a/b", "file"), ("a", "dir")]).unwrap();

        assert_eq!(tree.get("a").unwrap().node_type, "dir");
        assert_eq!(tree.get("a/b").unwrap().node_type, "file");
    }

    #[test]
    fn children_follow_first_appearance() {
        let entries: PathEntries = [("z/1", "f"), ("a/2", "f"), ("z/0", "f"), ("m", "f")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let tree = build_path_tree(&config(), &entries).unwrap();

        assert_eq!(child_ids(&tree, ROOT_ID), vec!["z", "a", "m"]);
        assert_eq!(child_ids(&tree, "z"), vec!["z/1", "z/0"]);
    }

    #[test]
    fn identical_inputs_build_identical_trees() {
        let entries = [("x/y/z", "a"), ("x/w", "b"), ("q", "c")];
        let first = build_path_tree(&config(), entries).unwrap();
        let second = build_path_tree(&config(), entries).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn expand_flag_applies_to_non_root_nodes() {
        let config = PathTreeConfig {
            expand: true,
            ..PathTreeConfig::default()
        };
        let tree = build_path_tree(&config, [("a/b", "f")]).unwrap();
        assert!(tree.nodes().all(|node| node.expanded));

        let tree = build_path_tree(&PathTreeConfig::default(), [("a/b", "f")]).unwrap();
        assert!(tree.get("a").is_some_and(|node| !node.expanded));
        assert!(tree.root_node().expanded);
    }

    #[test]
    fn multi_char_separator_and_empty_segments() {
        let config = PathTreeConfig {
            separator: "::".to_string(),
            ..PathTreeConfig::default()
        };
        let tree = build_path_tree(&config, [("core::::fmt", "mod"), ("::core::io", "mod")]).unwrap();

        assert_eq!(child_ids(&tree, ROOT_ID), vec!["core"]);
        assert_eq!(child_ids(&tree, "core"), vec!["core::fmt", "core::io"]);
        assert_eq!(tree.get("core::fmt").unwrap().label, "fmt");
    }

    #[test]
    fn segment_matching_a_dot_is_an_ordinary_node() {
        let tree = build_path_tree(&config(), [(".", "f"), ("./a", "f")]).unwrap();

        assert_eq!(tree.get(".").unwrap().node_type, "f");
        assert_eq!(child_ids(&tree, "."), vec!["./a"]);
        assert_eq!(tree.root_node().id, ROOT_ID);
    }

    #[test]
    fn empty_path_is_rejected() {
        let result = build_path_tree(&config(), [("a", "f"), ("", "f")]);

        assert_eq!(
            result,
            Err(PathTreeError::MalformedPath {
                path: String::new(),
                separator: "/".to_string(),
            })
        );
    }

    #[test]
    fn separator_only_paths_are_rejected() {
        for path in ["/", "///"] {
            let result = build_path_tree(&config(), [(path, "f")]);
            assert!(matches!(result, Err(PathTreeError::MalformedPath { .. })));
        }
    }

    #[test]
    fn empty_separator_is_rejected() {
        let config = PathTreeConfig {
            separator: String::new(),
            ..PathTreeConfig::default()
        };

        assert_eq!(
            build_path_tree(&config, [("a", "f")]),
            Err(PathTreeError::EmptySeparator)
        );
    }

    #[test]
    fn empty_input_yields_lone_root() {
        let tree = build_path_tree(&config(), Vec::<(String, String)>::new()).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_leaf(PathTree::ROOT));
        assert!(!tree.is_selectable(PathTree::ROOT));
    }
}
