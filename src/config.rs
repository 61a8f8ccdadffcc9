use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::display::DisplayOrder;
use crate::icons::IconCatalog;
use crate::path::{PathEntries, PathTreeConfig};
use crate::selection::SelectionSet;

/// Host-side properties of a path tree view.
///
/// Mirrors what the owning application stores; the view rebuilds from it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTreeProps {
    /// Label of the root node.
    pub root: String,
    /// Path -> type entries.
    pub paths: PathEntries,
    pub separator: String,
    /// Initial expansion of non-root nodes.
    pub expand: bool,
    /// Icon overrides per type.
    pub icons: IndexMap<String, String>,
    /// Currently selected leaf ids.
    #[cfg_attr(feature = "serde", serde(alias = "selected_leaves"))]
    pub selected: SelectionSet,
    /// Hide rows that do not match the search instead of highlighting matches.
    pub show_only_matches: bool,
    pub order: DisplayOrder,
}

impl Default for PathTreeProps {
    fn default() -> Self {
        let tree = PathTreeConfig::default();
        Self {
            root: tree.root,
            paths: PathEntries::new(),
            separator: tree.separator,
            expand: tree.expand,
            icons: IndexMap::new(),
            selected: SelectionSet::new(),
            show_only_matches: false,
            order: DisplayOrder::default(),
        }
    }
}

impl PathTreeProps {
    /// Adds or overwrites a path entry.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>, node_type: impl Into<String>) -> Self {
        self.paths.insert(path.into(), node_type.into());
        self
    }

    /// Adds an icon override.
    #[must_use]
    pub fn with_icon(mut self, node_type: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(node_type.into(), icon.into());
        self
    }

    /// Build parameters for the tree.
    pub fn tree_config(&self) -> PathTreeConfig {
        PathTreeConfig {
            root: self.root.clone(),
            separator: self.separator.clone(),
            expand: self.expand,
        }
    }

    /// Built-in icons merged with [`Self::icons`].
    pub fn icon_catalog(&self) -> IconCatalog {
        IconCatalog::with_overrides(
            self.icons
                .iter()
                .map(|(node_type, icon)| (node_type.as_str(), icon.as_str())),
        )
    }
}
