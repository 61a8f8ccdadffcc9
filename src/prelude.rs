pub use crate::{
    DisplayOrder, DisplayTree, IconCatalog, LabelSearch, NoFilter, ObservableSelection,
    PathTree, PathTreeConfig, PathTreeError, PathTreeProps, PathTreeResult, PathTreeStyle,
    PathTreeView, PathTreeWidget, SelectionHost, SelectionSet, SelectionSynchronizer,
    SyncOutcome, TreeAction, TreeEvent, TreeFilter, TreeFilterConfig, TreeGlyphs, TreeModel,
    TreeScrollPolicy, TreeViewState, build_path_tree,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TreeKeyBindings};
