//! Hierarchical tree view over delimited path strings for ratatui.
//!
//! A flat `path -> type` mapping is turned into a deduplicated [`PathTree`]
//! ([`build_path_tree`]), shown by [`PathTreeWidget`], and its leaf selection is
//! kept in step with a host-owned `selected` property through a
//! [`SelectionSynchronizer`] that drops feedback loops.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `handle_key*` helpers.
//! - `serde`: serde support for [`PathTreeProps`], [`PathTreeConfig`] and [`SelectionSet`].

mod action;
mod config;
mod context;
mod display;
mod error;
mod glyphs;
mod icons;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
mod path;
pub mod prelude;
mod selection;
mod state;
mod style;
mod sync;
mod view;
mod widget;

pub use action::{TreeAction, TreeEvent};
pub use config::PathTreeProps;
pub use context::TreeRowContext;
pub use display::{DisplayOrder, DisplayTree, LabelSearch};
pub use error::{PathTreeError, PathTreeResult};
pub use glyphs::{TreeGlyphs, TreeLabelParts, tree_label_line};
pub use icons::{DEFAULT_ICON_KEY, DEFAULT_ICONS, IconCatalog};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use model::{NoFilter, TreeFilter, TreeFilterConfig, TreeModel};
pub use path::{
    BRANCH_TYPE, PathEntries, PathNode, PathTree, PathTreeConfig, ROOT_ICON_KEY, ROOT_ID,
    build_path_tree,
};
pub use selection::{ObservableSelection, SelectionHost, SelectionSet};
pub use state::TreeViewState;
pub use style::{PathTreeStyle, TreeScrollPolicy};
pub use sync::{SelectionSynchronizer, SyncDirection, SyncOutcome};
pub use view::PathTreeView;
pub use widget::PathTreeWidget;
