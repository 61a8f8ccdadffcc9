//! Per-type icon lookup.

use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::path::{BRANCH_TYPE, ROOT_ICON_KEY};

/// Catalog key used when a type has no icon of its own.
pub const DEFAULT_ICON_KEY: &str = "default";

/// Built-in icons, shared read-only by every view.
pub const DEFAULT_ICONS: &[(&str, &str)] = &[
    (ROOT_ICON_KEY, "⛁"),
    (BRANCH_TYPE, "🗀"),
    (DEFAULT_ICON_KEY, "🗎"),
];

/// Effective type -> icon catalog of one view.
///
/// Always built fresh from a base table and overrides; never shared mutably.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconCatalog {
    icons: FxHashMap<String, String>,
}

impl IconCatalog {
    /// Catalog holding only [`DEFAULT_ICONS`].
    pub fn builtin() -> Self {
        Self::resolve(DEFAULT_ICONS.iter().copied(), std::iter::empty::<(&str, &str)>())
    }

    /// Merges `overrides` over `base`; an override wins for an identical type.
    pub fn resolve<B, O, K, V>(base: B, overrides: O) -> Self
    where
        B: IntoIterator<Item = (K, V)>,
        O: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut icons = FxHashMap::with_hasher(FxBuildHasher);
        for (node_type, icon) in base.into_iter().chain(overrides) {
            icons.insert(node_type.into(), icon.into());
        }
        Self { icons }
    }

    /// [`DEFAULT_ICONS`] merged with caller overrides.
    pub fn with_overrides<O, K, V>(overrides: O) -> Self
    where
        O: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let base = DEFAULT_ICONS
            .iter()
            .map(|&(node_type, icon)| (node_type.to_string(), icon.to_string()));
        let overrides = overrides
            .into_iter()
            .map(|(node_type, icon)| -> (String, String) { (node_type.into(), icon.into()) });
        Self::resolve(base, overrides)
    }

    /// Icon for `node_type`, falling back to the `default` entry.
    ///
    /// Returns an empty string when even `default` is missing.
    pub fn icon(&self, node_type: &str) -> &str {
        self.icons
            .get(node_type)
            .or_else(|| self.icons.get(DEFAULT_ICON_KEY))
            .map_or("", String::as_str)
    }

    /// Returns `true` if the catalog has an explicit entry for `node_type`.
    pub fn contains(&self, node_type: &str) -> bool {
        self.icons.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
