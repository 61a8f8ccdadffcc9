use std::hash::Hash;

use indexmap::IndexSet;
use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::action::{TreeAction, TreeEvent};
use crate::model::{TreeFilter, TreeFilterConfig, TreeModel};
use crate::style::TreeScrollPolicy;

#[cfg(feature = "keymap")]
use crate::keymap::TreeKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// A visible row with metadata used for rendering and navigation.
#[derive(Clone)]
pub struct VisibleRow<Id> {
    pub(crate) id: Id,
    pub(crate) level: u16,
    pub(crate) parent: Option<Id>,
    pub(crate) has_children: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

/// View state: expansion, cursor, selection and the visible-row cache.
///
/// The cursor is the highlighted row; the selection is the ordered set of
/// nodes the user picked, restricted to [`TreeModel::is_selectable`] nodes.
pub struct TreeViewState<Id> {
    table_state: TableState,
    // Expansion is keyed by (parent, id) so it stays tied to one path.
    expanded: FxHashSet<(Option<Id>, Id)>,
    // Cached visible rows to avoid recomputing DFS every render.
    visible_rows: Vec<VisibleRow<Id>>,
    visible_index: FxHashMap<Id, usize>,
    dirty: bool,
    selection: IndexSet<Id, FxBuildHasher>,
    draw_lines: bool,
    #[cfg(feature = "keymap")]
    keymap: TreeKeyBindings,
}

impl<Id: Copy + Eq + Hash> Default for TreeViewState<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash> TreeViewState<Id> {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table_state: TableState::default(),
            expanded: FxHashSet::with_capacity_and_hasher(capacity, FxBuildHasher),
            visible_rows: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            selection: IndexSet::with_hasher(FxBuildHasher),
            draw_lines: true,
            #[cfg(feature = "keymap")]
            keymap: TreeKeyBindings::new(),
        }
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn table_state(&self) -> &TableState {
        &self.table_state
    }

    pub(crate) const fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub(crate) fn visible_rows(&self) -> &[VisibleRow<Id>] {
        &self.visible_rows
    }

    fn visible_index_of(&self, id: Id) -> Option<usize> {
        self.visible_index.get(&id).copied()
    }

    /// Returns whether the node reached through `parent` is expanded.
    pub fn is_expanded(&self, parent: Option<Id>, id: Id) -> bool {
        self.expanded.contains(&(parent, id))
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-row cache as dirty.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn cursor_first(&mut self) {
        let first = (!self.visible_rows.is_empty()).then_some(0);
        self.table_state.select(first);
    }

    pub fn cursor_last(&mut self) {
        let last = self.visible_rows.len().checked_sub(1);
        self.table_state.select(last);
    }

    /// Scrolls the view down by the given number of rows.
    pub fn scroll_down_by(&mut self, amount: u16) {
        self.table_state.scroll_down_by(amount);
    }

    /// Scrolls the view up by the given number of rows.
    pub fn scroll_up_by(&mut self, amount: u16) {
        self.table_state.scroll_up_by(amount);
    }

    pub fn cursor_prev(&mut self) {
        if self.visible_rows.is_empty() {
            self.table_state.select(None);
            return;
        }
        let cursor = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(cursor.saturating_sub(1)));
    }

    pub fn cursor_next(&mut self) {
        if self.visible_rows.is_empty() {
            self.table_state.select(None);
            return;
        }
        let cursor = self.table_state.selected().unwrap_or(0);
        let next = (cursor + 1).min(self.visible_rows.len().saturating_sub(1));
        self.table_state.select(Some(next));
    }

    /// Adjusts the scroll offset so the cursor is within the viewport.
    pub fn ensure_cursor_visible(&mut self, viewport_height: usize) {
        self.clamp_cursor();
        let Some(cursor) = self.table_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.table_state.offset();
        if cursor < offset {
            *self.table_state.offset_mut() = cursor;
        } else if cursor >= offset + viewport_height {
            *self.table_state.offset_mut() = cursor + 1 - viewport_height;
        }
    }

    /// Adjusts cursor visibility according to the scroll policy.
    pub fn ensure_cursor_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) {
        match policy {
            TreeScrollPolicy::KeepInView => self.ensure_cursor_visible(viewport_height),
            TreeScrollPolicy::CenterOnCursor => {
                self.ensure_cursor_visible_centered(viewport_height);
            }
        }
    }

    fn ensure_cursor_visible_centered(&mut self, viewport_height: usize) {
        self.clamp_cursor();
        let Some(cursor) = self.table_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_rows.len();
        if total <= viewport_height {
            *self.table_state.offset_mut() = 0;
            return;
        }

        let max_offset = total.saturating_sub(viewport_height);
        let offset = cursor.saturating_sub(viewport_height / 2).min(max_offset);
        *self.table_state.offset_mut() = offset;
    }

    /// Returns the id under the cursor, if any.
    pub fn cursor_id(&self) -> Option<Id> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx).map(|row| row.id))
    }

    /// Returns the parent id of the cursor node, if any.
    pub fn cursor_parent_id(&self) -> Option<Id> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx).and_then(|row| row.parent))
    }

    /// Returns the depth of the cursor node.
    pub fn cursor_level(&self) -> Option<u16> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx).map(|row| row.level))
    }

    /// Returns the number of visible rows in the current view.
    pub const fn visible_len(&self) -> usize {
        self.visible_rows.len()
    }

    /// Ids of the visible rows, top to bottom.
    pub fn visible_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.visible_rows.iter().map(|row| row.id)
    }

    /// Expands the ancestors of `id` and moves the cursor onto it.
    pub fn focus_id<T: TreeModel<Id = Id>>(&mut self, model: &T, id: Id) -> bool {
        let _ = self.expand_to(model, id);
        self.ensure_visible_nodes(model);
        if let Some(idx) = self.visible_index_of(id) {
            self.table_state.select(Some(idx));
            true
        } else {
            false
        }
    }

    /// Expands all ancestors of the node so it becomes visible.
    pub fn expand_to<T: TreeModel<Id = Id>>(&mut self, model: &T, id: Id) -> bool {
        let Some(path) = Self::find_path_to(model, id) else {
            return false;
        };
        // The target itself stays as it is.
        for (parent, node) in path.into_iter().filter(|&(_, node)| node != id) {
            self.expanded.insert((parent, node));
        }
        self.dirty = true;
        true
    }

    /// Expands the ancestors of every node `is_match` accepts, in one pass.
    pub fn expand_to_matching<T, P>(&mut self, model: &T, is_match: P)
    where
        T: TreeModel<Id = Id>,
        P: Fn(Id) -> bool,
    {
        let mut order = Vec::with_capacity(model.size_hint().max(1));
        self.walk(model, |_, parent, node, _| order.push((parent, node)));

        let mut has_match: FxHashMap<Id, bool> =
            FxHashMap::with_capacity_and_hasher(order.len(), FxBuildHasher);
        for &(parent, node) in order.iter().rev() {
            let below = model
                .children(node)
                .iter()
                .any(|child| has_match.get(child).copied().unwrap_or_default());
            if below {
                self.expanded.insert((parent, node));
            }
            has_match.insert(node, below || is_match(node));
        }
        self.dirty = true;
    }

    /// Expands every node for which `is_expanded` returns `true`.
    ///
    /// Used to seed expansion from per-node flags after a rebuild.
    pub fn expand_where<T, P>(&mut self, model: &T, is_expanded: P)
    where
        T: TreeModel<Id = Id>,
        P: Fn(Id) -> bool,
    {
        self.walk(model, |state, parent, node, has_children| {
            if has_children && is_expanded(node) {
                state.expanded.insert((parent, node));
            }
        });
        self.dirty = true;
    }

    /// Expands all nodes in the model.
    pub fn expand_all<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.expanded.clear();
        let hint = model.size_hint();
        if hint > self.expanded.capacity() {
            self.expanded.reserve(hint - self.expanded.capacity());
        }
        self.expand_where(model, |_| true);
    }

    /// Collapses everything below the root; the root stays open.
    pub fn collapse_all<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.expanded.clear();
        if let Some(root) = model.root() {
            self.expanded.insert((None, root));
        }
        self.dirty = true;
    }

    /// Toggles expansion state for the given node.
    pub fn toggle(&mut self, node_id: Id, parent: Option<Id>) {
        let key = (parent, node_id);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.dirty = true;
    }

    /// Sets expansion state for the given node.
    pub fn set_expanded(&mut self, node_id: Id, parent: Option<Id>, expand: bool) {
        let key = (parent, node_id);
        if expand {
            self.expanded.insert(key);
        } else {
            self.expanded.remove(&key);
        }
        self.dirty = true;
    }

    /// Drops expansion, cursor and selection, e.g. after the model was replaced.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.selection.clear();
        self.visible_rows.clear();
        self.visible_index.clear();
        self.table_state = TableState::default();
        self.dirty = true;
    }

    /// Selected ids in selection order.
    pub fn selection(&self) -> impl Iterator<Item = Id> + '_ {
        self.selection.iter().copied()
    }

    /// Returns `true` if the node is selected.
    #[inline]
    pub fn is_selected(&self, id: Id) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Adds or removes a selectable node. Returns `true` if the selection changed.
    pub fn toggle_selected<T: TreeModel<Id = Id>>(&mut self, model: &T, id: Id) -> bool {
        if !model.is_selectable(id) {
            return false;
        }
        if !self.selection.shift_remove(&id) {
            self.selection.insert(id);
        }
        true
    }

    /// Replaces the selection, silently skipping nodes that cannot be selected.
    ///
    /// Returns `true` if the selection changed.
    pub fn set_selection<T, I>(&mut self, model: &T, ids: I) -> bool
    where
        T: TreeModel<Id = Id>,
        I: IntoIterator<Item = Id>,
    {
        let next: IndexSet<Id, FxBuildHasher> = ids
            .into_iter()
            .filter(|&id| model.is_selectable(id))
            .collect();
        let changed = !next.iter().eq(self.selection.iter());
        self.selection = next;
        changed
    }

    /// Selects every selectable node in DFS order, keeping existing picks first.
    pub fn select_all<T: TreeModel<Id = Id>>(&mut self, model: &T) -> bool {
        let before = self.selection.len();
        self.walk(model, |state, _, node, _| {
            if model.is_selectable(node) {
                state.selection.insert(node);
            }
        });
        self.selection.len() != before
    }

    /// Clears the selection. Returns `true` if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let changed = !self.selection.is_empty();
        self.selection.clear();
        changed
    }

    /// Ensures the visible row list is up to date (if marked dirty).
    pub fn ensure_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        if !self.dirty {
            return;
        }
        self.update_visible_nodes(model);
    }

    /// Ensures the visible row list is up to date with an active filter.
    pub fn ensure_visible_nodes_filtered<T, F>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        if !self.dirty {
            return;
        }
        if !config.enabled {
            self.update_visible_nodes(model);
            return;
        }

        self.visible_rows.clear();
        self.visible_index.clear();
        self.reserve_visible_capacity(model);
        if let Some(root) = model.root() {
            let matches = subtree_matches(model, root, filter);
            self.build_visible_nodes(model, root, config.auto_expand, |id| {
                matches.get(&id).copied().unwrap_or_default()
            });
        }
        self.dirty = false;
        self.clamp_cursor();
    }

    /// Handles a tree action and returns the resulting event.
    pub fn handle_action<T: TreeModel<Id = Id>, C>(
        &mut self,
        model: &T,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        self.ensure_visible_nodes(model);
        self.handle_action_inner(model, action)
    }

    /// Handles a tree action with filtering enabled and returns the resulting event.
    pub fn handle_action_filtered<T, F, C>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        action: TreeAction<C>,
    ) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        self.ensure_visible_nodes_filtered(model, filter, config);
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key<T: TreeModel<Id = Id>>(&mut self, model: &T, key: KeyEvent) -> TreeEvent<()> {
        self.ensure_visible_nodes(model);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<T, C, F>(&mut self, model: &T, key: KeyEvent, custom: F) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id>,
        F: Fn(KeyEvent) -> Option<C>,
    {
        self.ensure_visible_nodes(model);
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with filtering enabled and handles it.
    pub fn handle_key_filtered<T, F>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        key: KeyEvent,
    ) -> TreeEvent<()>
    where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        self.ensure_visible_nodes_filtered(model, filter, config);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    fn handle_action_inner<T: TreeModel<Id = Id>, C>(
        &mut self,
        model: &T,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        let selection_event = |changed: bool| {
            if changed {
                TreeEvent::SelectionChanged
            } else {
                TreeEvent::Handled
            }
        };

        match action {
            TreeAction::Custom(_) | TreeAction::FocusSearch => TreeEvent::Action(action),
            TreeAction::ExpandAll => {
                self.expand_all(model);
                TreeEvent::Handled
            }
            TreeAction::CollapseAll => {
                self.collapse_all(model);
                TreeEvent::Handled
            }
            TreeAction::SelectAll => selection_event(self.select_all(model)),
            TreeAction::DeselectAll => selection_event(self.clear_selection()),
            TreeAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                TreeEvent::Handled
            }
            // The remaining actions work on the rows on screen.
            _ if self.visible_rows.is_empty() => TreeEvent::Unhandled,
            TreeAction::CursorPrev => {
                self.cursor_prev();
                TreeEvent::Handled
            }
            TreeAction::CursorNext => {
                self.cursor_next();
                TreeEvent::Handled
            }
            TreeAction::CursorParent => {
                self.cursor_parent();
                TreeEvent::Handled
            }
            TreeAction::CursorChild => {
                self.cursor_child_with_descendants(model);
                TreeEvent::Handled
            }
            TreeAction::CursorFirst => {
                self.cursor_first();
                TreeEvent::Handled
            }
            TreeAction::CursorLast => {
                self.cursor_last();
                TreeEvent::Handled
            }
            TreeAction::ToggleRecursive => {
                let Some(row) = self.cursor_row().filter(|row| row.has_children) else {
                    return TreeEvent::Unhandled;
                };
                let (id, parent) = (row.id, row.parent);
                let should_expand = !self.expanded.contains(&(parent, id));
                self.set_expanded_recursive(model, id, parent, should_expand);
                self.dirty = true;
                TreeEvent::Handled
            }
            TreeAction::ToggleNode => {
                let Some(row) = self.cursor_row().filter(|row| row.has_children) else {
                    return TreeEvent::Unhandled;
                };
                let (id, parent) = (row.id, row.parent);
                self.toggle(id, parent);
                TreeEvent::Handled
            }
            TreeAction::ToggleSelect => {
                let Some(id) = self.cursor_id() else {
                    return TreeEvent::Unhandled;
                };
                if self.toggle_selected(model, id) {
                    TreeEvent::SelectionChanged
                } else {
                    TreeEvent::Unhandled
                }
            }
        }
    }

    fn cursor_row(&self) -> Option<&VisibleRow<Id>> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx))
    }

    // Pre-order walk over every node regardless of expansion.
    fn walk<T, V>(&mut self, model: &T, mut visit: V)
    where
        T: TreeModel<Id = Id>,
        V: FnMut(&mut Self, Option<Id>, Id, bool),
    {
        let Some(root) = model.root() else {
            return;
        };
        let mut stack = Vec::with_capacity(model.size_hint().max(1));
        stack.push((None, root));
        while let Some((parent, node)) = stack.pop() {
            let children = model.children(node);
            visit(self, parent, node, !children.is_empty());
            // Reverse so children are visited in display order.
            for child in children.iter().rev().copied() {
                stack.push((Some(node), child));
            }
        }
    }

    fn reserve_visible_capacity<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        let hint = model.size_hint();
        if hint == 0 {
            return;
        }
        let row_extra = hint.saturating_sub(self.visible_rows.capacity());
        if row_extra > 0 {
            self.visible_rows.reserve(row_extra);
        }
        let index_extra = hint.saturating_sub(self.visible_index.capacity());
        if index_extra > 0 {
            self.visible_index.reserve(index_extra);
        }
    }

    fn update_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.visible_rows.clear();
        self.visible_index.clear();
        self.reserve_visible_capacity(model);
        if let Some(root) = model.root() {
            self.build_visible_nodes(model, root, false, |_| true);
        }
        self.dirty = false;
        self.clamp_cursor();
    }

    fn find_path_to<T: TreeModel<Id = Id>>(model: &T, target: Id) -> Option<Vec<(Option<Id>, Id)>> {
        let root = model.root()?;
        let mut parents: FxHashMap<Id, Option<Id>> = FxHashMap::default();
        let mut stack = vec![(None, root)];
        let mut found = false;
        while let Some((parent, node)) = stack.pop() {
            parents.insert(node, parent);
            if node == target {
                found = true;
                break;
            }
            stack.extend(model.children(node).iter().map(|&child| (Some(node), child)));
        }
        if !found {
            return None;
        }

        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            let parent = parents.get(&node).copied().flatten();
            path.push((parent, node));
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    fn push_row(&mut self, row: VisibleRow<Id>) {
        self.visible_index.insert(row.id, self.visible_rows.len());
        self.visible_rows.push(row);
    }

    // Pre-order over open nodes with an explicit stack; `keep` prunes subtrees.
    fn build_visible_nodes<T, K>(&mut self, model: &T, root: Id, open_all: bool, keep: K)
    where
        T: TreeModel<Id = Id>,
        K: Fn(Id) -> bool,
    {
        if !keep(root) {
            return;
        }
        let mut stack: Vec<(Id, u16, Option<Id>, SmallVec<[bool; 8]>)> =
            vec![(root, 0, None, SmallVec::new())];
        let mut shown: SmallVec<[Id; 8]> = SmallVec::new();
        while let Some((id, level, parent, is_tail_stack)) = stack.pop() {
            let children = model.children(id);
            shown.clear();
            if open_all || self.expanded.contains(&(parent, id)) {
                shown.extend(children.iter().copied().filter(|&child| keep(child)));
            }
            let last = shown.len().saturating_sub(1);
            for (i, child) in shown.iter().copied().enumerate().rev() {
                let mut child_tail = is_tail_stack.clone();
                child_tail.push(i == last);
                stack.push((child, level.saturating_add(1), Some(id), child_tail));
            }
            self.push_row(VisibleRow {
                id,
                level,
                parent,
                has_children: !children.is_empty(),
                is_tail_stack,
            });
        }
    }

    const fn clamp_cursor(&mut self) {
        if self.visible_rows.is_empty() {
            self.table_state.select(None);
            return;
        }

        if let Some(cursor) = self.table_state.selected()
            && cursor >= self.visible_rows.len()
        {
            self.table_state
                .select(Some(self.visible_rows.len().saturating_sub(1)));
        }
    }

    fn cursor_parent(&mut self) {
        let Some(parent_id) = self.cursor_row().and_then(|row| row.parent) else {
            return;
        };
        if let Some(parent_idx) = self.visible_index_of(parent_id) {
            self.table_state.select(Some(parent_idx));
        }
    }

    fn cursor_child_with_descendants<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        let Some(mut cursor) = self.table_state.selected() else {
            return;
        };
        let Some(row) = self.visible_rows.get(cursor) else {
            return;
        };
        let node_id = row.id;
        let mut level = row.level;
        let parent_id = row.parent;

        if row.has_children {
            if self.expanded.insert((parent_id, node_id)) {
                self.update_visible_nodes(model);
                let Some(current) = self.visible_index_of(node_id) else {
                    return;
                };
                cursor = current;
                level = self.visible_rows[current].level;
                self.table_state.select(Some(current));
            }

            // Prefer children that themselves have descendants.
            for idx in cursor + 1..self.visible_rows.len() {
                let candidate = &self.visible_rows[idx];
                if candidate.level <= level {
                    break;
                }
                if candidate.level == level + 1 && candidate.has_children {
                    self.table_state.select(Some(idx));
                    return;
                }
            }
        }

        // Fallback: the next node in the subtree that has children.
        for idx in cursor + 1..self.visible_rows.len() {
            let candidate = &self.visible_rows[idx];
            if candidate.level < level {
                break;
            }
            if candidate.has_children {
                self.table_state.select(Some(idx));
                return;
            }
        }
    }

    fn set_expanded_recursive<T: TreeModel<Id = Id>>(
        &mut self,
        model: &T,
        node_id: Id,
        parent: Option<Id>,
        expand: bool,
    ) {
        let mut stack = vec![(parent, node_id)];
        while let Some((parent, node)) = stack.pop() {
            let children = model.children(node);
            let key = (parent, node);
            if !expand {
                self.expanded.remove(&key);
            } else if !children.is_empty() {
                self.expanded.insert(key);
            }
            stack.extend(children.iter().map(|&child| (Some(node), child)));
        }
    }
}

/// Whether each node's subtree (the node included) holds a match.
fn subtree_matches<T, F>(model: &T, root: T::Id, filter: &F) -> FxHashMap<T::Id, bool>
where
    T: TreeModel,
    F: TreeFilter<T>,
{
    let mut order = Vec::with_capacity(model.size_hint().max(1));
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(model.children(node).iter().copied());
    }

    // Every child sits after its parent in `order`.
    let mut matches = FxHashMap::with_capacity_and_hasher(order.len(), FxBuildHasher);
    for &node in order.iter().rev() {
        let matched = filter.is_match(model, node)
            || model
                .children(node)
                .iter()
                .any(|child| matches.get(child).copied().unwrap_or_default());
        matches.insert(node, matched);
    }
    matches
}
