use std::cell::RefCell;
use std::rc::Rc;

use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::{StatefulWidget, Widget};
use tracing::debug;

#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

use crate::action::{TreeAction, TreeEvent};
use crate::config::PathTreeProps;
use crate::display::{DisplayOrder, DisplayTree, LabelSearch};
use crate::error::PathTreeResult;
use crate::glyphs::TreeGlyphs;
use crate::icons::IconCatalog;
use crate::model::TreeFilterConfig;
use crate::path::{PathTree, build_path_tree};
use crate::selection::{ObservableSelection, SelectionHost, SelectionSet};
use crate::state::TreeViewState;
use crate::style::PathTreeStyle;
use crate::sync::{SelectionSynchronizer, SyncOutcome};
use crate::widget::PathTreeWidget;

/// Owns one rendered path tree and keeps its selection in step with the host.
///
/// The tree is rebuilt wholesale from [`PathTreeProps`]; expansion, cursor and
/// selection are reseeded on every rebuild. Host-originated selection changes
/// go through [`Self::host_selection_changed`]; user-originated ones are
/// written to the host from [`Self::handle_action`]. Both pass the same
/// [`SelectionSynchronizer`], so a host that notifies synchronously cannot
/// bounce a change back into the view.
///
/// A host that notifies listeners is wired with [`Self::follow`], or by hand:
///
/// ```ignore
/// let sync = view.borrow().synchronizer();
/// host.subscribe(move |sel| {
///     let _ = sync.on_host_selection_changed(sel, |sel| {
///         view.borrow_mut().apply_host_selection(sel);
///     });
/// });
/// ```
pub struct PathTreeView {
    display: DisplayTree,
    icons: IconCatalog,
    state: TreeViewState<usize>,
    sync: Rc<SelectionSynchronizer>,
    search: LabelSearch,
    show_only_matches: bool,
    style: PathTreeStyle<'static>,
    glyphs: TreeGlyphs<'static>,
}

impl PathTreeView {
    /// Builds the view from host properties.
    pub fn new(props: &PathTreeProps) -> PathTreeResult<Self> {
        let (display, icons) = Self::build(props)?;
        let mut view = Self {
            display,
            icons,
            state: TreeViewState::new(),
            sync: Rc::new(SelectionSynchronizer::new()),
            search: LabelSearch::default(),
            show_only_matches: props.show_only_matches,
            style: PathTreeStyle::default(),
            glyphs: TreeGlyphs::unicode(),
        };
        view.reseed(&props.selected);
        Ok(view)
    }

    /// Rebuilds after any property change. On error the current tree is kept.
    pub fn rebuild(&mut self, props: &PathTreeProps) -> PathTreeResult<()> {
        let (display, icons) = Self::build(props)?;
        self.display = display;
        self.icons = icons;
        self.show_only_matches = props.show_only_matches;
        self.reseed(&props.selected);
        Ok(())
    }

    fn build(props: &PathTreeProps) -> PathTreeResult<(DisplayTree, IconCatalog)> {
        let tree = build_path_tree(&props.tree_config(), &props.paths)?;
        debug!(
            nodes = tree.node_count(),
            selected = props.selected.len(),
            "rebuilding path tree view"
        );
        Ok((DisplayTree::new(tree, props.order), props.icon_catalog()))
    }

    fn reseed(&mut self, selected: &SelectionSet) {
        let display = &self.display;
        self.state.reset();
        self.state.expand_where(display, |idx| {
            display.node(idx).is_some_and(|node| node.expanded)
        });
        apply_selection(&mut self.state, display, selected);
        if self.search.is_active() {
            self.reveal_matches();
        }
    }

    pub const fn tree(&self) -> &PathTree {
        self.display.tree()
    }

    pub const fn display(&self) -> &DisplayTree {
        &self.display
    }

    pub const fn icons(&self) -> &IconCatalog {
        &self.icons
    }

    pub const fn state(&self) -> &TreeViewState<usize> {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut TreeViewState<usize> {
        &mut self.state
    }

    pub const fn order(&self) -> DisplayOrder {
        self.display.order()
    }

    /// Shared synchronizer. Host listeners run their view updates inside its
    /// [`SelectionSynchronizer::on_host_selection_changed`] so the view's own
    /// writes are dropped before the view is borrowed again.
    pub fn synchronizer(&self) -> Rc<SelectionSynchronizer> {
        Rc::clone(&self.sync)
    }

    pub fn set_style(&mut self, style: PathTreeStyle<'static>) {
        self.style = style;
    }

    pub const fn set_glyphs(&mut self, glyphs: TreeGlyphs<'static>) {
        self.glyphs = glyphs;
    }

    /// Current view selection as node ids.
    pub fn ui_selection(&self) -> SelectionSet {
        let tree = self.display.tree();
        self.state
            .selection()
            .filter_map(|idx| tree.node(idx).map(|node| node.id.clone()))
            .collect()
    }

    /// Applies a host-side selection to the view.
    ///
    /// Unknown ids and ids of non-leaf nodes are skipped.
    pub fn host_selection_changed(&mut self, selection: &SelectionSet) -> SyncOutcome {
        let Self {
            display,
            state,
            sync,
            ..
        } = self;
        sync.on_host_selection_changed(selection, |selection| {
            apply_selection(state, display, selection);
        })
    }

    /// Applies a host-side selection without taking the latch.
    ///
    /// Meant for host listeners already running inside
    /// [`SelectionSynchronizer::on_host_selection_changed`].
    pub fn apply_host_selection(&mut self, selection: &SelectionSet) {
        apply_selection(&mut self.state, &self.display, selection);
    }

    /// Subscribes `view` to `host` so external host writes reach the view.
    ///
    /// The listener holds the view weakly and shares its synchronizer.
    pub fn follow(view: &Rc<RefCell<Self>>, host: &ObservableSelection) {
        let sync = view.borrow().synchronizer();
        let view = Rc::downgrade(view);
        host.subscribe(move |selection| {
            let _ = sync.on_host_selection_changed(selection, |selection| {
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().apply_host_selection(selection);
                }
            });
        });
    }

    /// Handles a view action; a selection change is written to `host`.
    pub fn handle_action<H, C>(&mut self, action: TreeAction<C>, host: &H) -> TreeEvent<C>
    where
        H: SelectionHost + ?Sized,
    {
        let event = if self.filters_rows() {
            self.state.handle_action_filtered(
                &self.display,
                &self.search,
                TreeFilterConfig::enabled(),
                action,
            )
        } else {
            self.state.handle_action(&self.display, action)
        };
        if matches!(event, TreeEvent::SelectionChanged) {
            let _ = self.publish_selection(host);
        }
        event
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key through the state's key bindings and handles it.
    pub fn handle_key<H>(&mut self, key: KeyEvent, host: &H) -> TreeEvent<()>
    where
        H: SelectionHost + ?Sized,
    {
        let event = if self.filters_rows() {
            self.state.handle_key_filtered(
                &self.display,
                &self.search,
                TreeFilterConfig::enabled(),
                key,
            )
        } else {
            self.state.handle_key(&self.display, key)
        };
        if matches!(event, TreeEvent::SelectionChanged) {
            let _ = self.publish_selection(host);
        }
        event
    }

    fn publish_selection<H>(&self, host: &H) -> SyncOutcome
    where
        H: SelectionHost + ?Sized,
    {
        let selection = self.ui_selection();
        self.sync.on_ui_selection_changed(&selection, |selection| {
            host.set_selected(selection.clone());
        })
    }

    pub fn expand_all(&mut self) {
        self.state.expand_all(&self.display);
    }

    pub fn collapse_all(&mut self) {
        self.state.collapse_all(&self.display);
    }

    /// Selects every leaf and writes the result to the host.
    pub fn select_all<H>(&mut self, host: &H) -> TreeEvent<()>
    where
        H: SelectionHost + ?Sized,
    {
        self.handle_action(TreeAction::SelectAll, host)
    }

    /// Clears the selection and writes the result to the host.
    pub fn deselect_all<H>(&mut self, host: &H) -> TreeEvent<()>
    where
        H: SelectionHost + ?Sized,
    {
        self.handle_action(TreeAction::DeselectAll, host)
    }

    pub fn search(&self) -> &LabelSearch {
        &self.search
    }

    /// Sets the search text; matches are either revealed or the only rows shown.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = LabelSearch::new(text);
        self.state.invalidate();
        if self.search.is_active() {
            self.reveal_matches();
        }
    }

    fn filters_rows(&self) -> bool {
        self.show_only_matches && self.search.is_active()
    }

    // Open the ancestors of every match, like a search box in a file tree.
    fn reveal_matches(&mut self) {
        if self.show_only_matches {
            return;
        }
        let Self {
            display,
            state,
            search,
            ..
        } = self;
        let tree = display.tree();
        state.expand_to_matching(display, |idx| {
            tree.node(idx)
                .is_some_and(|node| search.matches_label(&node.label))
        });
    }

    /// Renders into `buf` using the view's style.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let widget = PathTreeWidget::new(&self.display, &self.icons, self.style.clone())
            .glyphs(self.glyphs)
            .highlight(&self.search);
        if self.filters_rows() {
            widget
                .with_filter(self.search.clone(), TreeFilterConfig::enabled())
                .render(area, buf, &mut self.state);
        } else {
            widget.render(area, buf, &mut self.state);
        }
    }
}

impl Widget for &mut PathTreeView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        PathTreeView::render(self, area, buf);
    }
}

fn apply_selection(state: &mut TreeViewState<usize>, display: &DisplayTree, selection: &SelectionSet) {
    let tree = display.tree();
    let ids = selection.iter().filter_map(|id| tree.index_of(id));
    let _ = state.set_selection(display, ids);
    state.invalidate();
}
