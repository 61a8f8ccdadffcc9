use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Table,
};

use crate::context::TreeRowContext;
use crate::display::{DisplayTree, LabelSearch};
use crate::glyphs::{TreeGlyphs, TreeLabelParts, tree_label_line};
use crate::icons::IconCatalog;
use crate::model::{NoFilter, TreeFilter, TreeFilterConfig, TreeModel};
use crate::state::TreeViewState;
use crate::style::PathTreeStyle;

/// Tree widget over a [`DisplayTree`] (table + stateful).
pub struct PathTreeWidget<'a, F = NoFilter>
where
    F: TreeFilter<DisplayTree>,
{
    model: &'a DisplayTree,
    icons: &'a IconCatalog,
    style: PathTreeStyle<'a>,
    glyphs: TreeGlyphs<'a>,
    filter: F,
    filter_config: TreeFilterConfig,
    search: Option<&'a LabelSearch>,
}

impl<'a> PathTreeWidget<'a, NoFilter> {
    pub const fn new(model: &'a DisplayTree, icons: &'a IconCatalog, style: PathTreeStyle<'a>) -> Self {
        Self {
            model,
            icons,
            style,
            glyphs: TreeGlyphs::unicode(),
            filter: NoFilter,
            filter_config: TreeFilterConfig::disabled(),
            search: None,
        }
    }
}

impl<'a, F> PathTreeWidget<'a, F>
where
    F: TreeFilter<DisplayTree>,
{
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Styles labels matching `search` with the match style.
    pub const fn highlight(mut self, search: &'a LabelSearch) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_filter<G>(self, filter: G, filter_config: TreeFilterConfig) -> PathTreeWidget<'a, G>
    where
        G: TreeFilter<DisplayTree>,
    {
        PathTreeWidget {
            model: self.model,
            icons: self.icons,
            style: self.style,
            glyphs: self.glyphs,
            filter,
            filter_config,
            search: self.search,
        }
    }

    fn build_rows(&self, state: &TreeViewState<usize>) -> Vec<Row<'a>> {
        let tree = self.model.tree();
        let mut rows = Vec::with_capacity(state.visible_len());
        for visible in state.visible_rows() {
            let Some(node) = tree.node(visible.id) else {
                continue;
            };
            let is_selected = state.is_selected(visible.id);
            let is_match = self
                .search
                .is_some_and(|search| search.is_active() && search.matches_label(&node.label));
            let ctx = TreeRowContext {
                level: visible.level,
                is_tail_stack: visible.is_tail_stack.as_slice(),
                is_expanded: state.is_expanded(visible.parent, visible.id),
                has_children: visible.has_children,
                is_selected,
                is_selectable: self.model.is_selectable(visible.id),
                is_match,
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
            };

            let mut name_style = if node.disabled {
                self.style.disabled_style
            } else {
                ratatui::style::Style::default()
            };
            if ctx.is_match {
                name_style = name_style.patch(self.style.match_style);
            }
            let parts = TreeLabelParts {
                name: node.label.as_str(),
                icon: self.icons.icon(tree.icon_key(visible.id)),
                name_style,
            };

            let mut row = Row::new([tree_label_line(&ctx, parts, &self.glyphs)]);
            if is_selected {
                row = row.style(self.style.selected_style);
            }
            rows.push(row);
        }
        rows
    }

    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        state: &TreeViewState<usize>,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = state
            .table_state()
            .offset()
            .min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl<F> StatefulWidget for PathTreeWidget<'_, F>
where
    F: TreeFilter<DisplayTree>,
{
    type State = TreeViewState<usize>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if self.filter_config.enabled {
            state.ensure_visible_nodes_filtered(self.model, &self.filter, self.filter_config);
        } else {
            state.ensure_visible_nodes(self.model);
        }

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height as usize;
        state.ensure_cursor_visible_with_policy(inner_height, self.style.scroll_policy);

        let scroll_rows = state.visible_len().saturating_sub(inner_height);
        let rows = self.build_rows(state);

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 && area.width > 1 {
            let table_area = Rect {
                width: area.width - 1,
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width - 1,
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        let table = Table::new(rows, [Constraint::Fill(1)])
            .style(self.style.block_style)
            .block(table_block)
            .row_highlight_style(self.style.cursor_style)
            .highlight_symbol(self.style.cursor_symbol);
        table.render(table_area, buf, state.table_state_mut());

        if let Some(scrollbar_area) = scrollbar_area {
            Self::render_scrollbar(scrollbar_area, buf, state, inner_height, scroll_rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayOrder;
    use crate::path::PathTreeConfig;

    fn display(count: usize) -> DisplayTree {
        let entries: Vec<(String, String)> = (0..count)
            .map(|idx| (format!("dir/node-{idx:02}"), "file".to_string()))
            .collect();
        let tree = PathTreeConfig {
            expand: true,
            ..PathTreeConfig::default()
        }
        .build(entries)
        .unwrap();
        DisplayTree::new(tree, DisplayOrder::Insertion)
    }

    fn icons() -> IconCatalog {
        IconCatalog::resolve([("root", "R"), ("branch", "D"), ("default", "F")], [])
    }

    fn screen(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn seeded_state(model: &DisplayTree) -> TreeViewState<usize> {
        let mut state = TreeViewState::new();
        state.expand_where(model, |id| model.node(id).is_some_and(|node| node.expanded));
        state
    }

    #[test]
    fn render_smoke_with_scrollbar() {
        let model = display(12);
        let icons = icons();
        let widget = PathTreeWidget::new(&model, &icons, PathTreeStyle::default());
        let mut state = seeded_state(&model);

        let area = Rect::new(0, 0, 24, 6);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        assert_eq!(state.visible_len(), 14);
    }

    #[test]
    fn renders_icons_and_selection_markers() {
        let model = display(2);
        let icons = icons();
        let mut state = seeded_state(&model);
        let leaf = model.tree().index_of("dir/node-01").unwrap();
        assert!(state.toggle_selected(&model, leaf));

        let widget = PathTreeWidget::new(&model, &icons, PathTreeStyle::default())
            .glyphs(TreeGlyphs::ascii());
        let area = Rect::new(0, 0, 40, 6);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        let text = screen(&buffer);
        assert!(text.contains("R root"));
        assert!(text.contains("v D dir"));
        assert!(text.contains("[ ] F node-00"));
        assert!(text.contains("[x] F node-01"));
    }

    #[test]
    fn filtered_render_hides_non_matches() {
        let model = display(3);
        let icons = icons();
        let search = LabelSearch::new("node-02");
        let mut state = seeded_state(&model);

        let widget = PathTreeWidget::new(&model, &icons, PathTreeStyle::default())
            .highlight(&search)
            .with_filter(search.clone(), TreeFilterConfig::enabled());
        let area = Rect::new(0, 0, 40, 8);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer, &mut state);

        assert_eq!(state.visible_len(), 3);
        let text = screen(&buffer);
        assert!(text.contains("node-02"));
        assert!(!text.contains("node-00"));
    }
}
