use ratatui::style::Style;

/// Per-row facts handed to the label renderer.
#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub is_expanded: bool,
    pub has_children: bool,
    pub is_selected: bool,
    pub is_selectable: bool,
    pub is_match: bool,
    pub draw_lines: bool,
    pub line_style: Style,
}
