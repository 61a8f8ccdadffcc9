use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Scroll behavior when the cursor row changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TreeScrollPolicy {
    #[default]
    KeepInView,
    CenterOnCursor,
}

/// Visual settings of the path tree widget.
#[derive(Clone, Debug)]
pub struct PathTreeStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    /// Row under the cursor.
    pub cursor_style: Style,
    /// Rows in the selection.
    pub selected_style: Style,
    /// Labels matching the search text.
    pub match_style: Style,
    /// Disabled rows (the root).
    pub disabled_style: Style,
    pub line_style: Style,
    pub cursor_symbol: &'a str,
    pub borders: Borders,
    pub scroll_policy: TreeScrollPolicy,
}

impl Default for PathTreeStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            match_style: Style::default().add_modifier(Modifier::UNDERLINED),
            disabled_style: Style::default().add_modifier(Modifier::DIM),
            line_style: Style::default(),
            cursor_symbol: ">> ",
            borders: Borders::ALL,
            scroll_policy: TreeScrollPolicy::KeepInView,
        }
    }
}
