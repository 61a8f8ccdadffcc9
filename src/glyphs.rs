use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::context::TreeRowContext;

#[derive(Clone, Copy, Debug)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    pub selected: &'a str,
    pub unselected: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
            selected: "◉",
            unselected: "○",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
            selected: "[x]",
            unselected: "[ ]",
        }
    }
}

/// Text pieces of one row label.
#[derive(Clone, Debug)]
pub struct TreeLabelParts<'a> {
    pub name: &'a str,
    /// Icon drawn before the name; skipped when empty.
    pub icon: &'a str,
    pub name_style: Style,
}

/// Builds the label line: guides, expander, selection marker, icon, name.
pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    parts: TreeLabelParts<'a>,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let mut spans = Vec::with_capacity(9);

    // One span for the whole prefix keeps deep rows cheap.
    if ctx.draw_lines && ctx.level > 0 {
        let current = ctx.is_tail_stack.len().saturating_sub(1);
        let mut guides = String::with_capacity(ctx.is_tail_stack.len() * glyphs.vert.len());
        for (depth, &is_last) in ctx.is_tail_stack.iter().enumerate() {
            guides.push_str(match (depth == current, is_last) {
                (true, true) => glyphs.branch_last,
                (true, false) => glyphs.branch,
                (false, true) => glyphs.indent,
                (false, false) => glyphs.vert,
            });
        }
        spans.push(Span::styled(guides, ctx.line_style));
    } else if ctx.level > 0 {
        spans.push(Span::raw(glyphs.empty.repeat(usize::from(ctx.level))));
    }

    let expander = if ctx.has_children {
        if ctx.is_expanded {
            glyphs.expanded
        } else {
            glyphs.collapsed
        }
    } else if ctx.level == 0 {
        ""
    } else {
        glyphs.leaf
    };
    if !expander.is_empty() {
        spans.push(Span::raw(expander));
        spans.push(Span::raw(" "));
    }

    if ctx.is_selectable {
        let marker = if ctx.is_selected {
            glyphs.selected
        } else {
            glyphs.unselected
        };
        spans.push(Span::raw(marker));
        spans.push(Span::raw(" "));
    }

    if !parts.icon.is_empty() {
        spans.push(Span::raw(parts.icon));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(parts.name, parts.name_style));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(tail: &[bool]) -> TreeRowContext<'_> {
        TreeRowContext {
            level: u16::try_from(tail.len()).unwrap(),
            is_tail_stack: tail,
            is_expanded: false,
            has_children: false,
            is_selected: false,
            is_selectable: true,
            is_match: false,
            draw_lines: true,
            line_style: Style::default(),
        }
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn parts<'a>(name: &'a str, icon: &'a str) -> TreeLabelParts<'a> {
        TreeLabelParts {
            name,
            icon,
            name_style: Style::default(),
        }
    }

    #[test]
    fn selected_leaf_with_guides() {
        let tail = [false, true];
        let mut ctx = ctx(&tail);
        ctx.is_selected = true;

        let line = tree_label_line(&ctx, parts("b", "F"), &TreeGlyphs::ascii());

        assert_eq!(text(&line), "|  `--* [x] F b");
    }

    #[test]
    fn root_row_has_no_expander_or_marker() {
        let mut ctx = ctx(&[]);
        ctx.is_selectable = false;

        let line = tree_label_line(&ctx, parts("root", ""), &TreeGlyphs::ascii());

        assert_eq!(text(&line), "root");
    }

    #[test]
    fn collapsed_branch_without_guides() {
        let tail = [true];
        let mut ctx = ctx(&tail);
        ctx.draw_lines = false;
        ctx.has_children = true;
        ctx.is_selectable = false;

        let line = tree_label_line(&ctx, parts("a", "D"), &TreeGlyphs::ascii());

        assert_eq!(text(&line), "   > D a");
    }
}
