// Minimal example: build a tree from a few paths and render it into a buffer.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

use tui_pathtree::{PathTreeProps, PathTreeResult, PathTreeView, SelectionSet};

fn main() -> PathTreeResult<()> {
    // Host-side properties, as an application would store them.
    let props = PathTreeProps {
        expand: true,
        ..PathTreeProps::default()
    }
    .with_path("data/2023/run_a", "hist")
    .with_path("data/2023/run_b", "hist")
    .with_path("data/2024/run_c", "hist")
    .with_path("notes", "text")
    .with_icon("hist", "▦");

    let mut view = PathTreeView::new(&props)?;

    // The host pushes a selection; the view follows.
    let selected: SelectionSet = ["data/2023/run_b", "notes"].into_iter().collect();
    let _ = view.host_selection_changed(&selected);

    // Render into an in-memory buffer (no terminal required for the example).
    let area = Rect::new(0, 0, 48, 10);
    let mut buffer = Buffer::empty(area);
    (&mut view).render(area, &mut buffer);

    for y in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        println!("{}", line.trim_end());
    }
    Ok(())
}
