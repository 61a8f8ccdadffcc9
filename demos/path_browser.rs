// Interactive browser: a directory listing (or a `path<TAB>type` file) shown as a
// path tree, with the selection mirrored into a host property.
use std::cell::RefCell;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing_subscriber::EnvFilter;

use tui_pathtree::{
    ObservableSelection, PathEntries, PathTreeProps, PathTreeStyle, PathTreeView, SelectionHost,
    SelectionSet, TreeAction, TreeEvent,
};

// Logs go to a file so they do not fight with the alternate screen.
fn init_tracing() -> io::Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = fs::File::create("path_browser.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_listing(path: &Path) -> io::Result<PathEntries> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('\t') {
            Some((path, node_type)) => (path.to_string(), node_type.to_string()),
            None => (line.to_string(), "file".to_string()),
        })
        .collect())
}

fn walk_dir(root: &Path, prefix: &str, depth: usize, out: &mut PathEntries) {
    if depth == 0 {
        return;
    }
    let Ok(read_dir) = fs::read_dir(root) else {
        return;
    };
    let mut entries: Vec<_> = read_dir.filter_map(Result::ok).collect();
    entries.sort_by_key(fs::DirEntry::file_name);
    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if entry.file_type().is_ok_and(|kind| kind.is_dir()) {
            walk_dir(&entry.path(), &path, depth - 1, out);
        } else {
            let node_type = entry
                .path()
                .extension()
                .map_or_else(|| "file".to_string(), |ext| ext.to_string_lossy().to_string());
            out.insert(path, node_type);
        }
    }
}

fn style() -> PathTreeStyle<'static> {
    PathTreeStyle {
        block_style: Style::default()
            .fg(Color::Rgb(221, 227, 235))
            .bg(Color::Rgb(24, 28, 36)),
        border_style: Style::default().fg(Color::Rgb(92, 110, 140)),
        line_style: Style::default().fg(Color::Rgb(86, 98, 120)),
        selected_style: Style::default()
            .fg(Color::Rgb(136, 192, 208))
            .add_modifier(Modifier::BOLD),
        match_style: Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(60, 179, 113))
            .add_modifier(Modifier::BOLD),
        cursor_style: Style::default()
            .fg(Color::Rgb(255, 255, 255))
            .bg(Color::Rgb(52, 66, 96))
            .add_modifier(Modifier::BOLD),
        title: Some(Line::from(
            " space select · enter open · / search · a/n all/none · x host clear · q quit ",
        )),
        ..PathTreeStyle::default()
    }
}

struct App {
    view: Rc<RefCell<PathTreeView>>,
    host: Rc<ObservableSelection>,
    // Last value the host saw, as the host's own listener recorded it.
    host_echo: Rc<RefCell<SelectionSet>>,
    searching: bool,
    query: String,
}

impl App {
    fn render(&mut self, frame: &mut Frame) {
        let [tree_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(&mut *self.view.borrow_mut(), tree_area);

        let status = if self.searching {
            format!("search: {}_", self.query)
        } else {
            let host = self.host_echo.borrow();
            format!(
                "host selected ({}): {}",
                host.len(),
                host.iter().collect::<Vec<_>>().join(", ")
            )
        };
        frame.render_widget(Paragraph::new(status), status_area);
    }

    fn on_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                self.query.pop();
                self.view.borrow_mut().set_search(self.query.clone());
            }
            KeyCode::Char(ch) => {
                self.query.push(ch);
                self.view.borrow_mut().set_search(self.query.clone());
            }
            _ => {}
        }
    }

    fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            if !event::poll(Duration::from_millis(200))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if self.searching {
                self.on_search_key(key.code);
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                // A write from the host side; the view follows through its listener.
                KeyCode::Char('x') => {
                    self.host.set_selected(SelectionSet::new());
                    continue;
                }
                _ => {}
            }
            let event = self.view.borrow_mut().handle_key(key, self.host.as_ref());
            if event == TreeEvent::Action(TreeAction::FocusSearch) {
                self.searching = true;
            }
        }
        Ok(())
    }
}

fn main() -> io::Result<()> {
    init_tracing()?;

    let mut paths = PathEntries::new();
    match env::args().nth(1) {
        Some(arg) if Path::new(&arg).is_file() => paths = load_listing(Path::new(&arg))?,
        Some(arg) => walk_dir(Path::new(&arg), "", 3, &mut paths),
        None => walk_dir(&env::current_dir()?, "", 3, &mut paths),
    }

    let props = PathTreeProps {
        root: "listing".to_string(),
        paths,
        ..PathTreeProps::default()
    }
    .with_icon("rs", "🦀");
    let mut view = PathTreeView::new(&props)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    view.set_style(style());

    let view = Rc::new(RefCell::new(view));
    let host = Rc::new(ObservableSelection::new(props.selected.clone()));
    PathTreeView::follow(&view, &host);
    let host_echo = Rc::new(RefCell::new(host.selected()));
    let sink = Rc::clone(&host_echo);
    host.subscribe(move |selection| {
        sink.replace(selection.clone());
    });

    let app = App {
        view,
        host,
        host_echo,
        searching: false,
        query: String::new(),
    };

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
