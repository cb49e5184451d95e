mod render;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kgar_quote_config::Config;
use kgar_quote_engine::{
    ControllerState, EditorView, FileIndex, MarkdownView, PointerEvent, QuotePreview, Selection,
    UpdateFlags, ViewUpdate, WidgetEvent, io,
};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use render::{Hit, hit_test, render_line};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Files,
    Editor,
}

/// The note on screen, its view and the engine mounted on it.
struct OpenNote {
    path: RelativePathBuf,
    view: MarkdownView,
    preview: QuotePreview,
}

impl OpenNote {
    fn open(path: RelativePathBuf, source: &str, live_preview: bool) -> Self {
        let mut view = MarkdownView::new(source);
        view.set_live_preview(live_preview);
        let preview = QuotePreview::new(&view, Some(&path));
        Self {
            path,
            view,
            preview,
        }
    }

    /// Hands a view change to the engine.
    fn notify(&mut self, flags: UpdateFlags) {
        self.preview.update(&ViewUpdate {
            view: &self.view,
            active_file: Some(&self.path),
            flags,
        });
    }
}

struct App {
    notes_path: PathBuf,
    index: FileIndex,
    files: Vec<RelativePathBuf>,
    file_list_state: ListState,
    focus: Pane,
    live_preview: bool,
    open: Option<OpenNote>,
    status: Option<String>,
    /// Inner area of the editor pane from the last draw.
    editor_area: Rect,
}

impl App {
    fn new(notes_path: PathBuf, live_preview: bool) -> Result<Self> {
        let index = FileIndex::scan(&notes_path)
            .with_context(|| format!("indexing {}", notes_path.display()))?;
        let files = index.iter().map(|(path, _)| path.to_relative_path_buf()).collect();

        let mut app = Self {
            notes_path,
            index,
            files,
            file_list_state: ListState::default(),
            focus: Pane::Files,
            live_preview,
            open: None,
            status: None,
            editor_area: Rect::default(),
        };

        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.open_selected();
        }

        Ok(app)
    }

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.open_selected();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
        self.open_selected();
    }

    fn open_selected(&mut self) {
        let Some(path) = self
            .file_list_state
            .selected()
            .and_then(|i| self.files.get(i))
            .cloned()
        else {
            return;
        };

        match io::read_file(&path, &self.notes_path) {
            Ok(source) => {
                let note = OpenNote::open(path, &source, self.live_preview);
                debug!(
                    "opened {} with {} decorations",
                    note.path,
                    note.preview.decorations().len()
                );
                self.open = Some(note);
                self.status = None;
            }
            Err(e) => {
                self.open = None;
                self.status = Some(format!("Error reading file: {e}"));
            }
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Files => Pane::Editor,
            Pane::Editor => Pane::Files,
        };
    }

    fn toggle_mode(&mut self) {
        self.live_preview = !self.live_preview;
        if let Some(note) = &mut self.open {
            let flags = note.view.set_live_preview(self.live_preview);
            note.notify(flags);
        }
    }

    /// Applies an editing key to the open note.
    fn edit(&mut self, key: KeyCode) {
        let Some(note) = &mut self.open else {
            return;
        };
        let page = note.view.viewport_height() as isize;
        let flags = match key {
            KeyCode::Left => note.view.move_caret(-1),
            KeyCode::Right => note.view.move_caret(1),
            KeyCode::Up => note.view.move_caret_lines(-1),
            KeyCode::Down => note.view.move_caret_lines(1),
            KeyCode::PageUp => note.view.scroll_by(-page),
            KeyCode::PageDown => note.view.scroll_by(page),
            KeyCode::Char('x') => note.view.delete_forward(),
            KeyCode::Backspace => note.view.backspace(),
            _ => UpdateFlags::NONE,
        };
        note.notify(flags);
    }

    /// Keeps the view's viewport in step with the pane size.
    fn fit_viewport(&mut self, area: Rect) {
        self.editor_area = area;
        if let Some(note) = &mut self.open {
            let flags = note.view.set_viewport_height(area.height as usize);
            note.notify(flags);
        }
    }

    fn click(&mut self, mouse: MouseEvent) {
        let area = self.editor_area;
        if mouse.column < area.x
            || mouse.row < area.y
            || mouse.column >= area.x + area.width
            || mouse.row >= area.y + area.height
        {
            return;
        }
        let Some(note) = &mut self.open else {
            return;
        };
        self.focus = Pane::Editor;

        let row = (mouse.row - area.y) as usize;
        let rendered_column = (mouse.column - area.x) as usize;
        let Some(&line) = note.view.visible_lines().get(row) else {
            return;
        };
        let lr = note.view.lines()[line].clone();
        let content = lr.content_span();
        let hit = hit_test(
            &lr.text,
            content,
            note.preview.decorations(),
            rendered_column,
        );

        let flags = match hit {
            Hit::Widget { decoration, column } => {
                let widget = decoration.widget.clone();
                let event = WidgetEvent::PointerDown(PointerEvent {
                    x: column as f32,
                    y: row as f32,
                    shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
                });
                if widget.ignore_event(&event, &mut note.view) {
                    UpdateFlags::NONE
                } else {
                    UpdateFlags {
                        selection_set: true,
                        ..UpdateFlags::NONE
                    }
                }
            }
            Hit::Text { column } => match note.view.pos_at_coords(column as f32, row as f32) {
                Some(pos) => note.view.set_selection(Selection::cursor(pos)),
                None => UpdateFlags::NONE,
            },
        };
        note.notify(flags);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    // Notes path from CLI args, falling back to the config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let live_preview = config.as_ref().is_none_or(|c| c.live_preview);

    let (notes_path, from_config) = match (args.len(), config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.notes_path, true),
        (1, None) => {
            eprintln!("Error: No notes path provided and no config file found");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [notes-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_notes_dir(&notes_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notes path '{}'{} is invalid: {e}",
            notes_path.display(),
            source
        );
        process::exit(1);
    }
    info!("opening vault at {}", notes_path.display());

    let mut app = App::new(notes_path, live_preview)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                app.click(mouse)
            }
            _ => {}
        }
    }
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match (app.focus, key.code) {
        (_, KeyCode::Char('q')) => return true,
        (_, KeyCode::Tab) => app.toggle_focus(),
        (_, KeyCode::Char('m')) => app.toggle_mode(),
        (Pane::Files, KeyCode::Down | KeyCode::Char('j')) => app.next_file(),
        (Pane::Files, KeyCode::Up | KeyCode::Char('k')) => app.previous_file(),
        (Pane::Files, KeyCode::Enter) => app.focus = Pane::Editor,
        (Pane::Editor, code) => app.edit(code),
        _ => {}
    }
    false
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let focused = |pane: Pane| {
        if app.focus == pane {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    // File list panel, kgar notes starred
    let file_items: Vec<ListItem> = app
        .files
        .iter()
        .map(|path| {
            let marker = if app.index.is_kgar(path) { "★ " } else { "  " };
            ListItem::new(Line::from(format!("{marker}{path}")))
        })
        .collect();
    let files_list = List::new(file_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focused(Pane::Files))
                .title(format!("Files ({} kgar)", app.index.kgar_files().count())),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Editor panel
    let editor_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focused(Pane::Editor));
    let inner = editor_block.inner(chunks[1]);
    app.fit_viewport(inner);

    let (title, content) = match &app.open {
        Some(note) => {
            let mode = if note.view.is_live_preview() {
                "live"
            } else {
                "source"
            };
            let state = match note.preview.state() {
                ControllerState::Active => "active",
                ControllerState::Inactive => "inactive",
            };
            let caret = (app.focus == Pane::Editor)
                .then(|| note.view.selection().main_caret())
                .flatten();
            let lines: Vec<Line> = note
                .view
                .visible_lines()
                .into_iter()
                .map(|i| {
                    let lr = &note.view.lines()[i];
                    render_line(&lr.text, lr.content_span(), note.preview.decorations(), caret)
                })
                .collect();
            (format!("{} [{mode}, {state}]", note.path), lines)
        }
        None => (
            "Editor".to_string(),
            vec![Line::from(
                app.status
                    .clone()
                    .unwrap_or_else(|| "Select a file to view its content".to_string()),
            )],
        ),
    };
    f.render_widget(Paragraph::new(content).block(editor_block.title(title)), chunks[1]);

    let help = Line::from(vec![
        Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(": Quit | Tab: Switch pane | m: Live/source | "),
        Span::raw("←↑↓→: Caret | PgUp/PgDn: Scroll | x/Backspace: Delete | Shift-click widget: Edit"),
    ]);
    f.render_widget(Paragraph::new(help), rows[1]);
}
