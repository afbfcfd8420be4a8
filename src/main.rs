//! vellum: a terminal documentation browser.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use vellum::app_state::{AppState, Focus};
use vellum::event::AppEvent;
use vellum::formats::markdown::MarkdownFormat;
use vellum::location::Location;
use vellum::render::CodeHighlighter;
use vellum::storage::LocalStorage;
use vellum::store::ContentStore;
use vellum::{config, input, logging, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PAGE: isize = 20;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(about = "Terminal documentation browser with in-page search", long_about = None)]
struct Args {
    /// Template files or directories (defaults to the configured content directory)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Section to open first, as `#id`
    #[arg(long, short = 'l', value_name = "LOCATION")]
    location: Option<String>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Write logs here instead of the data directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }

    let log_path = args.log_file.or_else(logging::default_log_path);
    logging::init(log_path.as_deref());

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(&cfg.content_dir)]
    } else {
        args.paths
    };
    let documents = input::find_documents(paths, &cfg.file_extensions)?;

    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    let store = match ContentStore::load(&documents, &MarkdownFormat) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(());
        }
    };

    let storage =
        LocalStorage::default_path().map_or_else(LocalStorage::in_memory, LocalStorage::open);
    let mut state = AppState::new(store, cfg, storage);

    let location = args
        .location
        .as_deref()
        .map(Location::parse)
        .unwrap_or_default();
    if let Err(e) = state.start(&location) {
        eprintln!("Error: {e}");
        return Ok(());
    }

    run_tui(state)
}

fn run_tui(mut app: AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let code = CodeHighlighter::new();
    let result = run_app(&mut terminal, &mut app, &code);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    code: &CodeHighlighter,
) -> io::Result<()> {
    app.dispatch(AppEvent::Resized(terminal.size()?.width));

    loop {
        app.dispatch(AppEvent::Tick(Instant::now()));
        terminal.draw(|f| ui::draw(f, app, code))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(app, key) {
                    return Ok(());
                }
            }
            Event::Resize(width, _) => app.dispatch(AppEvent::Resized(width)),
            _ => {}
        }
    }
}

/// Routes a keystroke by focus. Returns `false` when the reader quits.
fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.focus {
        Focus::Content => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('/') => {
                if app.config.search {
                    if app.config.sidebar && !app.sidebar_visible() {
                        app.dispatch(AppEvent::SidebarToggled);
                    }
                    app.focus = Focus::Search;
                }
            }
            KeyCode::Char('s') => app.dispatch(AppEvent::SidebarToggled),
            KeyCode::Char('t') => app.dispatch(AppEvent::ThemeToggled),
            KeyCode::Char('y') => app.dispatch(AppEvent::CopyRequested),
            KeyCode::Up | KeyCode::Char('k') => app.dispatch(AppEvent::Scrolled(-1)),
            KeyCode::Down | KeyCode::Char('j') => app.dispatch(AppEvent::Scrolled(1)),
            KeyCode::PageUp => app.dispatch(AppEvent::Scrolled(-PAGE)),
            KeyCode::PageDown | KeyCode::Char(' ') => app.dispatch(AppEvent::Scrolled(PAGE)),
            KeyCode::Home => app.dispatch(AppEvent::Scrolled(isize::MIN)),
            KeyCode::End => app.dispatch(AppEvent::Scrolled(isize::MAX)),
            KeyCode::Left | KeyCode::Backspace => app.dispatch(AppEvent::HistoryBack),
            KeyCode::Right => app.dispatch(AppEvent::HistoryForward),
            KeyCode::Char(':') => {
                app.focus = Focus::Command;
                app.command_buffer.clear();
                app.message = None;
            }
            KeyCode::Tab => app.focus = next_focus(app),
            KeyCode::Esc => app.dispatch(AppEvent::SidebarDismissed),
            _ => {}
        },
        Focus::Search => match key.code {
            KeyCode::Char(c) => {
                let mut input = app.search_input.clone();
                input.push(c);
                app.dispatch(AppEvent::QueryChanged(input));
            }
            KeyCode::Backspace => {
                let mut input = app.search_input.clone();
                input.pop();
                app.dispatch(AppEvent::QueryChanged(input));
            }
            KeyCode::Esc => app.dispatch(AppEvent::SearchCleared),
            KeyCode::Enter => app.dispatch(AppEvent::SearchSubmitted),
            KeyCode::Down => {
                if !app.results.is_empty() {
                    app.focus = Focus::Sidebar;
                }
            }
            KeyCode::Tab => app.focus = next_focus(app),
            _ => {}
        },
        Focus::Sidebar => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('/') => {
                if app.config.search {
                    app.focus = Focus::Search;
                }
            }
            KeyCode::Up => {
                if app.is_search_mode() {
                    app.result_index = app.result_index.saturating_sub(1);
                } else {
                    app.nav_index = app.nav_index.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if app.is_search_mode() {
                    if app.result_index + 1 < app.results.len() {
                        app.result_index += 1;
                    }
                } else if app.nav_index + 1 < app.store.len() {
                    app.nav_index += 1;
                }
            }
            KeyCode::Enter => {
                if app.is_search_mode() {
                    app.dispatch(AppEvent::ResultOpened(app.result_index));
                } else if let Some(section) = app.store.sections().get(app.nav_index) {
                    let id = section.id.clone();
                    app.dispatch(AppEvent::NavigateRequested(id));
                }
            }
            KeyCode::Esc => {
                app.dispatch(AppEvent::SidebarDismissed);
                app.focus = Focus::Content;
            }
            KeyCode::Tab => app.focus = next_focus(app),
            _ => {}
        },
        Focus::Toc => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Up => app.toc_index = app.toc_index.saturating_sub(1),
            KeyCode::Down => {
                if app.toc_index + 1 < app.toc.len() {
                    app.toc_index += 1;
                }
            }
            KeyCode::Enter => app.dispatch(AppEvent::TocSelected(app.toc_index)),
            KeyCode::Esc => app.focus = Focus::Content,
            KeyCode::Tab => app.focus = next_focus(app),
            _ => {}
        },
        Focus::Command => match key.code {
            KeyCode::Char(c) => app.command_buffer.push(c),
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let cmd = std::mem::take(&mut app.command_buffer);
                app.focus = Focus::Content; // Always return to content
                return run_command(app, cmd.trim());
            }
            KeyCode::Esc => {
                app.focus = Focus::Content;
                app.command_buffer.clear();
            }
            _ => {}
        },
    }
    true
}

fn run_command(app: &mut AppState, cmd: &str) -> bool {
    let (name, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
    match name {
        "q" | "quit" => return false,
        "go" => app.dispatch(AppEvent::LocationChanged(Location::parse(arg))),
        "back" => app.dispatch(AppEvent::HistoryBack),
        "forward" => app.dispatch(AppEvent::HistoryForward),
        "theme" => app.dispatch(AppEvent::ThemeToggled),
        "" => {}
        _ => app.flash(format!("Unknown command: {cmd}")),
    }
    true
}

/// Cycles keyboard focus through the panes currently on screen.
fn next_focus(app: &AppState) -> Focus {
    let has_toc = app.config.toc && !app.toc.is_empty();
    let has_sidebar = app.sidebar_visible();
    let has_search = has_sidebar && app.config.search;

    let order = [
        (Focus::Content, true),
        (Focus::Toc, has_toc),
        (Focus::Sidebar, has_sidebar),
        (Focus::Search, has_search),
    ];
    let current = order
        .iter()
        .position(|(focus, _)| *focus == app.focus)
        .unwrap_or(0);
    (1..=order.len())
        .map(|step| order[(current + step) % order.len()])
        .find(|(_, available)| *available)
        .map_or(Focus::Content, |(focus, _)| focus)
}
