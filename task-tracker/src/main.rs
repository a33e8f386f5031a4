use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use task_tracker_sdk::{JsonFileStore, MemoryStore, SqliteStore, StateStore, TaskRepository};

mod app;
mod ui;

use app::App;
use ui::ui;

#[derive(Debug, Parser)]
#[command(
    name = "task-tracker",
    about = "Hierarchical trader task checklist with dependency trees"
)]
struct Args {
    /// Path to the task dataset (a JSON array of task records)
    #[arg(long, default_value = "data/tasks.json")]
    data: PathBuf,

    /// Persistence backend for checked/expanded state
    #[arg(long, value_enum, default_value = "json")]
    store: StoreKind,

    /// Directory for persisted state and logs
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Prefix for the per-tab state namespaces
    #[arg(long, default_value = "tasks")]
    namespace: String,

    /// Trader tab to open at startup
    #[arg(long)]
    trader: Option<String>,

    /// Allow selecting multiple tasks at once
    #[arg(long)]
    multi: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    /// JSON file in the state directory
    Json,
    /// SQLite database in the state directory
    Sqlite,
    /// In-memory only, nothing persists past this session
    None,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let state_dir = args.state_dir.clone().unwrap_or_else(default_state_dir);
    init_tracing(&state_dir);

    let repo = TaskRepository::load(&args.data)?;
    tracing::info!(tasks = repo.tasks().len(), "task tracker starting");

    let make_store = store_factory(args.store, &state_dir);
    let mut app = App::new(
        repo,
        &args.namespace,
        args.multi,
        args.trader.as_deref(),
        make_store,
    );
    // Reopen where the last session left off unless a trader was requested
    if args.trader.is_none() {
        app.restore_session();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let res = run_app(&mut terminal, &mut app);

    app.save_session();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn default_state_dir() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("", "", "task-tracker") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

/// Log to a file under the state dir; stdout belongs to the TUI.
fn init_tracing(state_dir: &Path) {
    let _ = std::fs::create_dir_all(state_dir);
    let log_path = state_dir.join("task-tracker.log");
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .try_init();
    }
}

/// One store handle per tab, all pointing at the same backend.
fn store_factory(kind: StoreKind, state_dir: &Path) -> Box<dyn Fn() -> Box<dyn StateStore>> {
    match kind {
        StoreKind::Json => {
            let path = state_dir.join("state.json");
            Box::new(move || -> Box<dyn StateStore> { Box::new(JsonFileStore::new(path.clone())) })
        }
        StoreKind::Sqlite => {
            let path = state_dir.join("state.db");
            Box::new(move || -> Box<dyn StateStore> {
                match SqliteStore::open(&path) {
                    Ok(store) => Box::new(store),
                    Err(err) => {
                        tracing::warn!(%err, "sqlite store unavailable, falling back to in-memory");
                        Box::new(MemoryStore::new())
                    }
                }
            })
        }
        StoreKind::None => {
            let store = MemoryStore::new();
            Box::new(move || -> Box<dyn StateStore> { Box::new(store.clone()) })
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Search overlay mode
                    if app.show_search {
                        match key.code {
                            KeyCode::Down => app.search_next(),
                            KeyCode::Up => app.search_previous(),
                            KeyCode::Enter => {
                                app.confirm_search();
                                app.update_scroll(30); // Estimate viewport height
                            }
                            KeyCode::Esc => app.close_search(),
                            KeyCode::Char(c) => {
                                app.search_input.push(c);
                                app.update_search_matches();
                            }
                            KeyCode::Backspace => {
                                app.search_input.pop();
                                app.update_search_matches();
                            }
                            _ => {}
                        }
                    } else {
                        // Normal navigation mode
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => {
                                app.should_quit = true;
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                app.next_row();
                                app.update_scroll(30); // Estimate viewport height
                            }
                            KeyCode::Up | KeyCode::Char('k') => {
                                app.previous_row();
                                app.update_scroll(30);
                            }
                            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                                app.next_tab();
                            }
                            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                                app.previous_tab();
                            }
                            KeyCode::Enter => {
                                app.toggle_expand_at_cursor();
                                app.update_scroll(30);
                            }
                            KeyCode::Char(' ') => {
                                app.toggle_check_at_cursor();
                            }
                            KeyCode::Char('a') => {
                                app.expand_all_current();
                                app.update_scroll(30);
                            }
                            KeyCode::Char('z') => {
                                app.collapse_all_current();
                                app.update_scroll(30);
                            }
                            KeyCode::Char('s') => {
                                app.toggle_select_at_cursor();
                            }
                            KeyCode::Char('c') => {
                                app.clear_selection_current();
                            }
                            KeyCode::Char('/') => {
                                app.open_search();
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
