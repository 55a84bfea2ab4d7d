//! folio-tui: terminal rendition of the folio portfolio site.
//!
//! The main thread renders and handles input only. Store mutations, the
//! comment subscription and the repository fetch run on a tokio runtime
//! and report back as actions over a channel the loop drains each tick.

use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

mod actions;
mod config;
mod effects;
mod keymap;
mod logger;
mod promotion;
mod reducer;
mod state;
mod theme;
mod views;

use config::{AppConfig, BackendConfig};
use effects::Effects;
use folio_github::{OctocrabRepoSource, RepoSource};
use folio_store::{DocumentStore, MemoryStore, RestStore};
use state::AppState;

fn main() -> anyhow::Result<()> {
    let log_file = logger::init()?;

    log::info!("Starting folio-tui (log: {})", log_file.display());

    let app_config = AppConfig::load();
    let runtime = tokio::runtime::Runtime::new()?;

    let store: Arc<dyn DocumentStore> = match &app_config.backend {
        BackendConfig::Memory => {
            log::info!("Using in-memory comment store");
            Arc::new(MemoryStore::new())
        }
        BackendConfig::Rest {
            base_url,
            collection,
        } => {
            log::info!("Using remote comment store at {base_url}");
            Arc::new(RestStore::new(base_url.clone(), collection.clone()))
        }
    };
    let repos: Arc<dyn RepoSource> = Arc::new(OctocrabRepoSource::public()?);

    let (tx, rx) = std::sync::mpsc::channel();
    let effects = Effects::new(store, repos, runtime.handle().clone(), tx);
    effects.spawn_subscription();

    let mut app_state = AppState::new(&app_config);
    if app_state.page == folio_nav::Page::Repositories && app_state.repos.is_idle() {
        app_state.repos = state::RepoListState::Loading;
        effects.load_repositories(app_state.github_user.clone());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app_state, &rx, &effects);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        eprintln!("Error: {}", err);
    }

    log::info!("Exiting folio-tui");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    rx: &Receiver<actions::Action>,
    effects: &Effects,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            views::render(state, area, frame);
        })?;

        if !state.running {
            break;
        }

        // Apply everything asynchronous work reported since the last tick.
        loop {
            match rx.try_recv() {
                Ok(action) => reducer::reduce(state, action),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("action channel disconnected");
                    state.running = false;
                    break;
                }
            }
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    keymap::handle_key(state, key, effects);
                }
            }
        }
    }

    Ok(())
}
