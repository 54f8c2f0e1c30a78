// Terminal video search: interactive screen plus one-shot subcommands
use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use vidsearch::{
    app::{App, CardTarget, InputMode},
    blocklist,
    config::{load, BlockAction, Command, Config, HistoryAction},
    history, links,
    search::{SearchOutcome, Searcher},
    store::{KvStore, SqliteStore},
    types::AppEvent,
    ui,
    youtube::YouTubeClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let (cfg, command) = load().context("Failed to load configuration")?;

    match command {
        Command::Tui => {
            init_file_logger(&cfg.log_file)?;
            run_tui(cfg).await
        }
        other => {
            init_stderr_logger();
            run_command(cfg, other).await
        }
    }
}

fn init_stderr_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// The alternate screen owns stdout/stderr while the TUI runs
fn init_file_logger(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn open_store(cfg: &Config) -> Result<Arc<dyn KvStore>> {
    let store = SqliteStore::open(&cfg.db_path)
        .with_context(|| format!("Failed to open store at {}", cfg.db_path))?;
    Ok(Arc::new(store))
}

fn build_searcher(cfg: &Config, store: Arc<dyn KvStore>) -> Result<Searcher> {
    let api_key = cfg.require_api_key()?;
    let client = YouTubeClient::new(&cfg.api_url, api_key, cfg.request_timeout_ms)?;
    Ok(Searcher::new(store, Arc::new(client)))
}

// ----- one-shot subcommands -----

async fn run_command(cfg: Config, command: Command) -> Result<()> {
    log::debug!("[main] {}", cfg.summary());
    let store = open_store(&cfg)?;

    match command {
        Command::Tui => return Err(anyhow!("the interactive screen is not a one-shot command")),
        Command::Search { query } => {
            let searcher = build_searcher(&cfg, store)?;
            let query = query.join(" ");
            match searcher.run(&query).await {
                SearchOutcome::Skipped => eprintln!("Nothing to search for"),
                SearchOutcome::Blocked { .. } => {
                    eprintln!("Blocked Search: This search contains a blocked keyword.");
                }
                SearchOutcome::Completed { videos } if videos.is_empty() => {
                    println!("No videos found");
                }
                SearchOutcome::Completed { videos } => {
                    for (i, video) in videos.iter().enumerate() {
                        println!("{}. {}", i + 1, video.title);
                        if let Some(thumb) = &video.thumbnail {
                            println!("   thumbnail: {thumb}");
                        }
                        println!("   watch:     {}", video.link);
                    }
                }
                SearchOutcome::Failed { error } => {
                    return Err(anyhow!("Video search error: {error}"));
                }
            }
        }
        Command::Block { action } => match action {
            BlockAction::Add { term } => {
                if blocklist::add_term(store.as_ref(), &term).await? {
                    println!("Blocked {:?}", term.trim().to_lowercase());
                } else {
                    println!("{:?} is already blocked", term.trim().to_lowercase());
                }
            }
            BlockAction::Remove { term } => {
                if blocklist::remove_term(store.as_ref(), &term).await? {
                    println!("Unblocked {:?}", term.trim().to_lowercase());
                } else {
                    println!("{:?} was not blocked", term.trim().to_lowercase());
                }
            }
            BlockAction::List => {
                let terms = blocklist::load(store.as_ref())
                    .await
                    .context("Failed to read blocklist")?;
                if terms.is_empty() {
                    println!("No blocked terms");
                }
                for term in terms {
                    println!("{term}");
                }
            }
        },
        Command::History { action } => match action {
            HistoryAction::List => {
                let entries = history::load(store.as_ref())
                    .await
                    .context("Failed to read search history")?;
                if entries.is_empty() {
                    println!("No recent searches");
                }
                for (i, entry) in entries.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, entry.term);
                }
            }
            HistoryAction::Clear => {
                history::clear(store.as_ref())
                    .await
                    .context("Failed to clear search history")?;
                println!("Search history cleared");
            }
        },
    }
    Ok(())
}

// ----- interactive screen -----

async fn run_tui(cfg: Config) -> Result<()> {
    let store = open_store(&cfg)?;
    let searcher = build_searcher(&cfg, store)?;
    log::info!("[main] starting TUI {}", cfg.summary());

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(cfg.render_fps, cfg.theme.colors());

    // main loop
    let result = run_loop(&mut app, &mut terminal, rx, tx, &searcher).await;

    // cleanup runs whether or not the loop failed, and whatever the mouse state was
    restore_terminal(terminal.backend_mut())?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    result
}

/// Release mouse capture and leave the alternate screen.
/// Disabling capture that was never enabled is harmless.
fn restore_terminal<W: io::Write>(out: &mut W) -> io::Result<()> {
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
    searcher: &Searcher,
) -> Result<()> {
    let mut last_frame = Instant::now();
    let mut mouse_enabled = false;

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or search events
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) => {
                    if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                        // Check for mouse toggle before other handling
                        if let (KeyCode::Char('t'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
                            mouse_enabled = !mouse_enabled;
                            if mouse_enabled {
                                execute!(terminal.backend_mut(), EnableMouseCapture)?;
                                app.show_toast("Mouse enabled (Ctrl+T to disable)".to_string());
                            } else {
                                execute!(terminal.backend_mut(), DisableMouseCapture)?;
                                app.show_toast("Mouse disabled".to_string());
                            }
                        } else {
                            handle_key(app, k, &tx, searcher);
                        }
                    }
                }
                Event::Mouse(m) => {
                    if mouse_enabled {
                        handle_mouse(app, m);
                    }
                }
                _ => {}
            }
        }

        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }

        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

/// Hand the submitted query to a search task; the result comes back as an event
fn spawn_search(app: &mut App, tx: &UnboundedSender<AppEvent>, searcher: &Searcher) {
    let Some((seq, query)) = app.submit() else {
        return;
    };
    let searcher = searcher.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = searcher.run(&query).await;
        let _ = tx.send(AppEvent::SearchFinished { seq, outcome });
    });
}

fn spawn_history_load(tx: &UnboundedSender<AppEvent>, searcher: &Searcher) {
    let store = Arc::clone(searcher.store());
    let tx = tx.clone();
    tokio::spawn(async move {
        let entries = history::load(store.as_ref()).await.unwrap_or_else(|e| {
            log::warn!("[history] failed to load: {e}");
            Vec::new()
        });
        let _ = tx.send(AppEvent::HistoryLoaded(entries));
    });
}

fn open_card(app: &mut App, index: usize, target: CardTarget) {
    let Some(link) = app.link_for(index).map(str::to_string) else {
        return;
    };
    app.select(index);
    match links::open_link(&link) {
        Ok(()) => app.log_debug(format!("open {target:?} #{index}")),
        Err(e) => {
            log::warn!("[links] {e}");
            app.show_error("Could not open link".to_string());
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((index, target)) = app.hit_test(mouse.column, mouse.row) {
                open_card(app, index, target);
            }
        }
        MouseEventKind::ScrollUp => app.scroll_by(-1),
        MouseEventKind::ScrollDown => app.scroll_by(1),
        _ => {}
    }
}

fn handle_key(app: &mut App, k: KeyEvent, tx: &UnboundedSender<AppEvent>, searcher: &Searcher) {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && k.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.input_mode() {
        InputMode::BlockedDialog => {
            if matches!(k.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_dialog();
            }
        }
        InputMode::History => match k.code {
            KeyCode::Up | KeyCode::Char('k') => app.history_up(),
            KeyCode::Down | KeyCode::Char('j') => app.history_down(),
            KeyCode::Enter => {
                if app.use_selected_history() {
                    spawn_search(app, tx, searcher);
                }
            }
            KeyCode::Esc => app.close_history(),
            _ => {}
        },
        InputMode::Editing => match (k.code, ctrl) {
            (KeyCode::Char('h'), true) => spawn_history_load(tx, searcher),
            (KeyCode::Char('d'), true) => app.toggle_debug_panel(),
            (KeyCode::Char('u'), true) => app.clear_query(),
            (KeyCode::Char(c), false) => app.query_add_char(c),
            (KeyCode::Backspace, _) => app.query_backspace(),
            (KeyCode::Enter, _) => spawn_search(app, tx, searcher),
            (KeyCode::Esc, _) | (KeyCode::Down, _) | (KeyCode::Tab, _) => app.browse(),
            _ => {}
        },
        InputMode::Browse => match (k.code, ctrl) {
            (KeyCode::Char('h'), true) => spawn_history_load(tx, searcher),
            (KeyCode::Char('d'), true) => app.toggle_debug_panel(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), false) => app.up(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), false) => app.down(),
            (KeyCode::Home, _) => app.home(),
            (KeyCode::End, _) => app.end(),
            (KeyCode::PageUp, _) => app.scroll_by(-3),
            (KeyCode::PageDown, _) => app.scroll_by(3),
            (KeyCode::Enter, _) | (KeyCode::Char('w'), false) => {
                let index = app.selected();
                open_card(app, index, CardTarget::Watch);
            }
            (KeyCode::Char('t'), false) => {
                let has_thumb = app
                    .selected_video()
                    .is_some_and(|v| v.thumbnail.is_some());
                if has_thumb {
                    let index = app.selected();
                    open_card(app, index, CardTarget::Thumbnail);
                }
            }
            (KeyCode::Char('y'), false) => {
                if let Some(link) = app.selected_video().map(|v| v.link.clone()) {
                    if links::copy_to_clipboard(&link) {
                        app.show_toast("Copied link".to_string());
                    } else {
                        app.show_error("Clipboard unavailable".to_string());
                    }
                }
            }
            (KeyCode::Char('/'), false)
            | (KeyCode::Char('i'), false)
            | (KeyCode::Tab, _)
            | (KeyCode::Esc, _) => app.focus_input(),
            (KeyCode::Char('q'), false) => app.quit(),
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_releases_mouse_and_alternate_screen() {
        let mut out: Vec<u8> = Vec::new();
        restore_terminal(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1000l"), "mouse capture not released: {written:?}");
        assert!(written.contains("\x1b[?1049l"), "alternate screen not left: {written:?}");
    }
}
