use chatscope::app::App;
use chatscope::prefs::PrefsStore;
use chatscope::ui;

use color_eyre::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::warn;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tick interval driving transitions and the copy-notice fade.
const TICK_INTERVAL_MS: u64 = 50;

fn main() -> Result<()> {
    // Handle --version flag before any initialization
    if std::env::args().any(|arg| arg == "--version") {
        println!("chatscope {}", VERSION);
        std::process::exit(0);
    }

    color_eyre::install()?;
    setup_panic_hook();
    init_logging();

    let runtime = tokio::runtime::Runtime::new()?;

    // Preferences: a failed store means the session still runs, it just
    // doesn't persist.
    let prefs_store = match PrefsStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("preferences disabled: {e}");
            None
        }
    };
    let prefs = prefs_store
        .as_ref()
        .map(|store| store.load())
        .unwrap_or_default();
    let mut app = App::new(prefs, prefs_store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = runtime.block_on(run_app(&mut terminal, &mut app));

    app.save_prefs();
    restore_terminal(&mut terminal)?;
    result
}

/// Logs go to a file under the config directory; logging to the terminal
/// would corrupt the alternate screen. A missing config dir disables
/// logging silently.
fn init_logging() {
    let Some(dir) = dirs::config_dir().map(|d| d.join("chatscope")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("chatscope.log"))
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
}

/// Setup panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Restore terminal to normal mode
fn restore_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx = app.message_rx.take();

    loop {
        if app.needs_redraw {
            terminal.draw(|f| {
                ui::render(f, &mut *app);
            })?;
            app.needs_redraw = false;
        }

        let timeout = tokio::time::sleep(std::time::Duration::from_millis(TICK_INTERVAL_MS));

        tokio::select! {
            _ = timeout => {
                app.on_tick();
            }

            event_result = event_stream.next() => {
                if let Some(Ok(event)) = event_result {
                    match event {
                        Event::Resize(_, _) => {
                            app.needs_redraw = true;
                        }
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            app.handle_key(key);
                        }
                        _ => {}
                    }
                }
            }

            message = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(message) = message {
                    app.apply_message(message);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
