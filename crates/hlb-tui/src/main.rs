//! HLB TUI - a terminal client for the HLB journaling service.
//!
//! Run without arguments for the interactive client. `--login`, `--logout`
//! and `--whoami` manage the stored session without entering the TUI. An
//! optional path argument (e.g. `hlb /herds`) picks the starting view.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hlb_core::api::ApiClient;
use hlb_core::auth::{AuthStatus, SessionStore, TokenStore};
use hlb_core::config::Config;
use hlb_core::notify::{Notice, Notifier};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::{render, render_splash};

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "hlb.log";

/// Initialize the tracing subscriber for logging.
///
/// The TUI owns the terminal, so logs go to a daily file in the cache
/// directory. The returned guard flushes the writer on drop.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Ok(dir) = config.cache_dir() else {
        // No cache dir; stay silent rather than scribble over the TUI
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::sink))
            .with(filter)
            .init();
        return None;
    };

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let _log_guard = init_tracing(&config);
    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);
    match command {
        Some("--login") => return cli_login(config).await,
        Some("--logout") => return cli_logout(config).await,
        Some("--whoami") => return cli_whoami(config).await,
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let start_path = match command {
        Some(path) if path.starts_with('/') => path.to_string(),
        Some(other) => {
            eprintln!("Unknown argument: {}\n", other);
            print_usage();
            return Ok(());
        }
        None => "/".to_string(),
    };

    info!(%start_path, "HLB TUI starting");

    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(config, &start_path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Splash while the stored session is checked
    terminal.draw(render_splash)?;
    app.initialize().await;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("HLB TUI shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

fn print_usage() {
    println!("Usage: hlb [PATH | --login | --logout | --whoami]");
    println!();
    println!("  PATH        start on a view, e.g. /herds or /profile");
    println!("  --login     log in from the command line");
    println!("  --logout    forget the stored session");
    println!("  --whoami    show the logged-in user");
}

// ============================================================================
// Non-interactive commands
// ============================================================================

type CliStore = SessionStore<ApiClient, Box<dyn TokenStore>>;

/// Session store for a one-shot command, restored from the token store
async fn cli_session(config: &Config) -> Result<(CliStore, UnboundedReceiver<Notice>)> {
    let api = ApiClient::new(&config.api_base_url(), config.request_timeout())?;
    let (notifier, notices) = Notifier::channel();
    let mut session = SessionStore::new(api, config.token_store()?, notifier);
    session.initialize().await;
    Ok((session, notices))
}

fn print_notices(notices: &mut UnboundedReceiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        println!("{}", notice);
    }
}

fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", label, d),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input.to_string(),
    })
}

async fn cli_login(mut config: Config) -> Result<()> {
    let (mut session, mut notices) = cli_session(&config).await?;
    if let Some(user) = session.user() {
        println!("Already logged in as {} <{}>", user.display_name, user.email);
        return Ok(());
    }

    let email = prompt("Email", config.last_email.as_deref())?;
    let password = rpassword::prompt_password("Password: ")?;

    if session.login(&email, &password).await {
        config.last_email = Some(email);
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
    print_notices(&mut notices);
    Ok(())
}

async fn cli_logout(config: Config) -> Result<()> {
    let (mut session, mut notices) = cli_session(&config).await?;
    if session.status() == AuthStatus::Unauthenticated {
        println!("Not logged in.");
        return Ok(());
    }
    session.logout();
    print_notices(&mut notices);
    Ok(())
}

async fn cli_whoami(config: Config) -> Result<()> {
    let (session, mut notices) = cli_session(&config).await?;
    print_notices(&mut notices);
    match session.session() {
        Some(s) => {
            println!("{} <{}>", s.display_name(), s.email());
            println!("id: {}", s.user_id());
            if let Some(since) = s.user().member_since() {
                println!("member since: {}", since);
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
