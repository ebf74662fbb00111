//! plandesk - terminal client for plandesk accounts.
//!
//! Log in, register and manage your profile from the terminal. The session
//! (token pair) survives restarts; see `plandesk_core::config` for where it is
//! kept.

mod app;
mod forms;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plandesk_core::{Config, Route};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "plandesk.log";

/// Initialize logging to a file in the cache directory.
///
/// The terminal belongs to the UI, so nothing is written to stderr. The
/// returned guard flushes the writer on drop.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::cache_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
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

    let _log_guard = init_tracing();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--whoami") => return whoami().await,
        Some("--login") => return login_interactive().await,
        Some("--logout") => return logout().await,
        Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }
    let requested = args
        .get(1)
        .map(|path| Route::from_path(path))
        .unwrap_or(Route::Profile);

    info!("plandesk starting");

    let mut app = App::new().context("Failed to initialize")?;

    // Resolve the stored session before anything is drawn
    app.start(requested).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("plandesk shutting down");
    Ok(())
}

fn print_usage() {
    println!("Usage: plandesk [ROUTE | --login | --whoami | --logout]");
    println!();
    println!("  ROUTE      /login, /register or /profile (default /profile)");
    println!("  --login    Log in from the command line");
    println!("  --whoami   Print the logged-in user and exit");
    println!("  --logout   Log out and clear stored tokens");
}

/// Log in without starting the UI
async fn login_interactive() -> Result<()> {
    let mut app = App::new()?;

    let default_email = app.login.email.clone();
    if default_email.is_empty() {
        print!("Email: ");
    } else {
        print!("Email [{}]: ", default_email);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let email = match input.trim() {
        "" => default_email,
        s => s.to_string(),
    };

    app.login.email = email;
    app.login.password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");
    app.attempt_login().await;
    if !app.login.field_errors.is_empty() {
        anyhow::bail!("{}", app.login.field_errors);
    }
    if let Some(error) = app.login.error.take() {
        anyhow::bail!(error);
    }

    match app.session.current_user() {
        Some(user) => println!("Logged in as {} <{}>", user.full_name(), user.email()),
        None => println!("Logged in"),
    }
    Ok(())
}

/// Print the user the stored session belongs to
async fn whoami() -> Result<()> {
    let app = App::new()?;
    match app.session.reload_profile().await? {
        Some(user) => {
            println!("{} <{}>", user.full_name(), user.email());
            println!("Mobile: {}", user.user.mobile);
            let address = user.profile.address_display();
            if !address.is_empty() {
                println!("Address: {}", address);
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

async fn logout() -> Result<()> {
    let app = App::new()?;
    if !app.session.is_logged_in() {
        println!("Not logged in");
        return Ok(());
    }
    match app.session.logout().await {
        Some(response) => println!("{}", response.message),
        None => println!("Local session cleared"),
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        app.check_session_updates().await;

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
