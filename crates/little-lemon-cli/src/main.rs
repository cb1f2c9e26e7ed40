//! Little Lemon - the restaurant menu in your terminal.
//!
//! Downloads the menu on first run, keeps it in a local SQLite cache and
//! answers searches and category filters offline from then on.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use little_lemon_core::utils::{
    format_price, image_url, truncate_description, DESCRIPTION_PREVIEW_CHARS,
};
use little_lemon_core::{MenuItem, NotificationKind, ProfileChanges, Section, TARGET_VERSION};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "little-lemon.log";

const USAGE: &str = "\
Usage: little-lemon [COMMAND]

Commands:
  (none)                               Full-screen menu with search and filters
  menu                                 Print the full menu
  search <text> [-c <section>]..       Search dish names (case-sensitive)
  status                               Show local cache state
  onboard <first-name> <email>         Complete onboarding
  profile                              Show the saved profile
  profile set <field> <value>          Change first-name, last-name, email or phone
  profile notify <kind> on|off         Toggle orders, password, offers or newsletter
  profile avatar <path> | --remove     Pick or remove the avatar image
  logout                               Delete the saved profile";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug). Logs
/// go to a file in the cache directory; the full-screen UI owns the
/// terminal, so stderr is only used by the plain commands. The returned
/// guard flushes the log file on drop.
fn init_tracing(log_dir: Option<PathBuf>, to_stderr: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        _ => (None, None),
    };
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("-h" | "--help" | "help")) {
        println!("{}", USAGE);
        return Ok(());
    }

    let log_dir = little_lemon_core::Config::load()
        .unwrap_or_default()
        .cache_dir()
        .ok();
    let _log_guard = init_tracing(log_dir, !args.is_empty());
    info!("Little Lemon starting");

    let mut app = App::new().await?;

    let result = match args.first().map(String::as_str) {
        None => run_interactive(&mut app).await,
        Some("menu") => print_menu(&mut app).await,
        Some("search") => run_search(&mut app, &args[1..]).await,
        Some("status") => print_status(&app).await,
        Some("onboard") => run_onboard(&app, &args[1..]),
        Some("profile") => run_profile(&mut app, &args[1..]),
        Some("logout") => app.logout(),
        Some(other) => Err(anyhow::anyhow!("Unknown command: {}\n\n{}", other, USAGE)),
    };

    app.wait_for_cache().await;
    info!("Little Lemon shutting down");
    result
}

// ============================================================================
// Full-screen UI
// ============================================================================

async fn run_interactive(app: &mut App) -> Result<()> {
    app.load_menu().await?;
    app.start_live_search();
    if app.needs_onboarding() {
        app.start_onboarding();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
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

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Debounced search text, query results, first-run persistence
        app.check_background_tasks().await;

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// Plain commands
// ============================================================================

fn print_notices(app: &mut App) {
    if let Some(alert) = app.alert.take() {
        eprintln!("! {}", alert);
    }
    if let Some(status) = app.take_status() {
        eprintln!("{}", status);
    }
}

fn format_item(index: usize, item: &MenuItem, image_base: &str) -> String {
    format!(
        "[{}] {}  {}\n    {}\n    {}",
        item.row_key(index),
        item.name,
        format_price(item.price),
        truncate_description(&item.description, DESCRIPTION_PREVIEW_CHARS),
        image_url(image_base, &item.image),
    )
}

fn print_items(app: &App) {
    let items = app.search.displayed();
    if items.is_empty() {
        println!("(no dishes match)");
    }
    for (i, item) in items.iter().enumerate() {
        println!("{}", format_item(i, item, app.config.image_base_url()));
    }
}

async fn print_menu(app: &mut App) -> Result<()> {
    app.load_menu().await?;
    print_notices(app);
    print_items(app);
    Ok(())
}

async fn run_search(app: &mut App, args: &[String]) -> Result<()> {
    let mut text = String::new();
    let mut sections = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--category" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--category needs a section name"))?;
                let section: Section = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                sections.push(section);
            }
            _ if text.is_empty() => text = arg.clone(),
            _ => return Err(anyhow::anyhow!("Unexpected argument: {}", arg)),
        }
    }

    app.load_menu().await?;
    app.wait_for_cache().await;
    for section in sections {
        app.search.toggle_filter(section);
    }
    app.on_search_text(text);

    if let Some(outcome) = app.next_outcome().await {
        app.process_outcome(outcome);
    }
    print_notices(app);
    print_items(app);
    Ok(())
}

async fn print_status(app: &App) -> Result<()> {
    let version = app.store.version().await?;
    let count = app.store.item_count().await?;
    let state = if version >= TARGET_VERSION { "ready" } else { "not downloaded" };
    println!("Menu cache: {} (version {}/{}, {} dishes)", state, version, TARGET_VERSION, count);
    println!("Menu source: {}", app.config.menu_url());
    Ok(())
}

fn run_onboard(app: &App, args: &[String]) -> Result<()> {
    let (first_name, email) = match args {
        [first_name, email] => (first_name, email),
        _ => return Err(anyhow::anyhow!("Usage: little-lemon onboard <first-name> <email>")),
    };
    let profile = app.onboard(first_name, email)?;
    println!("Welcome, {}!", profile.first_name);
    Ok(())
}

fn run_profile(app: &mut App, args: &[String]) -> Result<()> {
    if args.is_empty() {
        return print_profile(app);
    }
    let changes = parse_profile_changes(args)?;
    app.update_profile(changes)?;
    println!("Profile saved");
    print_profile(app)
}

/// `set <field> <value>`, `notify <kind> on|off` or `avatar <path>|--remove`.
fn parse_profile_changes(args: &[String]) -> Result<ProfileChanges> {
    let mut changes = ProfileChanges::default();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["set", field, value] => {
            let value = Some(value.to_string());
            match *field {
                "first-name" => changes.first_name = value,
                "last-name" => changes.last_name = value,
                "email" => changes.email = value,
                "phone" => changes.phone_number = value,
                other => return Err(anyhow::anyhow!("Unknown profile field: {}", other)),
            }
        }
        ["notify", kind, state] => {
            let kind: NotificationKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let enabled = match *state {
                "on" => true,
                "off" => false,
                other => return Err(anyhow::anyhow!("Expected on or off, got {}", other)),
            };
            changes.notifications.push((kind, enabled));
        }
        ["avatar", "--remove"] => changes.image = Some(None),
        ["avatar", path] => changes.image = Some(Some(path.to_string())),
        _ => return Err(anyhow::anyhow!("Unknown profile command\n\n{}", USAGE)),
    }
    Ok(changes)
}

fn print_profile(app: &App) -> Result<()> {
    match app.profiles.load()? {
        Some(profile) => {
            println!("{} ({})", profile.full_name(), profile.initials());
            println!("Email: {}", profile.email);
            if !profile.phone_number.is_empty() {
                println!("Phone: {}", profile.display_phone());
            }
            if let Some(ref image) = profile.image {
                println!("Avatar: {}", image);
            }
            let notifications = NotificationKind::ALL
                .iter()
                .map(|kind| {
                    let state = if profile.notifications.get(*kind) { "on" } else { "off" };
                    format!("{} {}", kind.label().to_lowercase(), state)
                })
                .collect::<Vec<_>>()
                .join(", ");
            println!("Notifications: {}", notifications);
        }
        None => println!("Not onboarded yet. Run `little-lemon onboard <first-name> <email>`."),
    }
    Ok(())
}
