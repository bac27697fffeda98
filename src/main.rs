use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use panarchy_console::app::{App, Focus, InputMode, Request, StatusLevel};
use panarchy_console::config::{self, Config, DEFAULT_ABI};
use panarchy_console::domain::NetworkParams;
use panarchy_console::infrastructure::ethereum::ProviderConfig;
use panarchy_console::infrastructure::runtime::{
    RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerSettings,
};
use panarchy_console::infrastructure::wallet::WalletConfig;
use panarchy_console::ui;

#[derive(Debug, Parser)]
#[command(
    name = "panarchy",
    version,
    about = "Panarchy: connect a wallet and drive the Panarchy contract from the terminal"
)]
struct Args {
    /// HTTP JSON-RPC endpoint the wallet starts on (e.g. http://localhost:8545)
    #[arg(long)]
    rpc: Option<String>,

    /// WebSocket endpoint the wallet starts on (e.g. ws://localhost:8546)
    #[arg(long)]
    ws: Option<String>,

    /// Contract ABI file or http(s) URL
    #[arg(long)]
    abi: Option<String>,

    /// Log file (default: panarchy.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load();

    let log_path = args
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(config::default_log_path);
    if let Some(path) = log_path.as_deref() {
        // Logging is best effort; the TUI owns stdout
        if let Err(err) = init_tracing(path) {
            eprintln!("logging disabled: {err:#}");
        }
    }

    let settings = worker_settings(&args, &config);
    let endpoint_display = settings
        .wallet
        .as_ref()
        .map(|wallet| wallet.endpoint.display())
        .unwrap_or_else(|| "none".to_string());
    tracing::info!(endpoint = %endpoint_display, abi = %settings.abi_source, "starting");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runtime = RuntimeBridge::new(settings)?;
    let app = App::new(endpoint_display);

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}

/// CLI flags win over the config file; `ws` wins over `rpc`
fn worker_settings(args: &Args, config: &Config) -> WorkerSettings {
    let endpoint = args
        .ws
        .as_deref()
        .or(args.rpc.as_deref())
        .or(config.ws.as_deref())
        .or(config.rpc.as_deref())
        .map(ProviderConfig::from_url);

    let wallet = endpoint.map(|endpoint| {
        let mut wallet = WalletConfig::new(endpoint);
        wallet.networks = config.network_params();
        wallet.private_keys = WalletConfig::keys_from_env(config.private_key_env());
        wallet.preauthorized = config.preauthorized;
        wallet
    });

    WorkerSettings {
        wallet,
        abi_source: args
            .abi
            .clone()
            .or_else(|| config.abi.clone())
            .unwrap_or_else(|| DEFAULT_ABI.to_string()),
        network: NetworkParams::panarchy(),
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::SessionUpdated(session) => app.apply_session(session),
            RuntimeEvent::Error { message } => app.set_status(message, StatusLevel::Warn),
        }
    }

    for request in app.drain_requests() {
        let cmd = match request {
            Request::Connect => RuntimeCommand::Connect,
            Request::SelectOperation(name) => RuntimeCommand::SelectOperation { name },
            Request::Submit { name, values } => RuntimeCommand::Submit { name, values },
            Request::CycleAccount => RuntimeCommand::CycleAccount,
            Request::Disconnect => RuntimeCommand::Disconnect,
        };
        if let Err(err) = runtime.send(cmd) {
            app.set_status(format!("{err:#}"), StatusLevel::Warn);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.stop_editing(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        }
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char('c') => app.request_connect(),
        KeyCode::Char('a') => app.cycle_account(),
        KeyCode::Char('d') => app.disconnect(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Enter => app.activate(),
        KeyCode::Esc => app.clear_selection(),
        KeyCode::Left | KeyCode::Char('h') if app.focus == Focus::Form => app.adjust_field(false),
        KeyCode::Right | KeyCode::Char('l') if app.focus == Focus::Form => app.adjust_field(true),
        KeyCode::Char(' ') if app.focus == Focus::Form => app.adjust_field(true),
        KeyCode::Char('s') if app.focus == Focus::Form => app.submit(),
        _ => {}
    }
}
