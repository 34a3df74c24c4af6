use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use grun::app::{App, DashboardEvent, Effect, ListNav, StatusLevel, TickSource};
use grun::config::Config;
use grun::infrastructure::cloudrun::{
    CloudRunLister, MockLister, Parent, ResourceKind, ResourceLister,
};
use grun::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use grun::registry::TabRegistry;

/// How long the startup fetch may block before the dashboard comes up with
/// empty, stale lists instead.
const STARTUP_FETCH_DEADLINE: Duration = Duration::from_secs(5);

/// Poll timeout when no animation tick is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(
    name = "grun",
    version,
    about = "grun: a terminal dashboard for Google Cloud Run"
)]
struct Args {
    /// List resources to stdout and exit (non-interactive)
    #[arg(long)]
    list: bool,

    /// GCP project id (defaults to $GRUN_PROJECT)
    #[arg(long)]
    project: Option<String>,

    /// Cloud Run region (defaults to $GRUN_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Use fixture data instead of the Cloud Run API
    #[arg(long)]
    mock: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.list)?;

    let config = grun::config::load();
    let parent = Parent {
        project: args
            .project
            .clone()
            .or_else(|| std::env::var("GRUN_PROJECT").ok())
            .unwrap_or_else(|| "default".to_string()),
        region: args
            .region
            .clone()
            .or_else(|| std::env::var("GRUN_REGION").ok())
            .unwrap_or_else(|| "us-central1".to_string()),
    };
    let lister: Box<dyn ResourceLister> = if args.mock {
        Box::new(MockLister)
    } else {
        Box::new(CloudRunLister::new(parent.clone()))
    };

    if args.list {
        return run_list_mode(lister);
    }

    let bridge = RuntimeBridge::new(lister)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let registry = TabRegistry::cloud_run(info_text(&parent, &config, args.mock));
    let mut app = App::new(registry, config);
    startup_fetch(&mut app, &bridge);

    let res = run_app(&mut terminal, app, bridge);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Non-interactive mode for the --list flag: print names line by line.
fn run_list_mode(lister: Box<dyn ResourceLister>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    for kind in [ResourceKind::Services, ResourceKind::Jobs] {
        let names = rt.block_on(lister.list(kind))?;
        println!("{}:", kind.title());
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn init_tracing(to_stderr: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(());
    }

    // The TUI owns the terminal, so interactive runs log to a file.
    let dir = grun::config::data_dir().unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("grun.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Arc::new(file))
        .init();
    Ok(())
}

fn info_text(parent: &Parent, config: &Config, mock: bool) -> String {
    let config_path = grun::config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "Project:    {}\nRegion:     {}\nData mode:  {}\nConfig:     {}\nMax length: {}",
        parent.project,
        parent.region,
        if mock { "mock" } else { "cloud-run-api" },
        config_path,
        config.max_length,
    )
}

/// One blocking, deadline-bounded fetch per resource-backed tab. Failure or
/// timeout degrades to an empty list flagged stale; the dashboard always
/// comes up.
fn startup_fetch(app: &mut App, bridge: &RuntimeBridge) {
    let kinds = [ResourceKind::Services, ResourceKind::Jobs];
    let mut pending: Vec<ResourceKind> = Vec::new();
    for kind in kinds {
        if bridge.send(RuntimeCommand::Fetch(kind)).is_ok() {
            pending.push(kind);
        } else {
            app.apply_fetch_error(kind, "background worker unavailable");
        }
    }

    let deadline = Instant::now() + STARTUP_FETCH_DEADLINE;
    while !pending.is_empty() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match bridge.recv_timeout(deadline - now) {
            Some(RuntimeEvent::Resources { kind, names }) => {
                pending.retain(|k| *k != kind);
                app.apply_resources(kind, names);
            }
            Some(RuntimeEvent::FetchFailed { kind, message }) => {
                pending.retain(|k| *k != kind);
                app.apply_fetch_error(kind, &message);
            }
            None => break,
        }
    }

    for kind in pending {
        tracing::warn!("startup fetch for {} timed out", kind.collection());
        app.apply_fetch_error(kind, "timed out");
    }
}

/// Deadlines for the recurring animation ticks. One slot per source; arming
/// replaces any previous deadline, so a widget reset never double-ticks.
struct TickDeadlines {
    timer: Option<Instant>,
    spinner: Option<Instant>,
}

impl TickDeadlines {
    fn new() -> Self {
        Self {
            timer: None,
            spinner: None,
        }
    }

    fn arm(&mut self, source: TickSource, after: Duration) {
        let slot = match source {
            TickSource::Timer => &mut self.timer,
            TickSource::Spinner => &mut self.spinner,
        };
        *slot = Some(Instant::now() + after);
    }

    fn until_next(&self) -> Option<Duration> {
        [self.timer, self.spinner]
            .iter()
            .flatten()
            .min()
            .map(|next| next.saturating_duration_since(Instant::now()))
    }

    fn due(&mut self) -> Vec<TickSource> {
        let now = Instant::now();
        let mut sources = Vec::new();
        if self.timer.is_some_and(|t| t <= now) {
            self.timer = None;
            sources.push(TickSource::Timer);
        }
        if self.spinner.is_some_and(|t| t <= now) {
            self.spinner = None;
            sources.push(TickSource::Spinner);
        }
        sources
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    bridge: RuntimeBridge,
) -> Result<()> {
    let mut ticks = TickDeadlines::new();
    for effect in app.init_effects() {
        apply_effect(&mut app, effect, &bridge, &mut ticks);
    }

    loop {
        pump_background(&mut app, &bridge);
        app.on_tick();
        terminal.draw(|f| grun::ui::draw(f, &mut app))?;
        if app.should_quit {
            let _ = bridge.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = ticks.until_next().unwrap_or(IDLE_POLL).min(IDLE_POLL);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(dashboard_event) = map_key(key) {
                        dispatch(&mut app, dashboard_event, &bridge, &mut ticks);
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        for source in ticks.due() {
            dispatch(&mut app, DashboardEvent::Tick(source), &bridge, &mut ticks);
        }
    }
}

fn pump_background(app: &mut App, bridge: &RuntimeBridge) {
    for event in bridge.poll_events() {
        match event {
            RuntimeEvent::Resources { kind, names } => app.apply_resources(kind, names),
            RuntimeEvent::FetchFailed { kind, message } => app.apply_fetch_error(kind, &message),
        }
    }
}

fn dispatch(
    app: &mut App,
    event: DashboardEvent,
    bridge: &RuntimeBridge,
    ticks: &mut TickDeadlines,
) {
    for effect in app.handle_event(event) {
        apply_effect(app, effect, bridge, ticks);
    }
}

fn apply_effect(app: &mut App, effect: Effect, bridge: &RuntimeBridge, ticks: &mut TickDeadlines) {
    match effect {
        Effect::ScheduleTick(source, after) => ticks.arm(source, after),
        Effect::FetchResources(kind) => {
            if bridge.send(RuntimeCommand::Fetch(kind)).is_err() {
                app.set_status("Background worker unavailable", StatusLevel::Warn);
            }
        }
    }
}

/// Keyboard surface. Keys map to events unconditionally; whether an event
/// means anything in the current state is the reducer's call.
fn map_key(key: KeyEvent) -> Option<DashboardEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let event = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => DashboardEvent::Quit,
        (KeyCode::Char('q'), _) => DashboardEvent::Quit,
        (KeyCode::Right | KeyCode::Char('l'), _) => DashboardEvent::TabRight,
        (KeyCode::Left | KeyCode::Char('h'), _) => DashboardEvent::TabLeft,
        (KeyCode::Tab, _) => DashboardEvent::ToggleFocus,
        (KeyCode::Char('n'), _) => DashboardEvent::NextVariant,
        (KeyCode::Char('r'), _) => DashboardEvent::Refresh,
        (KeyCode::Up | KeyCode::Char('k'), _) => DashboardEvent::ListNavigate(ListNav::Up),
        (KeyCode::Down | KeyCode::Char('j'), _) => DashboardEvent::ListNavigate(ListNav::Down),
        _ => return None,
    };
    Some(event)
}
