// startpage-cli/src/main.rs
mod frame;
mod palette;
mod tracks;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use serde_json::Value;
use std::{
    fs::OpenOptions,
    io,
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use startpage_core::{
    BuildReport, ComponentRegistry, ConfigManager, ConfigMap, FileStore, LayoutBuilder,
};
use startpage_widgets::register_builtin;

use crate::palette::palette_for;
use crate::tracks::{Axis, Track, split};

const USAGE: &str = "Usage: startpage [--export | --import=FILE | --reset | --print | --theme=NAME]";

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Interactive terminal page
    Run,
    /// Print the configuration document as JSON
    Export,
    /// Replace the configuration with the document in FILE
    Import(PathBuf),
    /// Restore the built-in default configuration
    Reset,
    /// Build the page once and print the element tree as JSON
    Print,
    /// Persist a theme
    Theme(String),
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let args: Vec<String> = args.into_iter().collect();
    let [arg] = args.as_slice() else {
        return match args.len() {
            0 => Ok(Command::Run),
            _ => Err(format!("Expected at most one argument\n{USAGE}")),
        };
    };

    match arg.as_str() {
        "--export" => Ok(Command::Export),
        "--reset" => Ok(Command::Reset),
        "--print" => Ok(Command::Print),
        "--help" | "-h" => Err(USAGE.to_string()),
        _ => {
            if let Some(file) = arg.strip_prefix("--import=").filter(|f| !f.is_empty()) {
                Ok(Command::Import(PathBuf::from(file)))
            } else if let Some(theme) = arg.strip_prefix("--theme=").filter(|t| !t.is_empty()) {
                Ok(Command::Theme(theme.to_string()))
            } else {
                Err(format!("Unknown argument '{}'\n{USAGE}", arg))
            }
        }
    }
}

/// The terminal page owns stdout, so it logs to a file beside the config
/// slot. One-shot commands log warnings to stderr.
fn init_logging(command: &Command, store: &FileStore) {
    if *command != Command::Run {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(io::stderr)
            .init();
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_path = store.path().with_file_name("startpage.log");
    let file = log_path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(&log_path));

    match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        // Nowhere to log without corrupting the screen
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init(),
    }
}

fn registry() -> ComponentRegistry {
    let registry = ComponentRegistry::new();
    register_builtin(&registry);
    registry
}

/// Load the document (falling back to defaults) and build it into `builder`
fn load_page(
    store: FileStore,
    builder: &mut LayoutBuilder,
) -> (ConfigManager<FileStore>, BuildReport) {
    let mut manager = ConfigManager::new(store);
    let mut report = BuildReport::default();
    manager.init(|doc| {
        report = builder.build_layout(&doc.layout);
    });

    if !report.is_clean() {
        tracing::warn!(
            diagnostics = report.diagnostics.len(),
            "Layout built with diagnostics"
        );
    }
    (manager, report)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let command = parse_args(std::env::args().skip(1))?;
    let store = FileStore::default_location()?;
    init_logging(&command, &store);

    match command {
        Command::Run => run(store),
        Command::Export => {
            let mut manager = ConfigManager::new(store);
            manager.init(|_| {});
            println!("{}", manager.export_config()?);
            Ok(())
        }
        Command::Import(file) => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
            let mut manager = ConfigManager::new(store);
            manager.import_config(&text)?;
            if manager.has_unsaved_changes() {
                return Err("Imported configuration could not be saved".into());
            }
            println!("Imported configuration from {}", file.display());
            Ok(())
        }
        Command::Reset => {
            let mut manager = ConfigManager::new(store);
            manager.reset_to_defaults();
            if manager.has_unsaved_changes() {
                return Err("Default configuration could not be saved".into());
            }
            println!("Configuration reset to defaults");
            Ok(())
        }
        Command::Print => {
            let mut builder = LayoutBuilder::new(registry());
            let (_, report) = load_page(store, &mut builder);
            for diagnostic in &report.diagnostics {
                eprintln!("Warning: {}", diagnostic);
            }
            let snapshot = builder.tree().snapshot(builder.root());
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Command::Theme(theme) => {
            let mut manager = ConfigManager::new(store);
            manager.init(|_| {});
            let mut patch = ConfigMap::new();
            patch.insert("theme".into(), Value::from(theme));
            manager.update_settings(&patch);
            println!("Theme set to {}", manager.applied_theme().unwrap_or("light"));
            Ok(())
        }
    }
}

fn run(store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_page(&mut terminal, store);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_page<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    store: FileStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = LayoutBuilder::new(registry());
    let (mut manager, mut report) = load_page(store.clone(), &mut builder);

    // Focus management
    let mut focused = 0usize;

    // Main loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        let palette = palette_for(manager.applied_theme());
        let components = frame::arrange(builder.tree(), builder.root(), Rect::default()).len();

        // Render
        terminal.draw(|f| {
            let areas = split(f.area(), &[Track::Flex(1), Track::Fixed(1)], Axis::Vertical);
            frame::draw_page(f, builder.tree(), builder.root(), areas[0], palette, focused);

            let status = format!(
                " theme: {} | {} widgets | {} diagnostics | q quit  t theme  Tab focus  Ctrl+r reload",
                manager.applied_theme().unwrap_or("light"),
                report.instances,
                report.diagnostics.len(),
            );
            let style = Style::default().fg(palette.muted).bg(palette.background);
            f.render_widget(Paragraph::new(Line::from(status)).style(style), areas[1]);
        })?;

        // Handle input with timeout
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)?
            && let CEvent::Key(key) = event::read()?
            && key.kind == crossterm::event::KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Char('r')
                    if key
                        .modifiers
                        .contains(crossterm::event::KeyModifiers::CONTROL) =>
                {
                    // Reload config from the store and rebuild the page
                    (manager, report) = load_page(store.clone(), &mut builder);
                    focused = 0;
                    tracing::info!("Configuration reloaded");
                }
                KeyCode::Char('t') => {
                    let theme = manager.toggle_theme();
                    tracing::info!(theme, "Theme toggled");
                }
                KeyCode::Tab if components > 0 => {
                    focused = (focused + 1) % components;
                }
                _ => {}
            }
        }

        // Re-render every live widget on tick so time-based content stays fresh
        if last_tick.elapsed() >= tick_rate {
            let ids: Vec<String> = builder.instance_ids().map(String::from).collect();
            let unchanged = ConfigMap::new();
            for id in ids {
                builder.update_component(&id, &unchanged);
            }
            last_tick = Instant::now();
        }
    }

    // Cleanup
    builder.clear();
    Ok(())
}
