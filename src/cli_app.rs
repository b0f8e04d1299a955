//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use serde_json::{json, Value};
use thiserror::Error;

use navscope::core::config::Config;
use navscope::core::paths::resolve_state_dir;
use navscope::layout::builders::build_grid_layout;
use navscope::layout::panel::{Layout, Viewport};
use navscope::layout::store::{resolve_startup_layout, LayoutLoad, LayoutStore, SaveSlot};
use navscope::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};
use navscope::prefs::{self, DashboardPrefs, SessionOverrides, StartupLayout};
use navscope::telemetry::feed::{spawn_dummy_feed, spawn_tcp_feed, FeedMessage};
use navscope::telemetry::pipeline::{FrameSink, RenderFrame, UpdatePipeline};
use navscope::history::store::SignalHistory;

/// Layout geometry is resolved against this viewport when no display is
/// attached (headless runs, `layout reset`).
const REFERENCE_VIEWPORT: Viewport = Viewport::new(1920.0, 1080.0);

/// Minimum interval between rendered status frames.
const RENDER_INTERVAL: Duration = Duration::from_millis(500);

/// NavScope — live GNSS telemetry dashboard core.
#[derive(Debug, Parser)]
#[command(
    name = "navscope",
    author,
    version,
    about = "NavScope - GNSS Telemetry Dashboard",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Connect to the feed and stream status frames.
    Run(RunArgs),
    /// Inspect and manage persisted layouts.
    Layout(LayoutArgs),
    /// View configuration state.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RunArgs {
    /// Use the built-in synthetic feed instead of connecting out.
    #[arg(long)]
    dummy: bool,
    /// Override the feed endpoint (`host:port`).
    #[arg(long, value_name = "ENDPOINT")]
    endpoint: Option<String>,
    /// Override the state directory for layouts and preferences.
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,
    /// Override the startup layout: grid, saved, custom1, custom2, custom3.
    #[arg(long, value_name = "NAME")]
    startup_layout: Option<String>,
    /// Exit after this many rendered frames (0 = run forever).
    #[arg(long, default_value_t = 0, value_name = "N")]
    max_frames: u64,
}

#[derive(Debug, Clone, Args)]
struct LayoutArgs {
    #[command(subcommand)]
    command: LayoutCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum LayoutCommand {
    /// Print the live layout.
    Show,
    /// Reset the live layout to the grid template.
    Reset,
    /// Copy the live layout into a named slot.
    Save(SlotArg),
    /// List save slots and whether they hold a layout.
    Slots,
}

#[derive(Debug, Clone, Args)]
struct SlotArg {
    /// Slot name: saved, custom1, custom2, custom3.
    #[arg(value_name = "SLOT")]
    slot: String,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Run(args) => run_feed(cli, args),
        Command::Layout(args) => run_layout(cli, args),
        Command::Config(args) => run_config(cli, args),
    }
}

// ──────────────────────── run ────────────────────────

struct RunContext {
    config: Config,
    store: LayoutStore,
    prefs: DashboardPrefs,
    log: JsonlWriter,
}

fn build_run_context(cli: &Cli, args: &RunArgs) -> Result<RunContext, CliError> {
    let mut config =
        Config::load(cli.config.as_deref()).map_err(|e| CliError::Runtime(e.to_string()))?;
    if let Some(endpoint) = &args.endpoint {
        config.feed.endpoint = endpoint.clone();
    }
    if args.dummy {
        config.feed.dummy = true;
    }
    if let Some(dir) = &args.state_dir {
        config.paths.state_dir = dir.clone();
    }

    let state_dir = resolve_state_dir(Some(&config.paths.state_dir))
        .ok_or_else(|| CliError::Runtime("no usable state directory".to_string()))?;
    let store = LayoutStore::new(state_dir.clone());

    let mut log = JsonlWriter::open(JsonlConfig {
        path: config.log.jsonl_log.clone(),
        max_size_bytes: config.log.max_size_bytes,
        max_rotated_files: config.log.max_rotated_files,
        ..JsonlConfig::default()
    });

    // Preferences: persisted file merged under any CLI override.
    let prefs_path = prefs::default_preferences_path(Some(&state_dir))
        .ok_or_else(|| CliError::Runtime("no usable preferences path".to_string()))?;
    let outcome = prefs::load(&prefs_path);
    if !outcome.is_ok() {
        log.write_entry(
            &LogEntry::new(EventType::PrefsFallback, Severity::Warning)
                .with_details(format!("{outcome:?}")),
        );
    }
    let persisted = outcome.into_prefs();

    let startup_override = match &args.startup_layout {
        Some(name) => Some(StartupLayout::from_name(name).ok_or_else(|| {
            CliError::User(format!(
                "unknown startup layout {name:?}; expected grid, saved, or custom1-3"
            ))
        })?),
        None => None,
    };
    let prefs = prefs::merge(
        &persisted,
        &SessionOverrides {
            startup_layout: startup_override,
        },
    );

    Ok(RunContext {
        config,
        store,
        prefs,
        log,
    })
}

fn run_feed(cli: &Cli, args: &RunArgs) -> Result<(), CliError> {
    let mut ctx = build_run_context(cli, args)?;
    let mode = output_mode(cli);

    ctx.log.write_entry(
        &LogEntry::new(EventType::EngineStart, Severity::Info)
            .with_endpoint(ctx.config.feed.endpoint.clone()),
    );

    // Startup layout: requested slot, falling back to the grid and ultimately
    // the factory layout.
    let startup_slot = ctx.prefs.startup_layout.slot();
    if let Some(slot) = startup_slot
        && ctx.store.load_slot(slot).is_none()
    {
        ctx.log.write_entry(
            &LogEntry::new(EventType::LayoutFallback, Severity::Warning)
                .with_slot(slot.to_string()),
        );
    }
    let layout = resolve_startup_layout(&ctx.store, startup_slot, REFERENCE_VIEWPORT);
    if let Err(e) = ctx.store.save_current(&layout) {
        ctx.log.write_entry(
            &LogEntry::new(EventType::Error, Severity::Warning)
                .with_details(format!("persist startup layout: {e}")),
        );
    } else {
        ctx.log
            .write_entry(&LogEntry::new(EventType::LayoutSave, Severity::Info));
    }

    let rx = if ctx.config.feed.dummy {
        spawn_dummy_feed(Duration::from_millis(ctx.config.feed.dummy_interval_ms))
    } else {
        spawn_tcp_feed(&ctx.config.feed)
    };

    let mut pipeline = UpdatePipeline::new(SignalHistory::new(Duration::from_secs(
        ctx.config.history.window_secs,
    )));
    let mut sink = StdoutSink {
        mode,
        quiet: cli.quiet,
        frames: 0,
    };
    let mut last_render: Option<Instant> = None;

    loop {
        match rx.recv_timeout(RENDER_INTERVAL) {
            Ok(msg) => handle_feed_message(&mut ctx, &mut pipeline, msg),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                ctx.log
                    .write_entry(&LogEntry::new(EventType::EngineStop, Severity::Critical));
                return Err(CliError::Runtime("feed channel closed".to_string()));
            }
        }
        // Drain whatever queued up behind the blocking recv so the render
        // below always reflects the newest snapshot.
        while let Ok(msg) = rx.try_recv() {
            handle_feed_message(&mut ctx, &mut pipeline, msg);
        }

        if last_render.is_none_or(|t| t.elapsed() >= RENDER_INTERVAL) {
            if pipeline.publish(&mut sink) {
                last_render = Some(Instant::now());
            }
            if args.max_frames > 0 && sink.frames >= args.max_frames {
                ctx.log
                    .write_entry(&LogEntry::new(EventType::EngineStop, Severity::Info));
                ctx.log.flush();
                return Ok(());
            }
        }
    }
}

fn handle_feed_message(ctx: &mut RunContext, pipeline: &mut UpdatePipeline, msg: FeedMessage) {
    match msg {
        FeedMessage::Connected { endpoint } => {
            ctx.log.write_entry(
                &LogEntry::new(EventType::FeedConnect, Severity::Info).with_endpoint(endpoint),
            );
        }
        FeedMessage::Disconnected { details } => {
            ctx.log.write_entry(
                &LogEntry::new(EventType::FeedDisconnect, Severity::Warning)
                    .with_endpoint(ctx.config.feed.endpoint.clone())
                    .with_details(details),
            );
        }
        FeedMessage::Line(line) => {
            if let Err(e) = pipeline.ingest_line(&line, Instant::now()) {
                ctx.log.write_entry(
                    &LogEntry::new(EventType::BadPayload, Severity::Warning).with_error(&e),
                );
            }
        }
    }
}

/// Prints one status line per rendered frame.
struct StdoutSink {
    mode: OutputMode,
    quiet: bool,
    frames: u64,
}

impl FrameSink for StdoutSink {
    fn on_frame(&mut self, frame: &RenderFrame<'_>) {
        self.frames += 1;
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                let fix = frame.snapshot.fix.as_ref();
                let counts = frame.snapshot.counts.as_ref();
                println!(
                    "{} {:<5} pos={} spd={} cog={} sats={}/{} chart={}",
                    frame.snapshot.t_utc.as_deref().unwrap_or("------"),
                    frame.link.label(),
                    fix.and_then(|f| f.lat.zip(f.lon))
                        .map_or_else(|| "-".to_string(), |(lat, lon)| format!(
                            "{lat:.6},{lon:.6}"
                        )),
                    fix.and_then(|f| f.speed_knots)
                        .map_or_else(|| "-".to_string(), |s| format!("{s:.1}kn")),
                    fix.and_then(|f| f.cog_deg)
                        .map_or_else(|| "-".to_string(), |c| format!("{c:.0}°")),
                    counts.and_then(|c| c.used).unwrap_or(0),
                    counts.and_then(|c| c.in_view).unwrap_or(0),
                    frame.chart.len(),
                );
            }
            OutputMode::Json => {
                let payload = json!({
                    "t_utc": frame.snapshot.t_utc,
                    "link": frame.link,
                    "fix": frame.snapshot.fix,
                    "counts": frame.snapshot.counts,
                    "heading": frame.heading,
                    "chart_lines": frame.chart.len(),
                });
                let _ = write_json_line(&payload);
            }
        }
    }
}

// ──────────────────────── layout ────────────────────────

fn open_store(cli: &Cli) -> Result<LayoutStore, CliError> {
    let config =
        Config::load(cli.config.as_deref()).map_err(|e| CliError::Runtime(e.to_string()))?;
    let state_dir = resolve_state_dir(Some(&config.paths.state_dir))
        .ok_or_else(|| CliError::Runtime("no usable state directory".to_string()))?;
    Ok(LayoutStore::new(state_dir))
}

fn run_layout(cli: &Cli, args: &LayoutArgs) -> Result<(), CliError> {
    let store = open_store(cli)?;

    match &args.command {
        LayoutCommand::Show => {
            let layout = match store.load_current() {
                LayoutLoad::Loaded(layout) => layout,
                LayoutLoad::Missing => Layout::default(),
                other => {
                    eprintln!("navscope: live layout unreadable ({other:?}); showing defaults");
                    other.into_layout()
                }
            };
            println!("{}", serde_json::to_string_pretty(&layout)?);
            Ok(())
        }
        LayoutCommand::Reset => {
            let mut layout = build_grid_layout(REFERENCE_VIEWPORT);
            layout.seed_missing_z();
            store
                .save_current(&layout)
                .map_err(|e| CliError::Runtime(format!("save layout: {e}")))?;
            if output_mode(cli) == OutputMode::Json {
                write_json_line(&json!({"command": "layout reset", "ok": true}))?;
            } else if !cli.quiet {
                println!("Live layout reset to the grid template.");
            }
            Ok(())
        }
        LayoutCommand::Save(arg) => {
            let slot = SaveSlot::from_name(&arg.slot).ok_or_else(|| {
                CliError::User(format!(
                    "unknown slot {:?}; expected saved or custom1-3",
                    arg.slot
                ))
            })?;
            let layout = store.load_current().into_layout();
            store
                .save_slot(slot, &layout)
                .map_err(|e| CliError::Runtime(format!("save slot {slot}: {e}")))?;
            if output_mode(cli) == OutputMode::Json {
                write_json_line(&json!({"command": "layout save", "slot": slot.to_string(), "ok": true}))?;
            } else if !cli.quiet {
                println!("Live layout saved to slot {slot}.");
            }
            Ok(())
        }
        LayoutCommand::Slots => {
            let entries: Vec<(SaveSlot, bool)> = SaveSlot::ALL
                .into_iter()
                .map(|slot| (slot, store.load_slot(slot).is_some()))
                .collect();
            match output_mode(cli) {
                OutputMode::Human => {
                    for (slot, present) in &entries {
                        println!(
                            "  {:<8} {}",
                            slot.to_string(),
                            if *present { "saved layout" } else { "(empty)" },
                        );
                    }
                }
                OutputMode::Json => {
                    let slots: Vec<Value> = entries
                        .iter()
                        .map(|(slot, present)| {
                            json!({"slot": slot.to_string(), "present": present})
                        })
                        .collect();
                    write_json_line(&json!({"command": "layout slots", "slots": slots}))?;
                }
            }
            Ok(())
        }
    }
}

// ──────────────────────── config ────────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(Config::default_path);
            if output_mode(cli) == OutputMode::Json {
                write_json_line(&json!({"command": "config path", "path": path}))?;
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
        ConfigCommand::Show => {
            let config =
                Config::load(cli.config.as_deref()).map_err(|e| CliError::Runtime(e.to_string()))?;
            if output_mode(cli) == OutputMode::Json {
                write_json_line(&serde_json::to_value(&config)?)?;
            } else {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| CliError::Runtime(e.to_string()))?;
                print!("{rendered}");
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            match Config::load(cli.config.as_deref()) {
                Ok(_) => {
                    if output_mode(cli) == OutputMode::Json {
                        write_json_line(&json!({"command": "config validate", "ok": true}))?;
                    } else if !cli.quiet {
                        println!("Configuration OK.");
                    }
                    Ok(())
                }
                Err(e) => Err(CliError::User(e.to_string())),
            }
        }
    }
}

// ──────────────────────── helpers ────────────────────────

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
