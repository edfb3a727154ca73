//! # wireframe-editor
//!
//! Command-line entry point of the creative wireframe editor.
//!
//! The editor itself is a library ([`wireframe_editor`]) driven by a UI.  This
//! binary exposes the same engine for scripting and debugging:
//!
//! ```text
//! wireframe-editor [--config <PATH>] <COMMAND>
//!
//! Commands:
//!   template   Print a generated template layout as JSON
//!   convert    Convert a legacy wireframe description into a layout
//!   validate   Check a layout file against the layout invariants
//!   config     Print the effective configuration as TOML
//!   replay     Feed recorded editor events through a session
//! ```
//!
//! JSON and TOML go to stdout; logs go to stderr.  The log level comes from
//! `RUST_LOG`, falling back to `editor.log_level` in the config file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wireframe_core::{legacy, templates, AspectRatio, Layout, LayoutType};
use wireframe_editor::application::autosave::Autosaver;
use wireframe_editor::application::events::EditorEvent;
use wireframe_editor::application::session::EditorSession;
use wireframe_editor::application::versioning::{finish_session, VersionService};
use wireframe_editor::infrastructure::notify::TracingNotifier;
use wireframe_editor::infrastructure::pointer_capture::NoopPointerCapture;
use wireframe_editor::infrastructure::storage::config::{self, EditorConfig};
use wireframe_editor::infrastructure::storage::memory::InMemoryVersionStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Layout engine of the creative wireframe editor.
#[derive(Debug, Parser)]
#[command(
    name = "wireframe-editor",
    about = "Layout engine of the creative wireframe editor",
    version
)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = "WIREFRAME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a generated template layout as JSON.
    Template {
        /// Preset: default, advertorial, news or card.  Defaults to `canvas.default_template`.
        #[arg(long)]
        kind: Option<LayoutType>,
        /// Aspect ratio: 1:1, 4:5, 9:16 or 16:9.  Defaults to `canvas.default_aspect_ratio`.
        #[arg(long)]
        ratio: Option<AspectRatio>,
    },

    /// Convert a legacy wireframe JSON file into a layout.
    Convert {
        file: PathBuf,
        /// Overrides the ratio stored in the legacy file.
        #[arg(long)]
        ratio: Option<AspectRatio>,
    },

    /// Check a layout JSON file against the layout invariants.
    Validate { file: PathBuf },

    /// Print the effective configuration as TOML.
    Config,

    /// Feed a JSON array of editor events through a session and print the result.
    Replay {
        layout: PathBuf,
        events: PathBuf,
        /// Save the result as a committed version and print the version record.
        #[arg(long)]
        commit: bool,
        /// Name recorded as the editor of saved versions.
        #[arg(long, env = "WIREFRAME_USER")]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.editor.log_level)),
        )
        .init();

    match cli.command {
        Command::Template { kind, ratio } => {
            let kind = kind.unwrap_or(config.canvas.default_template);
            let ratio = ratio.unwrap_or(config.canvas.default_aspect_ratio);
            let mut layout = templates::generate(kind, ratio, None);
            layout.meta_mut().snap_to_grid = config.canvas.snap_to_grid;
            layout.meta_mut().grid_size = config.canvas.grid_size;
            print_json(&layout)
        }
        Command::Convert { file, ratio } => {
            let json = read_file(&file)?;
            let layout = legacy::convert_legacy(&json, ratio);
            print_json(&layout)
        }
        Command::Validate { file } => {
            let layout = read_layout(&file)?;
            layout
                .validate()
                .with_context(|| format!("{} is not a valid layout", file.display()))?;
            println!("{}: ok ({} elements)", file.display(), layout.len());
            Ok(())
        }
        Command::Config => {
            let toml = toml::to_string_pretty(&config).context("failed to serialize configuration")?;
            print!("{toml}");
            Ok(())
        }
        Command::Replay {
            layout,
            events,
            commit,
            user,
        } => replay(&config, &layout, &events, commit, user.as_deref()).await,
    }
}

/// Runs recorded events through a session.  Rejected events are logged and
/// skipped, the same way the UI would show an error and carry on.
async fn replay(
    config: &EditorConfig,
    layout_path: &Path,
    events_path: &Path,
    commit: bool,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let layout = read_layout(layout_path)?;
    let events: Vec<EditorEvent> = serde_json::from_str(&read_file(events_path)?)
        .with_context(|| format!("{} is not a list of editor events", events_path.display()))?;

    let mut session = EditorSession::new(
        layout,
        config.session_settings(),
        Arc::new(NoopPointerCapture),
    )
    .context("layout cannot be edited")?;

    let store = Arc::new(InMemoryVersionStore::new());
    let service = Arc::new(VersionService::new(store.clone()));
    let autosaver = (commit && config.autosave.enabled).then(|| {
        Autosaver::spawn(
            Arc::clone(&service),
            Arc::new(TracingNotifier),
            config.autosave_debounce(),
            user.map(str::to_string),
        )
    });
    if let Some(autosaver) = &autosaver {
        session.set_listener(Arc::new(autosaver.handle()));
    }

    let total = events.len();
    let mut rejected = 0usize;
    for (index, event) in events.into_iter().enumerate() {
        if let Err(e) = session.handle_event(event) {
            rejected += 1;
            warn!(index, error = %e, "event rejected");
        }
    }
    info!(total, rejected, mode = ?session.mode(), "replay finished");

    if !commit {
        return print_json(session.layout());
    }

    if let Some(autosaver) = autosaver {
        autosaver.shutdown().await;
    }
    let version = finish_session(&mut session, &service, user)
        .await
        .context("failed to save layout")?;
    info!(
        version = version.version(),
        stored = store.versions().len(),
        "committed replayed layout"
    );
    print_json(&version)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_layout(path: &Path) -> anyhow::Result<Layout> {
    let json = read_file(path)?;
    let layout: Layout = serde_json::from_str(&json)
        .with_context(|| format!("{} is not layout JSON", path.display()))?;
    if layout.is_empty() {
        bail!("{} has no elements", path.display());
    }
    Ok(layout)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
