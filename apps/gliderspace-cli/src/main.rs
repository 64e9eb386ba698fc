use anyhow::Context;
use clap::{Parser, Subcommand};
use gliderspace_assets::{GliderModel, ObjectCatalog};
use gliderspace_input::KeyState;
use gliderspace_kernel::ParamValue;
use gliderspace_render::{DebugTextRenderer, HeadlessScene, Renderer};
use gliderspace_session::{Session, SessionConfig};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gliderspace-cli", about = "CLI tool for gliderspace scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load and validate an object data file (and optionally a glider model)
    Validate {
        /// Object data file (JSON array of records)
        objects: PathBuf,
        /// Glider model (glTF JSON)
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// List parameter store values
    Params {
        /// Session config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build a headless scene and fly a scripted session
    Run {
        /// Object data file (JSON array of records)
        objects: PathBuf,
        /// Glider model (glTF JSON); the built-in glider is used otherwise
        #[arg(long)]
        model: Option<PathBuf>,
        /// Session config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Parameter override, `key=value` (repeatable)
        #[arg(long = "set")]
        overrides: Vec<String>,
        /// Key event, `frame:key:down|up` (repeatable)
        #[arg(long = "key")]
        keys: Vec<ScriptedKey>,
    },
}

/// A key transition applied before a given frame.
#[derive(Debug, Clone)]
struct ScriptedKey {
    frame: u64,
    key: String,
    state: KeyState,
}

impl FromStr for ScriptedKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(frame), Some(key), Some(state)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected frame:key:down|up, got {s:?}"));
        };
        let frame = frame
            .parse()
            .map_err(|_| format!("bad frame number {frame:?}"))?;
        let state = match state {
            "down" => KeyState::Down,
            "up" => KeyState::Up,
            other => return Err(format!("key state must be down or up, got {other:?}")),
        };
        Ok(Self {
            frame,
            key: key.to_string(),
            state,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gliderspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", gliderspace_common::crate_info());
            println!("assets: {}", gliderspace_assets::crate_info());
            println!("input: {}", gliderspace_input::crate_info());
            println!("render: {}", gliderspace_render::crate_info());
            println!("session: {}", gliderspace_session::crate_info());
        }
        Commands::Validate { objects, model } => {
            let catalog = ObjectCatalog::load(&objects)
                .with_context(|| format!("loading {}", objects.display()))?;
            println!("{}: {} objects OK", objects.display(), catalog.len());
            for (i, r) in catalog.records().iter().enumerate() {
                println!(
                    "  [{i}] {:<12} d={:<5} orbit={}",
                    r.name,
                    r.diameter,
                    if r.orbit_radius > 0.0 && r.orbit_speed != 0.0 { "yes" } else { "no" }
                );
            }
            if let Some(path) = model {
                let model = load_model(Some(&path))?;
                println!("{}: {} parts OK", path.display(), model.parts.len());
            }
        }
        Commands::Params { config } => {
            let config = load_config(config.as_deref())?;
            for (key, value) in config.params.entries() {
                println!("{key} = {value}");
            }
        }
        Commands::Run {
            objects,
            model,
            config,
            frames,
            dt,
            overrides,
            keys,
        } => {
            let catalog = ObjectCatalog::load(&objects)
                .with_context(|| format!("loading {}", objects.display()))?;
            let model = load_model(model.as_deref())?;
            let config = load_config(config.as_deref())?;

            let mut session = Session::build(HeadlessScene::default(), &catalog, &model, config)
                .context("building scene")?;
            for raw in &overrides {
                let (key, value) = raw
                    .split_once('=')
                    .with_context(|| format!("override {raw:?} is not key=value"))?;
                session
                    .set_param(key, ParamValue::parse(value))
                    .with_context(|| format!("applying override {raw:?}"))?;
            }

            let names: Vec<String> = session.registry().iter().map(|o| o.name.clone()).collect();
            session.on_selection(move |ev| {
                let name = names.get(ev.object().0).map(String::as_str).unwrap_or("?");
                println!("selection: {ev} ({name})");
            });

            for frame in 0..frames {
                for k in keys.iter().filter(|k| k.frame == frame) {
                    if session.key_event(&k.key, k.state).is_none() {
                        tracing::warn!(key = %k.key, "unbound key in script");
                    }
                }
                session.frame(dt)?;
            }

            let state = session.glider().state();
            println!(
                "glider: pos=({:.2}, {:.2}, {:.2}) speed={:.2} thrusters={}",
                state.position.x,
                state.position.y,
                state.position.z,
                state.speed,
                if state.thrusters_on { "on" } else { "off" }
            );
            print!(
                "{}",
                DebugTextRenderer::new().render(session.backend(), &session.render_view())
            );
            session.dispose();
        }
    }

    Ok(())
}

fn load_model(path: Option<&Path>) -> anyhow::Result<GliderModel> {
    match path {
        Some(path) => GliderModel::import_gltf(path)
            .with_context(|| format!("importing glider model {}", path.display())),
        None => Ok(GliderModel::default()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_key_parses() {
        let k: ScriptedKey = "12:ArrowUp:down".parse().unwrap();
        assert_eq!(k.frame, 12);
        assert_eq!(k.key, "ArrowUp");
        assert_eq!(k.state, KeyState::Down);
    }

    #[test]
    fn scripted_key_rejects_garbage() {
        assert!("ArrowUp:down".parse::<ScriptedKey>().is_err());
        assert!("x:ArrowUp:down".parse::<ScriptedKey>().is_err());
        assert!("3:ArrowUp:pressed".parse::<ScriptedKey>().is_err());
    }

    #[test]
    fn cli_parses_run_arguments() {
        let cli = Cli::try_parse_from([
            "gliderspace-cli",
            "run",
            "objects.json",
            "--frames",
            "10",
            "--set",
            "gravity=2",
            "--key",
            "0:ArrowUp:down",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                frames,
                overrides,
                keys,
                ..
            } => {
                assert_eq!(frames, 10);
                assert_eq!(overrides, vec!["gravity=2".to_string()]);
                assert_eq!(keys.len(), 1);
            }
            _ => panic!("expected run"),
        }
    }
}
