#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted input against the navigation core.

mod script;
mod terminal;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use isonav_core::NavigationConfig;
use isonav_rendering::{Color, Presentation, RenderingBackend, Scene, SceneOptions};
use isonav_system_navigation::PlayerNavigator;
use isonav_world::{query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{script::parse_script, terminal::TerminalBackend};

const CLEAR_COLOR: u32 = 0x33_33_33;

/// Replays scripted input against an isometric multi-floor map.
#[derive(Debug, Parser)]
#[command(name = "isonav", version, long_about = None)]
struct Cli {
    /// JSON map document to load instead of the built-in demo building.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// JSON navigation configuration; omitted fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Frames to replay, e.g. "d*10 wd e @400,300".
    #[arg(long, default_value = "")]
    script: String,

    /// Stop after this many frames even if the script is longer.
    #[arg(long)]
    frames: Option<usize>,

    /// Print every frame as ASCII art.
    #[arg(long)]
    show_frames: bool,

    /// Print the loaded map as a JSON document and exit.
    #[arg(long)]
    dump_map: bool,
}

/// Entry point for the isonav command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let mut world = load_world(cli.map.as_deref())?;

    if cli.dump_map {
        let json = world
            .to_document()
            .to_json()
            .context("failed to serialize the map document")?;
        println!("{json}");
        return Ok(());
    }

    let mut frames = parse_script(&cli.script).context("failed to parse the input script")?;
    if let Some(limit) = cli.frames {
        frames.truncate(limit);
    }

    let options = SceneOptions::default();
    let mut navigator = PlayerNavigator::spawn(&mut world, &config);
    info!(
        x = navigator.state().position.x,
        y = navigator.state().position.y,
        floor = navigator.state().position.floor.get(),
        floors = query::floor_count(&world),
        "player spawned"
    );

    let scene = Scene::capture(&world, &navigator.state(), config.geometry, options);
    let presentation = Presentation::new("isonav", Color::from_hex(CLEAR_COLOR), scene);
    let backend = TerminalBackend::new(io::stdout().lock(), frames, cli.show_frames);

    let mut events = Vec::new();
    backend.run(presentation, |input, scene| {
        if let Some(pointer) = input.pointer {
            match scene.pick_tile(&world, pointer) {
                Some(tile) => info!(column = tile.column(), row = tile.row(), "tile picked"),
                None => info!(x = pointer.x, y = pointer.y, "pointer outside the map"),
            }
        }

        events.clear();
        let _ = navigator.step_held(&mut world, input.keys, &mut events);
        *scene = Scene::capture(&world, &navigator.state(), config.geometry, options);
        true
    })?;

    let state = navigator.state();
    println!(
        "player at ({:.2}, {:.2}) on floor {} facing {:?}, {:?}, cooldown {}",
        state.position.x,
        state.position.y,
        state.position.floor.get(),
        state.facing,
        navigator.movement(),
        state.interaction_cooldown
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<NavigationConfig> {
    let Some(path) = path else {
        return Ok(NavigationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let config: NavigationConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse configuration {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration {}", path.display()))?;
    Ok(config)
}

fn load_world(path: Option<&Path>) -> Result<World> {
    let Some(path) = path else {
        return World::demo().context("failed to build the demo building");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    World::from_json(&text).with_context(|| format!("failed to load map {}", path.display()))
}
