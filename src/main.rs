//! placekit - item catalog and quick-access bar for a 3D authoring sandbox
//!
//! Console host: wires the filesystem catalog service, an in-memory scene
//! and file-backed slot storage into a catalog session.

mod command_script;
mod commands;
mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use command_script::CommandScriptPlayer;
use commands::{parse_command, Console};
use config::{PlacekitConfig, DEFAULT_CONFIG_PATH};
use placekit_catalog::{CatalogAggregator, CatalogService, FsCatalogService};
use placekit_hotbar::{FileStore, QuickAccessStore};
use placekit_input::Keymap;
use placekit_scene::{MemoryScene, SceneBridge, SceneRegistry};
use placekit_session::CatalogSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Item catalog and quick-access bar console", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Library directory; overrides the configuration file
    #[arg(long)]
    library: Option<PathBuf>,

    /// Storage directory for quick-access slots; overrides the configuration file
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Run without the disk-backed catalog service (scene registry only)
    #[arg(long)]
    no_disk_service: bool,

    /// Run commands from a JSON script instead of standard input
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the effective configuration to --config and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // WARN by default; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting placekit v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut cfg = PlacekitConfig::load_from_path(&args.config);
    if let Some(library) = args.library.clone() {
        cfg.library_dir = library;
    }
    if let Some(storage) = args.storage.clone() {
        cfg.storage_dir = storage;
    }
    if args.no_disk_service {
        cfg.disk_service = false;
    }

    if args.init_config {
        cfg.save_to_path(&args.config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    let mut console = Console::new(build_session(&cfg));
    println!("{}", console.execute(commands::ConsoleCommand::Load).await.lines.join("\n"));

    let result = match &args.script {
        Some(path) => run_script(&mut console, CommandScriptPlayer::from_path(path)?).await,
        None => run_repl(&mut console).await,
    };
    info!(placed = console.session().placed().len(), "session finished");
    result
}

fn build_session(cfg: &PlacekitConfig) -> CatalogSession {
    let scene = Arc::new(MemoryScene::new());
    let registry: Arc<dyn SceneRegistry> = scene.clone();
    let bridge: Arc<dyn SceneBridge> = scene;

    let service = cfg.disk_service.then(|| {
        info!(library = %cfg.library_dir.display(), "using filesystem catalog service");
        Arc::new(FsCatalogService::new(&cfg.library_dir)) as Arc<dyn CatalogService>
    });
    let aggregator =
        CatalogAggregator::new(service, registry).with_scene_supplement(cfg.scene_supplement);

    let hotbar = QuickAccessStore::open(Box::new(FileStore::new(&cfg.storage_dir)));
    let keymap = Keymap::from_overrides(&cfg.bindings);

    CatalogSession::new(aggregator, bridge, hotbar, keymap)
}

async fn run_script(console: &mut Console, mut script: CommandScriptPlayer) -> Result<()> {
    let mut failures = 0usize;
    while let Some(step) = script.next_step() {
        println!("> {}", step.command);
        let lines = match parse_command(&step.command) {
            Ok(cmd) => console.execute(cmd).await.lines,
            Err(err) => vec![format!("Error: {err}")],
        };
        for line in &lines {
            println!("{line}");
        }
        if !step.check(&lines) {
            failures += 1;
            warn!(
                command = %step.command,
                expected = step.expect.as_deref().unwrap_or_default(),
                "script expectation not met"
            );
        }
    }

    if failures > 0 {
        bail!("{failures} script expectation(s) not met");
    }
    Ok(())
}

async fn run_repl(console: &mut Console) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }
        match parse_command(line) {
            Ok(cmd) => {
                for out in console.execute(cmd).await.lines {
                    println!("{out}");
                }
            }
            Err(err) => println!("Error: {err}"),
        }
    }
    Ok(())
}
