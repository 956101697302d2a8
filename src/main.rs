//! Binary entrypoint for the blockpuzzle CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and an example level pack
//! - `status` - print every registered store and its persisted value
//! - `console` - operator console: read chat lines from stdin, print broadcast replies
//! - `play [--ticks N]` - run the levels against a simulated world on the tick schedule
//!
//! See the library crate docs for module‑level details: `blockpuzzle::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use blockpuzzle::config::Config;
use blockpuzzle::engine::GameHost;
use blockpuzzle::level::{
    builtin_levels, catalog_from_definitions, load_levels_from_json, BlockPos, LevelFactory,
    SimWorld, TickOutcome, World,
};
use blockpuzzle::logutil::escape_log;
use blockpuzzle::store::{SledProperties, StoreRegistry, StoreType};

#[derive(Parser)]
#[command(name = "blockpuzzle")]
#[command(about = "Puzzle levels over a typed persistent world store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration and an example level pack
    Init,
    /// Show every registered store and its value
    Status,
    /// Operator console on stdin/stdout
    Console,
    /// Play the configured levels in a simulated world
    Play {
        /// Stop after this many ticks (runs until done or Ctrl-C when omitted)
        #[arg(short, long)]
        ticks: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new configuration");
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        let pack = serde_json::to_string_pretty(&builtin_levels())?;
        tokio::fs::write("levels.example.json", pack).await?;
        info!("Example level pack written to levels.example.json");
        return Ok(());
    }

    let config = Config::load(&cli.config).await?;
    init_logging(&Some(config.clone()), cli.verbose);

    match cli.command {
        // Handled before the config exists
        Commands::Init => {}
        Commands::Status => {
            let adapter = SledProperties::open(&config.storage.data_dir)?;
            let mut registry = StoreRegistry::new(adapter);
            registry.register_store(&config.engine.progress_store, StoreType::Number)?;
            println!("{} ({})", config.engine.name, config.storage.data_dir);
            for (desc, value) in registry.snapshot() {
                match value {
                    Some(v) => println!("  {} ({}) = {}", desc.name, desc.declared_type, v),
                    None => println!("  {} ({}) not defined", desc.name, desc.declared_type),
                }
            }
            println!("  {} properties on disk", registry.adapter().len());
        }
        Commands::Console => {
            let mut host = build_host(&config)?;
            info!("Console ready; prefix '{}'", config.engine.effective_prefix());
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                for response in host.on_chat(&line) {
                    println!("{}", response);
                }
                host.world_mut().take_chat();
            }
        }
        Commands::Play { ticks } => {
            let mut host = build_host(&config)?;
            run_play(&mut host, config.engine.tick_interval(), ticks).await?;
        }
    }

    Ok(())
}

fn build_host(config: &Config) -> Result<GameHost<SledProperties, SimWorld>> {
    let adapter = SledProperties::open(&config.storage.data_dir)?;
    let catalog = load_catalog(config)?;
    let mut host = GameHost::from_config(config, adapter, SimWorld::new(), catalog);
    host.boot()?;
    Ok(host)
}

fn load_catalog(config: &Config) -> Result<Vec<LevelFactory>> {
    let defs = match &config.levels.pack {
        Some(path) => {
            let defs = load_levels_from_json(path)
                .map_err(|e| anyhow!("Failed to load level pack {}: {}", path, e))?;
            info!("Loaded {} levels from {}", defs.len(), path);
            defs
        }
        None => builtin_levels(),
    };
    Ok(catalog_from_definitions(defs))
}

/// Player input understood by `play` on top of the console commands:
/// `place <x> <y> <z> <block>` and `walk <x> <y> <z>`.
fn apply_player_input(world: &mut SimWorld, line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let coords = |s: &[&str]| -> Option<BlockPos> {
        Some(BlockPos::new(
            s.first()?.parse().ok()?,
            s.get(1)?.parse().ok()?,
            s.get(2)?.parse().ok()?,
        ))
    };
    match parts.as_slice() {
        ["place", rest @ ..] if rest.len() == 4 => match coords(rest) {
            Some(pos) => {
                world.set_block(pos, rest[3]);
                true
            }
            None => false,
        },
        ["walk", rest @ ..] if rest.len() == 3 => match coords(rest) {
            Some(pos) => {
                world.move_agent(pos);
                true
            }
            None => false,
        },
        _ => false,
    }
}

async fn run_play(
    host: &mut GameHost<SledProperties, SimWorld>,
    interval: std::time::Duration,
    max_ticks: Option<u64>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                match host.on_tick() {
                    TickOutcome::AllComplete => {
                        info!("All levels complete after {} ticks", ticks);
                        for line in host.world_mut().take_chat() {
                            println!("{}", line);
                        }
                        println!("All levels complete!");
                        break;
                    }
                    TickOutcome::Recovered(kind) => info!("Recovered: {:?}", kind),
                    _ => {}
                }
                if max_ticks.map(|m| ticks >= m).unwrap_or(false) {
                    info!("Tick limit {} reached", ticks);
                    break;
                }
            }

            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if !apply_player_input(host.world_mut(), &line) {
                            host.on_chat(&line);
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!("stdin error: {} (input disabled)", escape_log(&e.to_string()));
                        stdin_open = false;
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }

        for line in host.world_mut().take_chat() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let file = config.as_ref().and_then(|c| c.logging.file.clone());
    let security_path = config.as_ref().and_then(|c| c.logging.security_file.clone());
    match file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    }) {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Mirror to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if record.target() == "security" {
                    if let Some(ref sec_path) = security_path {
                        if let Ok(mut sf) = std::fs::OpenOptions::new()
                            .create(true)
                            .append(true)
                            .open(sec_path)
                        {
                            let _ = writeln!(sf, "{}", line);
                        }
                    }
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
