//! addrmap CLI — memory map annotations for assembly source.

mod commands;
mod config;

use std::io;
use std::path::PathBuf;
use std::process;

use addrmap_core::Space;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{AddrmapConfig, ProviderSource};

#[derive(Parser)]
#[command(name = "addrmap", version, about = "Annotate SNES memory addresses from community memory maps")]
struct Cli {
    /// Configuration file (default: nearest addrmap.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Read maps from a local directory instead of the map service
    #[arg(long, global = true)]
    local: Option<PathBuf>,
    /// Game identifier (e.g., smw, yi)
    #[arg(long, global = true)]
    game: Option<String>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the address token under a cursor
    Hover {
        /// Source line
        line: String,
        /// Character column of the cursor (default: first `$` or `!`)
        #[arg(long)]
        cursor: Option<usize>,
    },
    /// Search one address space for an address
    Lookup {
        /// Hex address, with or without `$`
        address: String,
        /// Address space (ram, rom, register)
        #[arg(long, default_value = "ram")]
        space: Space,
    },
    /// Show map counts, or the ranges of one map
    Dump {
        /// Map to list (ram, rom, regs, hijack)
        #[arg(long)]
        map: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer line-delimited JSON requests on stdin
    Serve,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = AddrmapConfig::resolve(cli.config.as_deref(), &cwd)?;
    if let Some(dir) = cli.local {
        config.provider.source = ProviderSource::Local;
        config.provider.dir = Some(dir);
    }
    if let Some(game) = cli.game {
        config.provider.game = game;
    }

    let provider = commands::build_provider(&config)?;
    let service = commands::build_service(&config, provider.as_ref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Hover { line, cursor } => commands::hover::run(&service, &line, cursor, &mut stdout),
        Commands::Lookup { address, space } => {
            commands::lookup::run(&service, &address, space, &mut stdout)
        }
        Commands::Dump { map, json } => {
            let map = map.as_deref().map(commands::dump::parse_map).transpose()?;
            commands::dump::run(service.repository(), map, json, &mut stdout)
        }
        Commands::Serve => commands::serve::run(&service, io::stdin().lock(), &mut stdout),
    }
}
