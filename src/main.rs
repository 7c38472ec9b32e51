use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mapsketch::{init_logging, load_script, replay, Config, MapSession, BUILD_DATE, VERSION};

#[derive(Parser)]
#[command(name = "mapsketch")]
#[command(about = "Headless map drawing and measurement", long_about = None)]
struct Cli {
    /// Config file (JSON or TOML); defaults to the platform config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script of editor actions and export the result
    Replay {
        /// JSON script to replay
        script: PathBuf,

        /// Directory the GeoJSON export is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_log)?;
    tracing::debug!("mapsketch {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(cli.config)?;
    match cli.command {
        Commands::Replay { script, out } => cmd_replay(&config, &script, &out),
        Commands::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let path = Config::default_path()?;
            Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
    }
}

/// Command: mapsketch replay <script> [--out <dir>]
fn cmd_replay(config: &Config, script: &std::path::Path, out: &std::path::Path) -> Result<()> {
    let actions = load_script(script)?;
    let mut map = MapSession::new(config)?;

    let report = replay(&mut map, &actions, Some(out));
    let failed = report.iter().filter(|step| !step.is_ok()).count();

    std::fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;
    let path = map.export_to_dir(out)?;
    println!(
        "{} actions replayed ({} failed), {} features written to {}",
        report.len(),
        failed,
        map.features().len(),
        path.display()
    );
    for row in map.features().summary() {
        println!("  {}", row);
    }
    Ok(())
}

/// Command: mapsketch config
fn cmd_config(config: &Config) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
