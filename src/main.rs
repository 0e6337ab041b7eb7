use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use term_snake::game::{GameConfig, GameEngine};
use term_snake::logging;
use term_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON game configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena width in arena units [default: 640]
    #[arg(long)]
    width: Option<i32>,

    /// Arena height in arena units [default: 429]
    #[arg(long)]
    height: Option<i32>,

    /// Y coordinate of the arena's top edge [default: 50]
    #[arg(long)]
    top: Option<i32>,

    /// Side length of one snake segment [default: 10]
    #[arg(long)]
    cell_size: Option<i32>,

    /// Poll iterations per simulation step [default: 10]
    #[arg(long)]
    ticks_per_step: Option<u32>,

    /// Milliseconds between poll iterations [default: 16]
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                GameConfig::from_json(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(top) = self.top {
            config.top = top;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(ticks) = self.ticks_per_step {
            config.ticks_per_step = ticks;
        }
        if let Some(poll) = self.poll_interval_ms {
            config.poll_interval_ms = poll;
        }

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    config.validate().context("Invalid game configuration")?;

    let mut human_mode = match cli.seed {
        Some(seed) => HumanMode::new(GameEngine::with_seed(config, seed)),
        None => HumanMode::from_config(config),
    };
    human_mode.run().await?;

    Ok(())
}
