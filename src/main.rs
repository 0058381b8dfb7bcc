use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use ultra_snake::audio::TerminalBell;
use ultra_snake::game::{GameConfig, GameController};
use ultra_snake::highscore::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
use ultra_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "ultra_snake")]
#[command(version, about = "Arcade Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Cell edge in pixels, used for particle physics
    #[arg(long)]
    cell_size: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "highscore.txt")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Do not ring the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    // The terminal belongs to the game, so logs only ever go to the file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ultra_snake=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryHighScoreStore::new())
    } else {
        Box::new(FileHighScoreStore::new(&cli.high_score_file))
    };

    let mut game = GameController::new(config, store);
    if !cli.mute {
        game = game.with_audio(Box::new(TerminalBell::new(true)));
    }

    let mut human_mode = HumanMode::new(game);
    human_mode.run().await?;

    Ok(())
}
