use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use gridsnake::config::Config;
use gridsnake::game::SnakeGame;
use gridsnake::term::TermManager;
use gridsnake::TermInt;

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Grid snake for the terminal")]
struct Cli {
    /// Terminal columns per grid cell
    #[arg(long, default_value = "2")]
    cell_width: TermInt,

    /// Terminal rows per grid cell
    #[arg(long, default_value = "1")]
    cell_height: TermInt,

    /// Milliseconds between snake moves
    #[arg(long, default_value = "150")]
    move_interval_ms: u64,

    /// Two clicks closer than this many milliseconds toggle pause
    #[arg(long, default_value = "300")]
    double_tap_ms: u64,

    /// Milliseconds between display refreshes
    #[arg(long, default_value = "16")]
    frame_ms: u64,

    /// Never place food on the snake
    #[arg(long)]
    food_avoids_snake: bool,

    /// Where to write the log
    #[arg(long, default_value = "gridsnake.log")]
    log_file: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            cell_width: cli.cell_width.max(1),
            cell_height: cli.cell_height.max(1),
            move_interval: Duration::from_millis(cli.move_interval_ms),
            double_tap: Duration::from_millis(cli.double_tap_ms),
            frame_interval: Duration::from_millis(cli.frame_ms.max(1)),
            food_avoids_snake: cli.food_avoids_snake,
            log_file: cli.log_file,
            log_level: cli.log_level,
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from(Cli::parse());

    // The terminal is ours while playing, so logs go to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, simplelog::Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("Starting gridsnake with {:?}", config);

    let mut term = TermManager::new()?;
    term.setup()?;

    let mut game = SnakeGame::new(term, &config);
    let result = run(&mut game);

    // Always hand the terminal back, even after an error
    game.into_term().restore()?;
    info!("Exiting");
    result
}

fn run(game: &mut SnakeGame) -> Result<()> {
    if game.show_intro()? {
        game.play()?;
    }
    Ok(())
}
