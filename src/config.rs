use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

use crate::TermInt;

/// Startup tunables. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Terminal columns per grid cell
    pub cell_width: TermInt,
    /// Terminal rows per grid cell
    pub cell_height: TermInt,
    /// Minimum time between two accepted moves
    pub move_interval: Duration,
    /// Two taps closer than this toggle pause
    pub double_tap: Duration,
    /// Display refresh period
    pub frame_interval: Duration,
    /// Keep food off the snake's body when placing it
    pub food_avoids_snake: bool,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_width: 2,
            cell_height: 1,
            move_interval: Duration::from_millis(150),
            double_tap: Duration::from_millis(300),
            frame_interval: Duration::from_millis(16),
            food_avoids_snake: false,
            log_file: PathBuf::from("gridsnake.log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Number of grid cells that fit on a surface of the given size
    pub fn grid_for(&self, surface: (TermInt, TermInt)) -> (TermInt, TermInt) {
        (surface.0 / self.cell_width.max(1), surface.1 / self.cell_height.max(1))
    }
}
