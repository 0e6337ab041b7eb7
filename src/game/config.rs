use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::state::{Arena, Cell};

/// Reasons a [`GameConfig`] cannot be played
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),
    #[error("arena {width}x{height} cannot hold a single {cell_size}-unit cell")]
    ArenaTooSmall {
        width: i32,
        height: i32,
        cell_size: i32,
    },
    #[error("ticks per step must be at least 1")]
    ZeroTicksPerStep,
    #[error("starting snake needs at least 3 segments, got {0}")]
    SnakeTooShort(usize),
    #[error("starting segment ({x}, {y}) lies outside the arena or off the grid")]
    SegmentOutOfArena { x: i32, y: i32 },
    #[error("starting segment ({x}, {y}) appears more than once")]
    DuplicateSegment { x: i32, y: i32 },
    #[error("starting segments ({0}, {1}) and ({2}, {3}) are not one cell apart")]
    DisjointSegments(i32, i32, i32, i32),
    #[error("starting snake leaves no free cell for food")]
    NoRoomForFood,
}

/// Configuration for the game
///
/// Loadable from JSON; fields missing from the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playable area, in arena units
    pub width: i32,
    /// Height of the playable area, in arena units
    pub height: i32,
    /// Y coordinate of the top edge of the playable area
    pub top: i32,
    /// Side length of one snake segment
    pub cell_size: i32,
    /// Poll iterations per simulation step
    pub ticks_per_step: u32,
    /// Delay between poll iterations
    pub poll_interval_ms: u64,
    /// Starting snake, tail first
    pub start_snake: Vec<(i32, i32)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 429,
            top: 50,
            cell_size: 10,
            ticks_per_step: 10,
            poll_interval_ms: 16,
            start_snake: vec![(10, 60), (20, 60), (30, 60)],
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom arena size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// A small arena for tests: 10x10 cells
    pub fn small() -> Self {
        Self::new(100, 100)
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn arena(&self) -> Arena {
        Arena {
            width: self.width,
            top: self.top,
            height: self.height,
            cell_size: self.cell_size,
        }
    }

    pub fn start_cells(&self) -> Vec<Cell> {
        self.start_snake
            .iter()
            .map(|&(x, y)| Cell::new(x, y))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if self.width < self.cell_size || self.height < self.cell_size {
            return Err(ConfigError::ArenaTooSmall {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            });
        }
        if self.ticks_per_step == 0 {
            return Err(ConfigError::ZeroTicksPerStep);
        }
        if self.start_snake.len() < 3 {
            return Err(ConfigError::SnakeTooShort(self.start_snake.len()));
        }

        let arena = self.arena();
        for cell in self.start_cells() {
            if !arena.contains(cell) || !arena.is_aligned(cell) {
                return Err(ConfigError::SegmentOutOfArena {
                    x: cell.x,
                    y: cell.y,
                });
            }
        }

        let cells = self.start_cells();
        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(*cell) {
                return Err(ConfigError::DuplicateSegment {
                    x: cell.x,
                    y: cell.y,
                });
            }
        }

        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if (a.x - b.x).abs() + (a.y - b.y).abs() != self.cell_size {
                return Err(ConfigError::DisjointSegments(a.x, a.y, b.x, b.y));
            }
        }

        let has_free_food_cell = (0..arena.food_rows())
            .flat_map(|row| (0..arena.food_columns()).map(move |col| (col, row)))
            .any(|(col, row)| !seen.contains(&arena.cell_at(col, row)));
        if !has_free_food_cell {
            return Err(ConfigError::NoRoomForFood);
        }

        Ok(())
    }
}
