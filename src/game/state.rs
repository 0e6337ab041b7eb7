use std::collections::HashSet;

use super::action::{Direction, request_direction};

/// A grid-aligned position in arena units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell of `cell_size` in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }
}

/// The playable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub top: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Arena {
    /// x in [0, width), y in [top, top + height)
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.width
            && cell.y >= self.top
            && cell.y < self.top + self.height
    }

    pub fn is_aligned(&self, cell: Cell) -> bool {
        cell.x.rem_euclid(self.cell_size) == 0
            && (cell.y - self.top).rem_euclid(self.cell_size) == 0
    }

    /// Columns a segment can occupy
    pub fn columns(&self) -> i32 {
        (self.width + self.cell_size - 1) / self.cell_size
    }

    /// Rows a segment can occupy, including a partially visible bottom row
    pub fn rows(&self) -> i32 {
        (self.height + self.cell_size - 1) / self.cell_size
    }

    /// Columns whose cells lie fully inside the arena
    pub fn food_columns(&self) -> i32 {
        self.width / self.cell_size
    }

    /// Rows whose cells lie fully inside the arena
    pub fn food_rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Arena cell at grid column `col`, row `row`
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.cell_size, self.top + row * self.cell_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, tail first, head last
    body: Vec<Cell>,
}

impl Snake {
    /// Build a snake from segments ordered tail first
    pub fn new(body: Vec<Cell>) -> Self {
        assert!(!body.is_empty(), "snake needs at least one segment");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Get the tail position
    pub fn tail(&self) -> Cell {
        self.body[0]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    /// Segments behind the head, tail first
    pub fn body_segments(&self) -> &[Cell] {
        &self.body[..self.body.len() - 1]
    }

    /// Check if position collides with the snake body (excluding head).
    ///
    /// The tail counts even though a plain move is about to vacate it.
    pub fn collides_with_body(&self, pos: Cell) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn contains(&self, pos: Cell) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push(new_head);
        if !grow {
            self.body.remove(0);
        }
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell was left for food
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver(GameOverReason),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Cell,
    pub direction: Direction,
    pub arena: Arena,
    pub score: u32,
    pub steps: u32,
    pub phase: GamePhase,
    /// Poll iterations since the last simulation step
    pub tick_accumulator: u32,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Cell, direction: Direction, arena: Arena) -> Self {
        Self {
            snake,
            food,
            direction,
            arena,
            score: 0,
            steps: 0,
            phase: GamePhase::Running,
            tick_accumulator: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self.phase {
            GamePhase::Running => None,
            GamePhase::GameOver(reason) => Some(reason),
        }
    }

    /// Apply a direction change from input. Reversals and requests after
    /// game over are ignored.
    pub fn request_direction(&mut self, requested: Direction) {
        if !self.is_terminal() {
            self.direction = request_direction(self.direction, requested);
        }
    }

    /// Where the head lands on the next step
    pub fn next_head(&self) -> Cell {
        self.snake
            .head()
            .stepped(self.direction, self.arena.cell_size)
    }
}
