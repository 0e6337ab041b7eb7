use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    food::place_food,
    state::{Cell, GameOverReason, GamePhase, GameState, Snake},
};

/// What a single simulation step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The game was already over; nothing changed
    Idle,
    /// The snake slid forward one cell
    Moved,
    /// The snake ate and grew. `board_filled` is set when no cell was left
    /// for the next food item, which ends the game.
    Ate { board_filled: bool },
    /// The snake hit a wall or itself and the game ended
    Collided(GameOverReason),
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let arena = self.config.arena();
        let snake = Snake::new(self.config.start_cells());

        info!(
            width = arena.width,
            height = arena.height,
            top = arena.top,
            cell_size = arena.cell_size,
            "new game"
        );

        match place_food(&mut self.rng, &arena, &snake.occupied()) {
            Some(food) => GameState::new(snake, food, Direction::Right, arena),
            None => {
                // Unplayable: the start snake already covers every food cell.
                // The game opens over, so no food is ever live on the body.
                info!("no free cell for food at start");
                let head = snake.head();
                let mut state = GameState::new(snake, head, Direction::Right, arena);
                state.phase = GamePhase::GameOver(GameOverReason::BoardFilled);
                state
            }
        }
    }

    /// Count one poll iteration and run a step every `ticks_per_step` polls.
    ///
    /// This is a fixed step: it counts calls and ignores wall-clock time.
    pub fn advance(&mut self, state: &mut GameState) -> Option<StepOutcome> {
        if state.is_terminal() {
            return None;
        }

        state.tick_accumulator += 1;
        if state.tick_accumulator < self.config.ticks_per_step {
            return None;
        }

        state.tick_accumulator = 0;
        Some(self.step(state))
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepOutcome {
        if state.is_terminal() {
            return StepOutcome::Idle;
        }

        let new_head = state.next_head();

        if let Some(reason) = Self::check_collision(state, new_head) {
            state.phase = GamePhase::GameOver(reason);
            info!(score = state.score, steps = state.steps, ?reason, "game over");
            return StepOutcome::Collided(reason);
        }

        state.steps += 1;

        if new_head != state.food {
            state.snake.advance(new_head, false);
            return StepOutcome::Moved;
        }

        state.score += 1;
        state.snake.advance(new_head, true);
        debug!(score = state.score, length = state.snake.len(), "food eaten");

        match place_food(&mut self.rng, &state.arena, &state.snake.occupied()) {
            Some(food) => {
                state.food = food;
                StepOutcome::Ate {
                    board_filled: false,
                }
            }
            None => {
                state.phase = GamePhase::GameOver(GameOverReason::BoardFilled);
                info!(score = state.score, steps = state.steps, "board filled");
                StepOutcome::Ate { board_filled: true }
            }
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(state: &GameState, pos: Cell) -> Option<GameOverReason> {
        if !state.arena.contains(pos) {
            return Some(GameOverReason::Wall);
        }

        if state.snake.collides_with_body(pos) {
            return Some(GameOverReason::SelfCollision);
        }

        None
    }
}
