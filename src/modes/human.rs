use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::game::{GameConfig, GameEngine, GameState, InputEvent, StepOutcome};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    poll_interval: Duration,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.reset();
        let poll_interval = Duration::from_millis(engine.config().poll_interval_ms);

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            poll_interval,
            should_quit: false,
        }
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self::new(GameEngine::new(config))
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One poll per interval; the engine steps every `ticks_per_step` polls
        let mut poll_timer = interval(self.poll_interval);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if let Some(input) = self.input_handler.handle_key_event(key) {
                                self.handle_input(input);
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = poll_timer.tick() => {
                    let size = terminal.size().context("Failed to query terminal size")?;
                    self.poll_visible(size.width, size.height);
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Quit => self.should_quit = true,
            InputEvent::KeyPressed(direction) => self.state.request_direction(direction),
        }
    }

    /// Poll only while the whole arena is on screen; a clipped arena pauses the game
    fn poll_visible(&mut self, width: u16, height: u16) -> Option<StepOutcome> {
        if Renderer::fits(width, height, &self.state.arena) {
            self.poll()
        } else {
            None
        }
    }

    /// One run-loop iteration of simulation work
    fn poll(&mut self) -> Option<StepOutcome> {
        let outcome = self.engine.advance(&mut self.state)?;

        if self.state.is_terminal() {
            self.metrics.on_game_over();
            info!(
                score = self.state.score,
                elapsed = %self.metrics.format_time(),
                "waiting for quit"
            );
        }

        Some(outcome)
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameOverReason};

    fn mode() -> HumanMode {
        HumanMode::new(GameEngine::with_seed(GameConfig::default(), 1))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(!mode.state.is_terminal());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.poll_interval, Duration::from_millis(16));
    }

    #[test]
    fn test_quit_input() {
        let mut mode = mode();
        mode.handle_input(InputEvent::Quit);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_direction_applied_immediately() {
        let mut mode = mode();
        mode.handle_input(InputEvent::KeyPressed(Direction::Left));
        assert_eq!(mode.state.direction, Direction::Right);

        mode.handle_input(InputEvent::KeyPressed(Direction::Down));
        assert_eq!(mode.state.direction, Direction::Down);
    }

    #[test]
    fn test_poll_steps_every_tenth_iteration() {
        let mut mode = mode();
        mode.state.food = Cell::new(600, 400);

        for _ in 0..9 {
            assert_eq!(mode.poll(), None);
        }
        assert_eq!(mode.poll(), Some(StepOutcome::Moved));
        assert_eq!(mode.state.snake.head(), Cell::new(40, 60));
    }

    #[test]
    fn test_small_terminal_pauses_simulation() {
        let mut mode = mode();
        mode.state.food = Cell::new(600, 400);
        let before = mode.state.clone();

        for _ in 0..30 {
            assert_eq!(mode.poll_visible(80, 24), None);
        }
        assert_eq!(mode.state, before);

        for _ in 0..9 {
            assert_eq!(mode.poll_visible(130, 49), None);
        }
        assert_eq!(mode.poll_visible(130, 49), Some(StepOutcome::Moved));
    }

    #[test]
    fn test_game_over_freezes_clock() {
        let mut mode = mode();
        mode.handle_input(InputEvent::KeyPressed(Direction::Up));

        // Head at y = 60 reaches y = 50, then leaves the arena
        let mut last = None;
        for _ in 0..20 {
            last = mode.poll().or(last);
        }

        assert_eq!(last, Some(StepOutcome::Collided(GameOverReason::Wall)));
        assert!(mode.metrics.finished);
        assert!(!mode.should_quit);
    }
}
