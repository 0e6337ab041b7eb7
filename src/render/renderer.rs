use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Arena, GameOverReason, GameState};
use crate::metrics::GameMetrics;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
/// Terminal columns drawn per arena cell
const CELL_WIDTH: u16 = 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Terminal (columns, rows) needed to show every arena cell
    pub fn required_size(arena: &Arena) -> (u16, u16) {
        let columns = u16::try_from(arena.columns().max(0)).unwrap_or(u16::MAX);
        let rows = u16::try_from(arena.rows().max(0)).unwrap_or(u16::MAX);
        (
            columns.saturating_mul(CELL_WIDTH).saturating_add(2),
            rows.saturating_add(2 + HEADER_HEIGHT + FOOTER_HEIGHT),
        )
    }

    pub fn fits(width: u16, height: u16, arena: &Arena) -> bool {
        let (need_width, need_height) = Self::required_size(arena);
        width >= need_width && height >= need_height
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // Header
                Constraint::Min(0),                // Game area
                Constraint::Length(FOOTER_HEIGHT), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        if state.is_terminal() {
            let panel = centered_rect(40, 9, chunks[1]);
            frame.render_widget(Clear, panel);
            frame.render_widget(self.render_game_over(state), panel);
        } else if Self::fits(frame.area().width, frame.area().height, &state.arena) {
            frame.render_widget(self.render_grid(state), chunks[1]);
        } else {
            let panel = centered_rect(40, 6, chunks[1]);
            frame.render_widget(self.render_too_small(frame.area(), &state.arena), panel);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let arena = state.arena;
        let head = state.snake.head();
        let occupied = state.snake.occupied();
        let mut lines = Vec::with_capacity(arena.rows() as usize);

        for row in 0..arena.rows() {
            let mut spans = Vec::with_capacity(arena.columns() as usize);

            for col in 0..arena.columns() {
                let cell = arena.cell_at(col, row);

                let span = if cell == head {
                    Span::styled(
                        "▣ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if occupied.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(Color::White))
                } else if cell == state.food {
                    Span::styled("■ ", Style::default().fg(Color::Red))
                } else {
                    Span::raw("  ")
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let reason = match state.game_over_reason() {
            Some(GameOverReason::Wall) => "You hit the wall",
            Some(GameOverReason::SelfCollision) => "You ran into yourself",
            Some(GameOverReason::BoardFilled) => "No room left to grow",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Game Over",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_too_small(&self, area: Rect, arena: &Arena) -> Paragraph<'_> {
        let (need_width, need_height) = Self::required_size(arena);
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("need {}x{}", need_width, need_height)),
            Line::from(format!("have {}x{}", area.width, area.height)),
            Line::from(Span::styled("Game paused", Style::default().fg(Color::Gray))),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, GameConfig, GameEngine, GamePhase, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 20, 40, 10));
        assert_eq!(centered_rect(200, 10, area), Rect::new(0, 20, 100, 10));
    }

    #[test]
    fn test_required_size_for_reference_arena() {
        let arena = GameConfig::default().arena();
        assert_eq!(Renderer::required_size(&arena), (130, 49));
        assert!(Renderer::fits(130, 49, &arena));
        assert!(!Renderer::fits(80, 24, &arena));
        assert!(!Renderer::fits(129, 49, &arena));
    }

    #[test]
    fn test_far_corner_is_drawn_when_terminal_fits() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 4);
        let mut state = engine.reset();
        state.snake = Snake::new(vec![
            Cell::new(580, 400),
            Cell::new(590, 400),
            Cell::new(600, 400),
        ]);
        state.food = Cell::new(630, 460);
        let metrics = GameMetrics::new();

        let mut terminal = Terminal::new(TestBackend::new(130, 49)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &state, &metrics))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("▣"));
        assert!(text.contains("■"));
        assert!(!text.contains("Terminal too small"));
    }

    #[test]
    fn test_small_terminal_shows_size_warning() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 4);
        let mut state = engine.reset();
        state.snake = Snake::new(vec![
            Cell::new(580, 400),
            Cell::new(590, 400),
            Cell::new(600, 400),
        ]);
        let metrics = GameMetrics::new();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &state, &metrics))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Terminal too small"));
        assert!(text.contains("need 130x49"));
        assert!(text.contains("have 80x24"));
        assert!(!text.contains("▣"));
    }

    #[test]
    fn test_renders_score_and_game_over() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 9);
        let mut state = engine.reset();
        state.score = 7;
        let metrics = GameMetrics::new();
        let renderer = Renderer::new();

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|frame| renderer.render(frame, &state, &metrics))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Score: 7"));
        assert!(!text.contains("Game Over"));

        state.phase = GamePhase::GameOver(GameOverReason::Wall);
        terminal
            .draw(|frame| renderer.render(frame, &state, &metrics))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Game Over"));
        assert!(text.contains("You hit the wall"));
    }
}
