use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::time::Instant;

use super::particles::ParticleSystem;
use crate::game::{Cell, Direction, GameController, GameState, Grid, Rgb};
use crate::highscore::HighScoreStore;
use crate::metrics::GameMetrics;

/// Segments drawn bold while swelling past this size
const GLOW_THRESHOLD: f32 = 1.1;
/// Particles dimmed below this opacity
const FADE_ALPHA: u8 = 80;
const TITLE: &str = "ULTRA SNAKE";

/// Everything the renderer draws besides the game itself
pub struct Overlay<'a> {
    pub particles: &'a ParticleSystem,
    pub metrics: &'a GameMetrics,
    /// Problem to show in the footer, such as a failed high-score save
    pub status: Option<&'a str>,
}

pub struct Renderer {
    started: Instant,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn render<S: HighScoreStore>(
        &self,
        frame: &mut Frame,
        game: &GameController<S>,
        overlay: &Overlay<'_>,
    ) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Score panel
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_score_panel(game, overlay.metrics), chunks[0]);

        match game.state() {
            GameState::Menu => {
                frame.render_widget(self.render_menu(game.high_score()), chunks[1]);
            }
            GameState::Playing => self.render_board(frame, game, overlay.particles, chunks[1]),
            GameState::Paused => {
                self.render_board(frame, game, overlay.particles, chunks[1]);
                let popup = centered_rect(34, 7, chunks[1]);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_pause(), popup);
            }
            GameState::GameOver => {
                self.render_board(frame, game, overlay.particles, chunks[1]);
                let popup = centered_rect(34, 10, chunks[1]);
                frame.render_widget(Clear, popup);
                frame.render_widget(
                    self.render_game_over(game.score(), game.high_score()),
                    popup,
                );
            }
        }

        frame.render_widget(self.render_footer(game.state(), overlay.status), chunks[2]);
    }

    fn render_board<S: HighScoreStore>(
        &self,
        frame: &mut Frame,
        game: &GameController<S>,
        particles: &ParticleSystem,
        area: Rect,
    ) {
        let (board_width, board_height) = board_size(game.grid());
        if board_width > area.width || board_height > area.height {
            frame.render_widget(self.render_too_small(board_width, board_height, area), area);
            return;
        }

        let board_area = centered_rect(board_width, board_height, area);
        frame.render_widget(self.render_grid(game, particles), board_area);
    }

    fn render_grid<S: HighScoreStore>(
        &self,
        game: &GameController<S>,
        particles: &ParticleSystem,
    ) -> Paragraph<'static> {
        let grid = game.grid();
        let width = grid.width;
        let mut cells: Vec<Span<'static>> = grid.cells().map(background_cell).collect();
        let index = |cell: Cell| -> Option<usize> {
            grid.contains(cell)
                .then(|| cell.y as usize * width + cell.x as usize)
        };

        // Food, pulsing with the shimmer
        let food = game.food();
        if let Some(i) = index(food.position()) {
            let style = if food.shimmer_offset() > 0.0 {
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Red)
            };
            cells[i] = Span::styled("● ", style);
        }

        // Snake, tail first so the head ends up on top
        let snake = game.snake();
        for (n, segment) in snake.segments().iter().enumerate().rev() {
            let Some(i) = index(segment.cell) else {
                continue;
            };
            let glowing = snake.segment_emphasis(n) > GLOW_THRESHOLD;
            cells[i] = if n == 0 {
                let style = Style::default()
                    .fg(if glowing { Color::LightCyan } else { Color::Cyan })
                    .add_modifier(Modifier::BOLD);
                Span::styled(head_glyph(snake.direction()), style)
            } else if glowing {
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("■ ", Style::default().fg(Color::Green))
            };
        }

        for particle in particles.particles() {
            let Some(i) = index(particle.cell(grid)) else {
                continue;
            };
            let mut style = Style::default().fg(to_color(particle.color));
            if particle.alpha() < FADE_ALPHA {
                style = style.add_modifier(Modifier::DIM);
            }
            let glyph = if particle.radius > 3 { "* " } else { "· " };
            cells[i] = Span::styled(glyph, style);
        }

        let lines: Vec<Line<'static>> = cells
            .chunks(width.max(1))
            .map(|row| Line::from(row.to_vec()))
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    /// Shown instead of a board that would be clipped
    fn render_too_small(
        &self,
        board_width: u16,
        board_height: u16,
        area: Rect,
    ) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "Board needs {board_width}x{board_height}, have {}x{}",
                area.width, area.height
            )),
            Line::from("Resize the terminal or pick a smaller grid"),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_score_panel<S: HighScoreStore>(
        &self,
        game: &GameController<S>,
        metrics: &GameMetrics,
    ) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                game.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(to_color(Rgb::GOLD))),
            Span::styled(
                game.high_score().to_string(),
                Style::default()
                    .fg(to_color(Rgb::GOLD))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_round.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_menu(&self, high_score: u32) -> Paragraph<'static> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(self.orbiting_snake());
        lines.extend([
            Line::from(""),
            Line::from(Span::styled(
                format!("High Score: {high_score}"),
                Style::default().fg(to_color(Rgb::GOLD)),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "ENTER",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    /// Five segments circling an ellipse, head first
    fn orbiting_snake(&self) -> Vec<Line<'static>> {
        const WIDTH: usize = 41;
        const HEIGHT: usize = 9;
        let t = self.started.elapsed().as_secs_f32();
        let mut canvas = vec![vec![' '; WIDTH]; HEIGHT];

        for i in (0..5).rev() {
            let angle = t + i as f32 / 2.0;
            let x = (WIDTH as f32 / 2.0 + angle.cos() * 16.0).round() as usize;
            let y = (HEIGHT as f32 / 2.0 + angle.sin() * 3.5).round() as usize;
            if let Some(slot) = canvas.get_mut(y).and_then(|row| row.get_mut(x)) {
                *slot = if i == 0 { '◆' } else { '■' };
            }
        }

        canvas
            .into_iter()
            .map(|row| {
                Line::from(Span::styled(
                    row.into_iter().collect::<String>(),
                    Style::default().fg(Color::Green),
                ))
            })
            .collect()
    }

    fn render_pause(&self) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press SPACE to Resume"),
            Line::from("Press Q for Main Menu"),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, score: u32, high_score: u32) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(to_color(Rgb::GOLD))),
                Span::styled(
                    high_score.to_string(),
                    Style::default()
                        .fg(to_color(Rgb::GOLD))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
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

    fn render_footer(&self, state: GameState, status: Option<&str>) -> Paragraph<'static> {
        let controls = match state {
            GameState::Menu => "ENTER/SPACE start | ESC exit",
            GameState::Playing => "↑↓←→ or WASD move | P pause | ESC exit",
            GameState::Paused => "SPACE/P resume | Q main menu",
            GameState::GameOver => "R restart | Q quit",
        };

        let mut lines = vec![Line::from(Span::styled(
            controls,
            Style::default().fg(Color::Cyan),
        ))];
        if let Some(status) = status {
            lines.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn background_cell(cell: Cell) -> Span<'static> {
    // Every fifth row and column is a little brighter
    if cell.x % 5 == 0 || cell.y % 5 == 0 {
        Span::styled("· ", Style::default().fg(Color::Gray))
    } else {
        Span::styled("· ", Style::default().fg(Color::DarkGray))
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
}

/// Terminal cells taken by the bordered board, two columns per grid cell
fn board_size(grid: &Grid) -> (u16, u16) {
    let width = u16::try_from(grid.width).unwrap_or(u16::MAX);
    let height = u16::try_from(grid.height).unwrap_or(u16::MAX);
    (
        width.saturating_mul(2).saturating_add(2),
        height.saturating_add(2),
    )
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Intent};
    use crate::highscore::MemoryHighScoreStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(game: &GameController<MemoryHighScoreStore>, status: Option<&str>) -> String {
        draw_sized(game, status, &GameMetrics::new(), 100, 40)
    }

    fn draw_sized(
        game: &GameController<MemoryHighScoreStore>,
        status: Option<&str>,
        metrics: &GameMetrics,
        width: u16,
        height: u16,
    ) -> String {
        let config = game.config().clone();
        let particles = ParticleSystem::new(&config);
        let renderer = Renderer::new();

        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                renderer.render(
                    frame,
                    game,
                    &Overlay {
                        particles: &particles,
                        metrics,
                        status,
                    },
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn game() -> GameController<MemoryHighScoreStore> {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::new(20, 15)
        };
        GameController::new(config, MemoryHighScoreStore::with_score(70))
    }

    #[test]
    fn test_menu_screen() {
        let screen = draw(&game(), None);
        assert!(screen.contains(TITLE));
        assert!(screen.contains("High Score: 70"));
        assert!(screen.contains("to start"));
    }

    #[test]
    fn test_playing_screen_shows_snake_and_food() {
        let mut game = game();
        game.handle_intent(Intent::Start);
        let screen = draw(&game, Some("Could not save high score"));

        assert!(screen.contains("▶"));
        assert!(screen.contains("●"));
        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Could not save high score"));
    }

    #[test]
    fn test_pause_and_game_over_panels() {
        let mut game = game();
        game.handle_intent(Intent::Start);
        game.handle_intent(Intent::PauseToggle);
        assert!(draw(&game, None).contains("PAUSED"));

        game.handle_intent(Intent::PauseToggle);
        game.handle_intent(Intent::MoveUp);
        for _ in 0..20 {
            game.update(std::time::Duration::from_millis(70));
        }
        assert_eq!(game.state(), GameState::GameOver);
        let screen = draw(&game, None);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("to restart"));
    }

    #[test]
    fn test_board_larger_than_terminal() {
        let mut game = GameController::new(GameConfig::default(), MemoryHighScoreStore::new());
        game.handle_intent(Intent::Start);
        game.handle_intent(Intent::MoveDown);
        for _ in 0..8 {
            game.update(std::time::Duration::from_millis(70));
        }
        assert_eq!(game.state(), GameState::Playing);

        let screen = draw_sized(&game, None, &GameMetrics::new(), 80, 24);
        assert!(screen.contains("Terminal too small"));
        assert!(screen.contains("Board needs 82x32"));
        assert!(!screen.contains("▼"));

        let screen = draw_sized(&game, None, &GameMetrics::new(), 100, 40);
        assert!(screen.contains("▼"));
        assert!(!screen.contains("Terminal too small"));
    }

    #[test]
    fn test_oversized_grid_does_not_overflow() {
        let mut game = GameController::new(GameConfig::new(33000, 1), MemoryHighScoreStore::new());
        game.handle_intent(Intent::Start);
        assert_eq!(board_size(game.grid()), (u16::MAX, 3));

        let screen = draw(&game, None);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_score_panel_shows_session_stats() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(40);
        metrics.on_game_over(20);

        let screen = draw_sized(&game(), None, &metrics, 100, 40);
        assert!(screen.contains("Games: 2"));
        assert!(screen.contains("Best: 40"));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 50, area), area);
    }
}
