use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Flow, GameController, GameEvent, GameState};
use crate::highscore::HighScoreStore;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Overlay, ParticleSystem, Renderer};

/// Frame cadence; the simulation runs at its own speed inside it
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode<S: HighScoreStore> {
    game: GameController<S>,
    particles: ParticleSystem,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    status: Option<String>,
}

impl<S: HighScoreStore> HumanMode<S> {
    pub fn new(game: GameController<S>) -> Self {
        let particles = ParticleSystem::new(game.config());

        Self {
            game,
            particles,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            status: None,
        }
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

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = Instant::now();

        tracing::info!(
            width = self.game.grid().width,
            height = self.game.grid().height,
            high_score = self.game.high_score(),
            "Game started"
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Advance the simulation and draw
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    self.advance(now - last_frame);
                    last_frame = now;

                    let overlay = Overlay {
                        particles: &self.particles,
                        metrics: &self.metrics,
                        status: self.status.as_deref(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.game, &overlay);
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

        tracing::info!(
            games_played = self.metrics.games_played,
            high_score = self.game.high_score(),
            "Game closed"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Intent(intent) => {
                    let before = self.game.state();
                    if self.game.handle_intent(intent) == Flow::Exit {
                        self.should_quit = true;
                    }
                    let after = self.game.state();

                    if after == GameState::Playing
                        && matches!(before, GameState::Menu | GameState::GameOver)
                    {
                        self.metrics.on_game_start();
                    }
                    self.process_game_events();
                }
                KeyAction::Exit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    /// One frame: simulation, metrics, effects
    fn advance(&mut self, elapsed: Duration) {
        let before = self.game.state();
        self.game.update(elapsed);
        self.metrics.update(before, elapsed);

        if before == GameState::Playing && self.game.state() == GameState::GameOver {
            self.metrics.on_game_over(self.game.score());
        }

        self.particles.update();
        self.process_game_events();
    }

    fn process_game_events(&mut self) {
        for event in self.game.drain_events() {
            self.particles.handle_event(&event, self.game.grid());

            if let GameEvent::HighScoreSaveFailed { score, reason } = event {
                self.status = Some(format!("High score {score} kept in memory only: {reason}"));
            }
        }
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
    use crate::game::GameConfig;
    use crate::highscore::MemoryHighScoreStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode<MemoryHighScoreStore> {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::small()
        };
        HumanMode::new(GameController::new(config, MemoryHighScoreStore::new()))
    }

    fn play_until_crash(mode: &mut HumanMode<MemoryHighScoreStore>) {
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Up));
        for _ in 0..50 {
            mode.advance(Duration::from_millis(70));
            if mode.game.state() == GameState::GameOver {
                return;
            }
        }
        panic!("snake never crashed");
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.game.state(), GameState::Menu);
        assert_eq!(mode.game.score(), 0);
        assert!(mode.particles.is_empty());
    }

    #[test]
    fn test_crash_spawns_particles_and_counts_game() {
        let mut mode = mode();
        play_until_crash(&mut mode);

        assert!(!mode.particles.is_empty());
        assert_eq!(mode.metrics.games_played, 1);
        assert!(mode.metrics.play_time > Duration::ZERO);
    }

    #[test]
    fn test_restart_clears_effects() {
        let mut mode = mode();
        play_until_crash(&mut mode);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.game.state(), GameState::Playing);
        assert!(mode.particles.is_empty());
        assert_eq!(mode.metrics.play_time, Duration::ZERO);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_quit_after_game_over() {
        let mut mode = mode();
        play_until_crash(&mut mode);

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_escape_exits_from_menu() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(!mode.should_quit);

        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }
}
