use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::time::Duration;

use super::{
    action::Intent,
    config::GameConfig,
    event::{GameEvent, Rgb},
    food::Food,
    grid::{Cell, Grid},
    snake::{Snake, SnakeTuning},
    state::{GameSession, GameState},
};
use crate::audio::AudioSink;
use crate::highscore::HighScoreStore;

/// Whether the main loop should keep running after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the game state machine and drives the simulation.
///
/// The presentation layer feeds it intents and elapsed frame time, and reads
/// back state and [`GameEvent`]s to draw.
pub struct GameController<S: HighScoreStore> {
    config: GameConfig,
    grid: Grid,
    state: GameState,
    session: GameSession,
    store: S,
    audio: Option<Box<dyn AudioSink>>,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl<S: HighScoreStore> GameController<S> {
    /// Create a controller sitting on the menu, with the best score read
    /// from `store`
    pub fn new(config: GameConfig, store: S) -> Self {
        let grid = config.grid();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let high_score = store.load();
        let session = GameSession::new(&grid, SnakeTuning::from(&config), high_score, &mut rng);

        Self {
            config,
            grid,
            state: GameState::Menu,
            session,
            store,
            audio: None,
            rng,
            events: Vec::new(),
        }
    }

    /// Attach a sound sink
    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Apply a player intent. Intents the current state does not know are
    /// ignored.
    pub fn handle_intent(&mut self, intent: Intent) -> Flow {
        match (self.state, intent) {
            (GameState::Menu, Intent::Start | Intent::ResumeOrStart) => {
                self.session.accumulator = Duration::ZERO;
                self.transition(GameState::Playing);
            }
            (GameState::Playing, Intent::PauseToggle) => {
                self.transition(GameState::Paused);
            }
            (GameState::Playing, intent) => {
                if let Some(direction) = intent.direction() {
                    self.session.snake.change_direction(direction);
                }
            }
            (GameState::Paused, Intent::PauseToggle | Intent::ResumeOrStart) => {
                self.transition(GameState::Playing);
            }
            (GameState::Paused, Intent::Quit) => {
                let high_score = self.session.snake.high_score();
                self.session = GameSession::new(
                    &self.grid,
                    SnakeTuning::from(&self.config),
                    high_score,
                    &mut self.rng,
                );
                self.events.push(GameEvent::EffectsCleared);
                self.transition(GameState::Menu);
            }
            (GameState::GameOver, Intent::Restart) => {
                self.session.reset(&self.grid, &mut self.rng);
                self.events.push(GameEvent::EffectsCleared);
                self.transition(GameState::Playing);
            }
            (GameState::GameOver, Intent::Quit) => {
                tracing::debug!("Quit from game over");
                return Flow::Exit;
            }
            _ => {}
        }

        Flow::Continue
    }

    /// Advance by one frame's worth of wall-clock time.
    ///
    /// Runs as many simulation ticks as the accumulated time pays for, up to
    /// `max_catch_up_steps`; time owed beyond that is dropped. Returns the
    /// number of ticks taken.
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        if self.state != GameState::Playing {
            return 0;
        }

        self.session.food.update_shimmer();
        self.session.accumulator += elapsed;

        let mut steps = 0;
        while self.state == GameState::Playing {
            let interval = self.session.snake.step_interval();
            if self.session.accumulator <= interval {
                break;
            }
            if steps == self.config.max_catch_up_steps {
                tracing::debug!(
                    dropped = ?self.session.accumulator,
                    "Simulation fell behind, dropping owed time"
                );
                self.session.accumulator = Duration::ZERO;
                break;
            }

            self.session.accumulator -= interval;
            self.tick();
            steps += 1;
        }

        steps
    }

    /// One simulation step: move, then collisions, then food
    fn tick(&mut self) {
        self.session.snake.step();
        self.session.steps += 1;

        let head = self.session.snake.head();

        if let Some(kind) = self.session.snake.check_collision(&self.grid) {
            tracing::info!(
                ?kind,
                score = self.session.snake.score(),
                length = self.session.snake.len(),
                "Snake crashed"
            );
            if let Some(audio) = self.audio.as_mut() {
                audio.play_crash();
            }
            self.events.push(GameEvent::Collision {
                at: head,
                kind,
                color: Rgb::RED,
            });
            self.transition(GameState::GameOver);
            return;
        }

        if head == self.session.food.position() {
            self.eat(head);
        }
    }

    fn eat(&mut self, at: Cell) {
        let outcome = self.session.snake.grow();

        if let Some(audio) = self.audio.as_mut() {
            audio.play_eat();
        }
        self.events.push(GameEvent::FoodEaten {
            at,
            color: Rgb::GOLD,
        });
        self.events.push(GameEvent::ScoreChanged {
            score: outcome.score,
            high_score: outcome.high_score,
        });

        if outcome.new_high_score {
            if let Err(err) = self.store.save(outcome.high_score) {
                let reason = error_chain(&err);
                tracing::warn!(
                    score = outcome.high_score,
                    error = %reason,
                    "Could not persist high score"
                );
                self.events.push(GameEvent::HighScoreSaveFailed {
                    score: outcome.high_score,
                    reason,
                });
            }
        }

        let snake = &self.session.snake;
        if !self
            .session
            .food
            .relocate_away_from(&self.grid, snake.cells(), &mut self.rng)
        {
            tracing::warn!(length = snake.len(), "No free cell left for food");
        }
    }

    fn transition(&mut self, to: GameState) {
        tracing::debug!(from = %self.state, to = %to, "State change");
        self.state = to;
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.session.snake
    }

    pub fn food(&self) -> &Food {
        &self.session.food
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.session.snake.score()
    }

    pub fn high_score(&self) -> u32 {
        self.session.snake.high_score()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio_available(&self) -> bool {
        self.audio.is_some()
    }

    #[cfg(test)]
    fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }
}

/// An error and its sources joined on one line
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
