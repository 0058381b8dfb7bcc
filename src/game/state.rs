use rand::Rng;
use std::fmt;
use std::time::Duration;

use super::food::Food;
use super::grid::Grid;
use super::snake::{Snake, SnakeTuning};

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Everything that belongs to a single round
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub snake: Snake,
    pub food: Food,
    /// Time owed to the simulation since the last step
    pub accumulator: Duration,
    /// Steps taken this round
    pub steps: u64,
}

impl GameSession {
    /// Start a round: a fresh snake at the grid centre and food off its body
    pub fn new<R: Rng + ?Sized>(
        grid: &Grid,
        tuning: SnakeTuning,
        high_score: u32,
        rng: &mut R,
    ) -> Self {
        let snake = Snake::new(grid.center(), high_score, tuning);
        let food = Food::spawn(grid, snake.cells(), rng);

        Self {
            snake,
            food,
            accumulator: Duration::ZERO,
            steps: 0,
        }
    }

    /// Put the snake back at the spawn cell and move the food off it
    pub fn reset<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.snake.reset(grid.center());
        self.food.relocate_away_from(grid, self.snake.cells(), rng);
        self.accumulator = Duration::ZERO;
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_session() {
        let grid = Grid::new(40, 30, 20);
        let mut rng = StdRng::seed_from_u64(9);
        let session = GameSession::new(&grid, SnakeTuning::default(), 50, &mut rng);

        assert_eq!(session.snake.head(), Cell::new(20, 15));
        assert_eq!(session.snake.high_score(), 50);
        assert_ne!(session.food.position(), session.snake.head());
        assert!(grid.contains(session.food.position()));
        assert_eq!(session.accumulator, Duration::ZERO);
    }

    #[test]
    fn test_reset_session() {
        let grid = Grid::new(10, 10, 20);
        let mut rng = StdRng::seed_from_u64(10);
        let mut session = GameSession::new(&grid, SnakeTuning::default(), 0, &mut rng);

        session.snake.grow();
        session.snake.step();
        session.snake.step();
        session.steps = 2;
        session.accumulator = Duration::from_millis(40);

        session.reset(&grid, &mut rng);
        assert_eq!(session.snake.len(), 1);
        assert_eq!(session.snake.head(), grid.center());
        assert_eq!(session.snake.high_score(), 10);
        assert!(!session.snake.occupies(session.food.position()));
        assert_eq!(session.steps, 0);
        assert_eq!(session.accumulator, Duration::ZERO);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(GameState::default(), GameState::Menu);
        assert_eq!(GameState::GameOver.to_string(), "game over");
    }
}
