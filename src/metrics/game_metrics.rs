use std::time::Duration;

use crate::game::GameState;

/// Per-process statistics shown next to the score
pub struct GameMetrics {
    /// Time spent playing this round; paused time does not count
    pub play_time: Duration,
    pub games_played: u32,
    /// Best final score since the program started
    pub best_round: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            play_time: Duration::ZERO,
            games_played: 0,
            best_round: 0,
        }
    }

    /// Account for one frame spent in `state`
    pub fn update(&mut self, state: GameState, elapsed: Duration) {
        if state == GameState::Playing {
            self.play_time += elapsed;
        }
    }

    pub fn on_game_start(&mut self) {
        self.play_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_round {
            self.best_round = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.play_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
