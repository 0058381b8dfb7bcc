use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;
use super::grid::{Cell, Grid};

/// Fraction of the grow swell lost per segment away from the head
const EMPHASIS_FALLOFF: f32 = 0.15;

/// One body segment. `scale` is its resting size in cells and travels down
/// the chain with the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub cell: Cell,
    pub scale: f32,
}

impl Segment {
    pub fn new(cell: Cell) -> Self {
        Self { cell, scale: 1.0 }
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Countdown for the swell animation started by eating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowEffect {
    remaining: u32,
    duration: u32,
}

impl GrowEffect {
    fn new(duration: u32) -> Self {
        Self {
            remaining: 0,
            duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Ticks left before the effect ends
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// 1.0 right after eating, falling to 0.0 as the effect runs out
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.duration as f32
    }

    fn restart(&mut self) {
        self.remaining = self.duration;
    }

    fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn clear(&mut self) {
        self.remaining = 0;
    }
}

/// Per-game constants the snake needs from [`GameConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeTuning {
    pub base_speed: f32,
    pub acceleration: f32,
    pub speed_cap: f32,
    pub food_reward: u32,
    pub grow_effect_duration: u32,
    pub max_grow_scale: f32,
}

impl From<&GameConfig> for SnakeTuning {
    fn from(config: &GameConfig) -> Self {
        Self {
            base_speed: config.base_speed,
            acceleration: config.acceleration,
            speed_cap: config.speed_cap,
            food_reward: config.food_reward,
            grow_effect_duration: config.grow_effect_duration,
            max_grow_scale: config.max_grow_scale,
        }
    }
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// What a call to [`Snake::grow`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowOutcome {
    pub score: u32,
    pub high_score: u32,
    /// The high score was raised and should be persisted
    pub new_high_score: bool,
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    segments: Vec<Segment>,
    /// Direction of the last completed step
    direction: Direction,
    /// Direction the next step will take
    pending_direction: Direction,
    growth_pending: u32,
    speed: f32,
    score: u32,
    high_score: u32,
    grow_effect: GrowEffect,
    tuning: SnakeTuning,
}

impl Snake {
    /// Create a length-1 snake at `spawn` heading right
    pub fn new(spawn: Cell, high_score: u32, tuning: SnakeTuning) -> Self {
        Self::with_body(vec![spawn], Direction::Right, high_score, tuning)
    }

    /// Create a snake from explicit cells, head first
    ///
    /// # Panics
    ///
    /// Panics if `cells` is empty.
    pub fn with_body(
        cells: Vec<Cell>,
        direction: Direction,
        high_score: u32,
        tuning: SnakeTuning,
    ) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one segment");

        let mut snake = Self {
            segments: cells.into_iter().map(Segment::new).collect(),
            direction,
            pending_direction: direction,
            growth_pending: 0,
            speed: tuning.base_speed,
            score: 0,
            high_score,
            grow_effect: GrowEffect::new(tuning.grow_effect_duration),
            tuning,
        };
        snake.speed = snake.speed_for_length(snake.segments.len());
        snake
    }

    /// Restore a fresh length-1 snake. The high score survives.
    pub fn reset(&mut self, spawn: Cell) {
        self.segments = vec![Segment::new(spawn)];
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.growth_pending = 0;
        self.speed = self.tuning.base_speed;
        self.score = 0;
        self.grow_effect.clear();
    }

    /// Queue a turn for the next step. Reversing onto the body is ignored.
    pub fn change_direction(&mut self, requested: Direction) {
        if !self.direction.is_opposite(requested) {
            self.pending_direction = requested;
        }
    }

    /// Advance one cell in the pending direction
    pub fn step(&mut self) {
        self.direction = self.pending_direction;

        let head = self.segments[0];
        let new_head = Segment {
            cell: head.cell.moved_in_direction(self.direction),
            scale: head.scale,
        };
        self.segments.insert(0, new_head);

        if self.growth_pending > 0 {
            self.growth_pending -= 1;
        } else {
            self.segments.pop();
        }

        self.grow_effect.tick();
    }

    /// Check the current head against the walls and the rest of the body
    pub fn check_collision(&self, grid: &Grid) -> Option<CollisionType> {
        let head = self.head();
        if !grid.contains(head) {
            return Some(CollisionType::Wall);
        }
        if self.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    /// Reward the snake for eating: one more segment on a later step, more
    /// points, more speed.
    pub fn grow(&mut self) -> GrowOutcome {
        self.growth_pending += 1;
        self.score += self.tuning.food_reward;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }

        self.speed = self.speed_for_length(self.target_len());
        self.grow_effect.restart();

        GrowOutcome {
            score: self.score,
            high_score: self.high_score,
            new_high_score,
        }
    }

    fn speed_for_length(&self, length: usize) -> f32 {
        let extra = length.saturating_sub(1) as f32;
        (self.tuning.base_speed + extra * self.tuning.acceleration).min(self.tuning.speed_cap)
    }

    /// Length once all pending growth has been applied
    fn target_len(&self) -> usize {
        self.segments.len() + self.growth_pending as usize
    }

    /// Time between two steps at the current speed
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.speed)
    }

    /// Size multiplier for segment `index`, including the grow swell which is
    /// strongest at the head.
    pub fn segment_emphasis(&self, index: usize) -> f32 {
        let Some(segment) = self.segments.get(index) else {
            return 0.0;
        };
        if !self.grow_effect.is_active() {
            return segment.scale;
        }

        let growth = (self.grow_effect.progress() * FRAC_PI_2).sin();
        let distance = (1.0 - index as f32 * EMPHASIS_FALLOFF).max(0.0);
        segment.scale + (self.tuning.max_grow_scale - 1.0) * growth * distance
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.segments[0].cell
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Cells occupied by the snake, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().map(|segment| segment.cell)
    }

    /// Check if a cell is occupied by any segment
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells().any(|c| c == cell)
    }

    /// Check if a cell collides with the body (excluding head)
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.segments[1..].iter().any(|segment| segment.cell == cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn growth_pending(&self) -> u32 {
        self.growth_pending
    }

    /// Ticks per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn grow_effect(&self) -> GrowEffect {
        self.grow_effect
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
