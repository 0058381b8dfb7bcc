//! Burst particles for crashes and eaten food
//!
//! Particles live in playfield pixel space and are only mapped to cells when
//! drawn. They are purely cosmetic and never feed back into the game.

use rand::Rng;

use crate::game::{Cell, GameConfig, GameEvent, Grid, Rgb};

/// Frames a particle stays alive
pub const PARTICLE_LIFE: u32 = 30;
/// Downward acceleration, pixels per frame squared
const GRAVITY: f32 = 0.1;
/// Largest initial speed along each axis, pixels per frame
const MAX_SPEED: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub radius: u8,
    pub color: Rgb,
    pub life: u32,
}

impl Particle {
    /// Opacity in 0..=255, fading over the last frames of life
    pub fn alpha(&self) -> u8 {
        (self.life * 8).min(255) as u8
    }

    pub fn cell(&self, grid: &Grid) -> Cell {
        grid.cell_at_pixel(self.x, self.y)
    }

    fn update(&mut self) {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_y += GRAVITY;
        self.life = self.life.saturating_sub(1);
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    crash_count: usize,
    food_count: usize,
    rng: rand::rngs::ThreadRng,
}

impl ParticleSystem {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            particles: Vec::new(),
            crash_count: config.crash_particles,
            food_count: config.food_particles,
            rng: rand::thread_rng(),
        }
    }

    /// React to a game event: bursts for crashes and food, a wipe on restart
    pub fn handle_event(&mut self, event: &GameEvent, grid: &Grid) {
        match event {
            GameEvent::Collision { at, color, .. } => {
                self.burst(*at, *color, self.crash_count, grid)
            }
            GameEvent::FoodEaten { at, color } => self.burst(*at, *color, self.food_count, grid),
            GameEvent::EffectsCleared => self.particles.clear(),
            GameEvent::ScoreChanged { .. } | GameEvent::HighScoreSaveFailed { .. } => {}
        }
    }

    /// Spawn `count` particles from the centre of `at`
    pub fn burst(&mut self, at: Cell, color: Rgb, count: usize, grid: &Grid) {
        let (px, py) = grid.to_pixels(at);
        let half = grid.cell_size as f32 / 2.0;

        for _ in 0..count {
            self.particles.push(Particle {
                x: px as f32 + half,
                y: py as f32 + half,
                vel_x: self.rng.gen_range(-MAX_SPEED..=MAX_SPEED),
                vel_y: self.rng.gen_range(-MAX_SPEED..=MAX_SPEED),
                radius: self.rng.gen_range(2..=5),
                color,
                life: PARTICLE_LIFE,
            });
        }
    }

    /// Advance every particle one frame and drop the dead ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
