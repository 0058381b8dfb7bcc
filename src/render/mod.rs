pub mod particles;
pub mod renderer;

pub use particles::{Particle, ParticleSystem};
pub use renderer::{Overlay, Renderer};
